//! Concurrency envelope of a batch run.

use super::defaults::{
    DEFAULT_CONNECTIONS, DEFAULT_CONNECTIONS_PER_HOST, DEFAULT_MAX_PANORAMAS, DEFAULT_MAX_TILES,
    DEFAULT_WORKERS,
};

/// Limits shared by every panorama job in a batch.
///
/// Every limit is at least 1; setters clamp zero up to one.
///
/// # Example
///
/// ```
/// use gsvpd::config::ConcurrencyConfig;
///
/// let config = ConcurrencyConfig::new()
///     .with_max_panoramas(10)
///     .with_max_tiles(64)
///     .with_workers(4);
/// assert_eq!(config.max_panoramas(), 10);
/// assert_eq!(config.connections(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcurrencyConfig {
    max_panoramas: usize,
    max_tiles: usize,
    workers: usize,
    connections: usize,
    connections_per_host: usize,
}

impl ConcurrencyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panoramas admitted at once. Default: 50.
    pub fn with_max_panoramas(mut self, value: usize) -> Self {
        self.max_panoramas = value.max(1);
        self
    }

    /// Tile requests in flight across the batch. Default: 100.
    pub fn with_max_tiles(mut self, value: usize) -> Self {
        self.max_tiles = value.max(1);
        self
    }

    /// Worker threads for CPU-bound work. Default: 20.
    pub fn with_workers(mut self, value: usize) -> Self {
        self.workers = value.max(1);
        self
    }

    /// HTTP connections in use across all hosts. Default: 100.
    pub fn with_connections(mut self, value: usize) -> Self {
        self.connections = value.max(1);
        self
    }

    /// HTTP connections in use towards one host. Default: 100.
    pub fn with_connections_per_host(mut self, value: usize) -> Self {
        self.connections_per_host = value.max(1);
        self
    }

    pub fn max_panoramas(&self) -> usize {
        self.max_panoramas
    }

    pub fn max_tiles(&self) -> usize {
        self.max_tiles
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn connections(&self) -> usize {
        self.connections
    }

    pub fn connections_per_host(&self) -> usize {
        self.connections_per_host
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_panoramas: DEFAULT_MAX_PANORAMAS,
            max_tiles: DEFAULT_MAX_TILES,
            workers: DEFAULT_WORKERS,
            connections: DEFAULT_CONNECTIONS,
            connections_per_host: DEFAULT_CONNECTIONS_PER_HOST,
        }
    }
}
