//! Default values and constants for all configuration settings.

// =============================================================================
// Download
// =============================================================================

/// Per-request timeout for a tile download, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Attempts per tile before a transient failure counts as a missing tile.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Backoff before the second attempt; doubles on every further attempt.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;

// =============================================================================
// Concurrency
// =============================================================================

/// Panoramas processed at the same time.
pub const DEFAULT_MAX_PANORAMAS: usize = 50;

/// Tile requests in flight across all panoramas.
pub const DEFAULT_MAX_TILES: usize = 100;

/// Worker threads for pixel analysis, stitching and encoding.
pub const DEFAULT_WORKERS: usize = 20;

/// HTTP connections in use across all hosts.
pub const DEFAULT_CONNECTIONS: usize = 100;

/// HTTP connections in use towards a single host.
pub const DEFAULT_CONNECTIONS_PER_HOST: usize = 100;

// =============================================================================
// Output
// =============================================================================

/// Zoom level used when none is given.
pub const DEFAULT_ZOOM: u8 = 2;

/// JPEG quality of persisted panoramas.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Log file name inside the config directory.
pub const DEFAULT_LOG_FILE_NAME: &str = "gsvpd.log";
