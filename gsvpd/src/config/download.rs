//! Tile download configuration.

use super::defaults::{
    DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_BASE_DELAY_MS,
};
use std::time::Duration;

/// Configuration for individual tile downloads.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use gsvpd::config::DownloadConfig;
///
/// let config = DownloadConfig::default();
/// assert_eq!(config.request_timeout(), Duration::from_secs(30));
/// assert_eq!(config.max_retries(), 3);
///
/// let config = DownloadConfig::new()
///     .with_max_retries(5)
///     .with_retry_base_delay(Duration::from_millis(50));
/// assert_eq!(config.backoff_delay(3), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Timeout for one HTTP request
    request_timeout: Duration,
    /// Total attempts per tile (first try included)
    max_retries: u32,
    /// Backoff after the first failed attempt
    retry_base_delay: Duration,
}

impl DownloadConfig {
    /// Create a new download configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-request timeout. Default: 30 seconds.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the number of attempts per tile. Default: 3.
    ///
    /// A tile that fails transiently this many times is treated as missing.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base backoff delay. Default: 200 ms.
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Get the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Get the number of attempts per tile.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Get the base backoff delay.
    pub fn retry_base_delay(&self) -> Duration {
        self.retry_base_delay
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// `base * 2^(attempt - 1)`: 1× after the first failure, 2× after the
    /// second, 4× after the third and so on. Saturates at `Duration::MAX`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.retry_base_delay.saturating_mul(1u32 << exponent)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: Duration::from_millis(DEFAULT_RETRY_BASE_DELAY_MS),
        }
    }
}
