//! Configuration types for gsvpd components.
//!
//! Each config struct groups the parameters of one concern and offers
//! builder-style setters on top of sensible defaults. [`ConfigFile`] overlays
//! values from `~/.gsvpd/config.ini`.
//!
//! # Example
//!
//! ```
//! use gsvpd::config::{ConcurrencyConfig, DownloadConfig};
//!
//! let download = DownloadConfig::default().with_max_retries(5);
//! let concurrency = ConcurrencyConfig::default().with_workers(8);
//! assert_eq!(download.max_retries(), 5);
//! assert_eq!(concurrency.workers(), 8);
//! ```

mod concurrency;
mod defaults;
mod download;
mod file;
mod parser;

pub use concurrency::ConcurrencyConfig;
pub use defaults::*;
pub use download::DownloadConfig;
pub use file::{config_directory, config_file_path, ConfigFile, ConfigFileError};
