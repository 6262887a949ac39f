//! CLI runner for common setup and operations.
//!
//! Loads the configuration file, initializes logging and runs one batch on
//! a multi-threaded tokio runtime.

use crate::error::CliError;
use crate::settings::RunSettings;
use gsvpd::config::ConfigFile;
use gsvpd::coord::ZoomLevel;
use gsvpd::logging::{init_logging, LoggingGuard};
use gsvpd::pipeline::{run_streetview_batch, BatchOutcome};
use gsvpd::store::JpegFileStore;
use std::path::Path;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    _logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Loads `config_path` (or the default config file) and starts logging.
    pub fn new(config_path: Option<&Path>, debug: bool) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) if !path.exists() => {
                return Err(CliError::ConfigNotFound(path.display().to_string()))
            }
            Some(path) => ConfigFile::load_from(path)?,
            None => ConfigFile::load()?,
        };

        let logging_guard = init_logging(&config.log_file, debug)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            _logging_guard: logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information.
    pub fn log_startup(&self, pano_count: usize, zoom: ZoomLevel, settings: &RunSettings) {
        info!("gsvpd v{}", gsvpd::VERSION);
        info!(
            panoramas = pano_count,
            zoom = %zoom,
            output = %settings.output_dir.display(),
            "Running scraper"
        );
    }

    /// Runs the batch to completion on a fresh runtime.
    pub fn run_batch(
        &self,
        pano_ids: &[String],
        zoom: ZoomLevel,
        settings: &RunSettings,
    ) -> Result<BatchOutcome, CliError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("gsvpd-io")
            .build()
            .map_err(CliError::Runtime)?;

        let store =
            JpegFileStore::new(settings.output_dir.clone()).with_quality(settings.jpeg_quality);

        let outcome = runtime.block_on(run_streetview_batch(
            pano_ids,
            zoom,
            store,
            settings.concurrency,
            settings.download,
        ))?;

        Ok(outcome)
    }
}
