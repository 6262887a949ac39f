//! Async panorama reconstruction pipeline.
//!
//! # Architecture
//!
//! ```text
//! BatchRunner ─► PanoramaJob (≤ max_panoramas at once)
//!                  │
//!                  ├─► Fetch stage      (tokio tasks, ≤ max_tiles requests)
//!                  ├─► Dimension stage  (worker pool)
//!                  └─► Stitch + persist (worker pool)
//! ```
//!
//! Network-bound work runs on the tokio runtime. CPU-bound work is handed to
//! a [`WorkerPool`] and awaited, so only the job that needs it suspends.
//!
//! # Key Components
//!
//! - [`BatchRunner`] - Fans jobs out over many identifiers
//! - [`process_panorama`] - Takes one identifier through every stage
//! - [`ConcurrencyLimiter`] - Admission control with in-flight statistics
//! - [`BlockingExecutor`] - Seam between async stages and CPU-bound work
//!
//! # Example
//!
//! ```ignore
//! use gsvpd::config::{ConcurrencyConfig, DownloadConfig};
//! use gsvpd::coord::ZoomLevel;
//! use gsvpd::pipeline::run_streetview_batch;
//! use gsvpd::store::JpegFileStore;
//!
//! let ids = vec!["pano-id".to_string()];
//! let outcome = run_streetview_batch(
//!     &ids,
//!     ZoomLevel::new(2)?,
//!     JpegFileStore::new("panoramas"),
//!     ConcurrencyConfig::default(),
//!     DownloadConfig::default(),
//! )
//! .await?;
//! println!("{}/{}", outcome.succeeded, outcome.total);
//! ```

mod context;
mod error;
mod executor;
mod job;
mod limiter;
mod runner;
pub mod stages;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::PipelineContext;
pub use error::{BatchError, JobError};
pub use executor::{BlockingExecutor, ExecutorError, WorkerPool};
pub use job::{process_panorama, PanoramaResult};
pub use limiter::{ConcurrencyLimiter, ConcurrencyPermit};
pub use runner::{run_streetview_batch, BatchOutcome, BatchRunner};
pub use stages::Tile;
