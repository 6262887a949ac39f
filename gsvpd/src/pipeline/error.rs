//! Error types for the panorama pipeline.
//!
//! Expected absences (black tiles, rejected requests, unknown tile counts)
//! never show up here; they are `None` values. These enums cover the
//! failures nobody planned for.

use crate::pipeline::executor::ExecutorError;
use crate::provider::ProviderError;
use crate::store::StoreError;
use thiserror::Error;

/// Unexpected failure inside one panorama job.
///
/// Caught at the job boundary, logged, and turned into an absent result so
/// the rest of the batch carries on.
#[derive(Debug, Error)]
pub enum JobError {
    /// Work handed to the worker pool did not come back
    #[error("worker failed: {0}")]
    Worker(#[from] ExecutorError),

    /// The stitched panorama could not be persisted
    #[error("persisting failed: {0}")]
    Store(#[from] StoreError),
}

/// Failure that aborts a whole batch before any job runs.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The worker pool could not be built
    #[error("worker pool unavailable: {0}")]
    WorkerPool(#[source] ExecutorError),

    /// The shared HTTP client could not be built
    #[error("HTTP client unavailable: {0}")]
    HttpClient(#[source] ProviderError),
}
