//! Executor abstraction for CPU-bound work.
//!
//! Pixel sampling, stitching and JPEG encoding would stall the async
//! runtime if they ran inline, so pipeline stages hand them to a
//! [`BlockingExecutor`] and await a plain value back.
//!
//! # Design
//!
//! ```text
//! ┌─────────────────────┐
//! │   Pipeline Stages   │
//! │                     │
//! │  - dimensions       │
//! │  - stitch/persist   │
//! └─────────┬───────────┘
//!           │ depends on
//!           ▼
//! ┌─────────────────────┐
//! │  BlockingExecutor   │
//! └─────────┬───────────┘
//!           │ implemented by
//!           ▼
//! ┌─────────────────────┐
//! │  WorkerPool         │
//! │                     │
//! │  - rayon pool       │
//! │  - oneshot reply    │
//! └─────────────────────┘
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

/// Trait for executing blocking (CPU-bound) work off the async runtime.
pub trait BlockingExecutor: Send + Sync + 'static {
    /// Runs `f` on a worker and resolves with its return value.
    ///
    /// Only the awaiting task is suspended; the async runtime keeps driving
    /// other tasks while the closure runs.
    fn execute_blocking<F, R>(
        &self,
        f: F,
    ) -> Pin<Box<dyn Future<Output = Result<R, ExecutorError>> + Send>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static;
}

/// Errors that can occur during executor operations.
#[derive(Debug, Clone, Error)]
pub enum ExecutorError {
    /// The worker pool could not be created
    #[error("failed to create worker pool: {0}")]
    PoolCreation(String),

    /// A submitted closure panicked
    #[error("task panicked: {0}")]
    TaskPanicked(String),

    /// The pool dropped the task without replying
    #[error("executor shut down")]
    Shutdown,
}

/// Fixed-size pool of worker threads for CPU-bound work.
///
/// Each submission is a message-passing handoff: the closure moves to a
/// worker thread and its result travels back over a oneshot channel.
/// Dropping the pool tells its threads to exit once queued work is done;
/// it does not wait for them.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Creates a pool with exactly `workers` threads.
    pub fn new(workers: usize) -> Result<Self, ExecutorError> {
        if workers == 0 {
            return Err(ExecutorError::PoolCreation(
                "worker count must be > 0".to_string(),
            ));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("gsvpd-worker-{}", index))
            .build()
            .map_err(|e| ExecutorError::PoolCreation(e.to_string()))?;

        debug!(workers, "Worker pool started");

        Ok(Self { pool, workers })
    }

    /// Returns the number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl BlockingExecutor for WorkerPool {
    fn execute_blocking<F, R>(
        &self,
        f: F,
    ) -> Pin<Box<dyn Future<Output = Result<R, ExecutorError>> + Send>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();

        // rayon aborts the process on an unhandled panic, so catch it here
        // and report it to the caller instead.
        self.pool.spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(f));
            let _ = tx.send(result);
        });

        Box::pin(async move {
            match rx.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(panic)) => Err(ExecutorError::TaskPanicked(panic_message(panic))),
                Err(_) => Err(ExecutorError::Shutdown),
            }
        })
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Synchronous executor for testing.
///
/// Executes "blocking" work immediately on the current thread.
#[cfg(test)]
pub struct SyncExecutor;

#[cfg(test)]
impl BlockingExecutor for SyncExecutor {
    fn execute_blocking<F, R>(
        &self,
        f: F,
    ) -> Pin<Box<dyn Future<Output = Result<R, ExecutorError>> + Send>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let result = f();
        Box::pin(std::future::ready(Ok(result)))
    }
}
