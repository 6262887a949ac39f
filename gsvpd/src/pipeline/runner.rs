//! Batch runner - fans panorama jobs out under shared limits.
//!
//! A batch owns its worker pool and its limiters. Both are created when
//! [`BatchRunner::run`] starts and dropped when it returns, so consecutive
//! batches never share state.

use crate::config::{ConcurrencyConfig, DownloadConfig};
use crate::coord::ZoomLevel;
use crate::pipeline::context::PipelineContext;
use crate::pipeline::executor::WorkerPool;
use crate::pipeline::job::process_panorama;
use crate::pipeline::BatchError;
use crate::provider::{AsyncReqwestClient, StreetViewProvider, TileProvider};
use crate::store::{ArtifactStore, JpegFileStore};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Summary of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Identifiers submitted
    pub total: usize,
    /// Panoramas persisted
    pub succeeded: usize,
    /// Where the store put them
    pub output_dir: PathBuf,
}

impl BatchOutcome {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }
}

/// Runs panorama jobs for many identifiers.
pub struct BatchRunner<P, S>
where
    P: TileProvider,
    S: ArtifactStore,
{
    provider: Arc<P>,
    store: Arc<S>,
    concurrency: ConcurrencyConfig,
    download: DownloadConfig,
}

impl<P, S> BatchRunner<P, S>
where
    P: TileProvider,
    S: ArtifactStore,
{
    pub fn new(
        provider: P,
        store: S,
        concurrency: ConcurrencyConfig,
        download: DownloadConfig,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            store: Arc::new(store),
            concurrency,
            download,
        }
    }

    /// Processes every identifier in `pano_ids` at `zoom`.
    ///
    /// An empty list returns immediately without building a worker pool or
    /// touching the network. Individual panorama failures only lower the
    /// success count; the only errors are the ones that prevent the batch
    /// from starting.
    pub async fn run(
        &self,
        pano_ids: &[String],
        zoom: ZoomLevel,
    ) -> Result<BatchOutcome, BatchError> {
        let output_dir = self.store.location().to_path_buf();

        if pano_ids.is_empty() {
            info!("No panoramas to process");
            return Ok(BatchOutcome {
                total: 0,
                succeeded: 0,
                output_dir,
            });
        }

        let start = Instant::now();
        let pool = WorkerPool::new(self.concurrency.workers()).map_err(BatchError::WorkerPool)?;
        let workers = pool.workers();

        let ctx = Arc::new(PipelineContext::new(
            Arc::clone(&self.provider),
            Arc::new(pool),
            Arc::clone(&self.store),
            self.concurrency.max_panoramas(),
            self.concurrency.max_tiles(),
            self.download,
        ));

        info!(
            panoramas = pano_ids.len(),
            zoom = %zoom,
            provider = self.provider.name(),
            max_panoramas = ctx.panorama_limiter.max_concurrent(),
            max_tiles = ctx.tile_limiter.max_concurrent(),
            workers,
            max_retries = self.download.max_retries(),
            retry_base_delay_ms = self.download.retry_base_delay().as_millis() as u64,
            "Starting batch"
        );

        let mut jobs = JoinSet::new();
        for pano_id in pano_ids {
            let ctx = Arc::clone(&ctx);
            let pano_id = pano_id.clone();
            jobs.spawn(async move { process_panorama(&ctx, &pano_id, zoom).await });
        }

        let mut succeeded = 0;
        while let Some(result) = jobs.join_next().await {
            match result {
                Ok(Some(_)) => succeeded += 1,
                Ok(None) => {}
                Err(join_err) => {
                    error!(error = %join_err, "Panorama task panicked");
                }
            }
        }

        let outcome = BatchOutcome {
            total: pano_ids.len(),
            succeeded,
            output_dir,
        };

        info!(
            total = outcome.total,
            succeeded,
            failed = outcome.failed(),
            peak_panoramas = ctx.panorama_limiter.peak_in_flight(),
            peak_tiles = ctx.tile_limiter.peak_in_flight(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch complete"
        );

        Ok(outcome)
    }
}

/// Downloads `pano_ids` from Street View into JPEG files written by `store`.
///
/// Builds one HTTP connection pool, capped by the connection limits of
/// `concurrency`, and shares it between every job of the batch.
pub async fn run_streetview_batch(
    pano_ids: &[String],
    zoom: ZoomLevel,
    store: JpegFileStore,
    concurrency: ConcurrencyConfig,
    download: DownloadConfig,
) -> Result<BatchOutcome, BatchError> {
    let client = AsyncReqwestClient::new(
        download.request_timeout(),
        concurrency.connections(),
        concurrency.connections_per_host(),
    )
    .map_err(BatchError::HttpClient)?;

    let runner = BatchRunner::new(
        StreetViewProvider::new(client),
        store,
        concurrency,
        download,
    );
    runner.run(pano_ids, zoom).await
}
