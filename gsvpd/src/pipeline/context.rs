//! Shared resources of one batch.
//!
//! A [`PipelineContext`] is built once per batch and handed to every
//! panorama job behind an `Arc`. It owns nothing global: two batches running
//! side by side get their own limiters and their own worker pool.

use crate::config::DownloadConfig;
use crate::pipeline::executor::BlockingExecutor;
use crate::pipeline::limiter::ConcurrencyLimiter;
use crate::provider::TileProvider;
use crate::store::ArtifactStore;
use std::sync::Arc;

/// Everything a panorama job needs besides its identifier and zoom.
pub struct PipelineContext<P, E, S>
where
    P: TileProvider,
    E: BlockingExecutor,
    S: ArtifactStore,
{
    /// Tile source
    pub provider: Arc<P>,

    /// Worker pool for pixel sampling, stitching and encoding
    pub executor: Arc<E>,

    /// Destination of finished panoramas
    pub store: Arc<S>,

    /// Panoramas admitted at once
    pub panorama_limiter: Arc<ConcurrencyLimiter>,

    /// Tile requests in flight across the batch
    pub tile_limiter: Arc<ConcurrencyLimiter>,

    /// Per-tile timeout and retry policy
    pub download: DownloadConfig,
}

impl<P, E, S> PipelineContext<P, E, S>
where
    P: TileProvider,
    E: BlockingExecutor,
    S: ArtifactStore,
{
    /// Creates a context with fresh limiters sized `max_panoramas` and `max_tiles`.
    pub fn new(
        provider: Arc<P>,
        executor: Arc<E>,
        store: Arc<S>,
        max_panoramas: usize,
        max_tiles: usize,
        download: DownloadConfig,
    ) -> Self {
        Self {
            provider,
            executor,
            store,
            panorama_limiter: Arc::new(ConcurrencyLimiter::new("panoramas", max_panoramas)),
            tile_limiter: Arc::new(ConcurrencyLimiter::new("tiles", max_tiles)),
            download,
        }
    }
}
