//! Per-panorama job.
//!
//! A job takes one panorama identifier through every stage:
//!
//! ```text
//! admit ─► fetch grid ─► observed extent ─► resolve size ─► stitch + save
//! ```
//!
//! Expected absences end the job quietly with `None`. Unexpected failures
//! surface as [`JobError`] inside the job and are converted to `None` at its
//! boundary, so one broken panorama never takes the batch down.

use crate::coord::{observed_extent, GridExtent, PanoramaDimensions, ZoomLevel};
use crate::pipeline::context::PipelineContext;
use crate::pipeline::executor::BlockingExecutor;
use crate::pipeline::stages::{fetch_stage, resolve_dimensions, stitch_tiles};
use crate::pipeline::JobError;
use crate::provider::TileProvider;
use crate::store::{format_size, ArtifactStore};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// A persisted panorama.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanoramaResult {
    /// Panorama identifier
    pub pano_id: String,

    /// Zoom level the panorama was built at
    pub zoom: ZoomLevel,

    /// Size of the stitched image
    pub dimensions: PanoramaDimensions,

    /// Distinct columns and rows that came back from the server
    pub tiles: GridExtent,

    /// Bytes written by the store
    pub file_size: u64,
}

/// Processes one panorama end to end.
///
/// Holds a panorama-limiter permit for the whole job. Returns `None` when
/// the panorama could not be produced, whatever the reason; the reason is
/// logged.
pub async fn process_panorama<P, E, S>(
    ctx: &PipelineContext<P, E, S>,
    pano_id: &str,
    zoom: ZoomLevel,
) -> Option<PanoramaResult>
where
    P: TileProvider,
    E: BlockingExecutor,
    S: ArtifactStore,
{
    let _permit = ctx.panorama_limiter.acquire().await;

    match run_job(ctx, pano_id, zoom).await {
        Ok(result) => result,
        Err(e) => {
            error!(pano_id, zoom = %zoom, error = %e, "Panorama processing failed");
            None
        }
    }
}

async fn run_job<P, E, S>(
    ctx: &PipelineContext<P, E, S>,
    pano_id: &str,
    zoom: ZoomLevel,
) -> Result<Option<PanoramaResult>, JobError>
where
    P: TileProvider,
    E: BlockingExecutor,
    S: ArtifactStore,
{
    let start = Instant::now();

    // Stage 1: Fetch the current-format grid
    let tiles = fetch_stage(
        Arc::clone(&ctx.provider),
        Arc::clone(&ctx.tile_limiter),
        Arc::from(pano_id),
        zoom,
        zoom.grid(),
        ctx.download,
    )
    .await;

    if tiles.is_empty() {
        warn!(
            pano_id,
            "No tiles fetched (may be expired, removed, or invalid)"
        );
        return Ok(None);
    }

    let observed = observed_extent(tiles.iter().map(|tile| tile.coord));

    // Stage 2: Resolve the panorama size
    let Some(dimensions) =
        resolve_dimensions(ctx.executor.as_ref(), &tiles, zoom, observed).await?
    else {
        warn!(
            pano_id,
            zoom = %zoom,
            tiles = %observed,
            "Could not determine panorama dimensions"
        );
        return Ok(None);
    };

    // Stage 3: Stitch and persist on the worker pool
    let store = Arc::clone(&ctx.store);
    let id = pano_id.to_string();
    let file_size = ctx
        .executor
        .execute_blocking(move || {
            let canvas = stitch_tiles(tiles, dimensions);
            store.save(&canvas, &id, zoom)
        })
        .await??;

    info!(
        pano_id,
        zoom = %zoom,
        size = %dimensions,
        tiles = %observed,
        file_size = %format_size(file_size),
        "Panorama saved"
    );
    debug!(
        pano_id,
        duration_ms = start.elapsed().as_millis() as u64,
        "Job complete"
    );

    Ok(Some(PanoramaResult {
        pano_id: pano_id.to_string(),
        zoom,
        dimensions,
        tiles: observed,
        file_size,
    }))
}
