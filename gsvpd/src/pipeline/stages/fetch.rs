//! Fetch stage - downloads every tile of a panorama grid.
//!
//! One task per grid cell is spawned on a `JoinSet`. Each task owns its own
//! retry loop and only holds a tile-limiter permit while its HTTP request is
//! in flight, so backoff sleeps never block other downloads. Request
//! deadlines belong to the provider; a timed-out request comes back as a
//! `ProviderError` like any other transport failure.
//!
//! A cell ends up in one of three states:
//!
//! | Response                                | Outcome  | Retried |
//! |-----------------------------------------|----------|---------|
//! | `Content-Length: 1184` (any status)     | absent   | no      |
//! | non-2xx status                          | absent   | no      |
//! | 2xx with a decodable image              | tile     | -       |
//! | transport error, timeout, decode error  | absent after the last attempt | yes |

use crate::config::DownloadConfig;
use crate::coord::{GridExtent, TileCoord, ZoomLevel};
use crate::pipeline::limiter::ConcurrencyLimiter;
use crate::provider::{HttpResponse, TileProvider};
use image::RgbImage;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, instrument, trace, warn};

/// Declared body length of the server's uniformly black placeholder tile.
pub const BLACK_TILE_BYTE_SIZE: u64 = 1184;

/// A decoded tile and its position in the panorama grid.
#[derive(Debug, Clone)]
pub struct Tile {
    pub coord: TileCoord,
    pub image: RgbImage,
}

/// Outcome of one attempt that did not produce a tile.
enum AttemptFailure {
    /// Definitive absence, do not retry
    Absent(&'static str),
    /// Worth another attempt
    Transient(String),
}

/// Fetches one tile, retrying transient failures with exponential backoff.
///
/// Returns `None` when the cell has no imagery (black placeholder or a
/// rejected request) or when every attempt failed.
pub async fn fetch_tile<P>(
    provider: &P,
    limiter: &ConcurrencyLimiter,
    pano_id: &str,
    coord: TileCoord,
    zoom: ZoomLevel,
    config: &DownloadConfig,
) -> Option<Tile>
where
    P: TileProvider,
{
    let max_attempts = config.max_retries().max(1);

    for attempt in 1..=max_attempts {
        let outcome = {
            // Held for the request only; released before any backoff.
            let _permit = limiter.acquire().await;
            trace!(
                pano_id,
                %coord,
                attempt,
                limiter = limiter.name(),
                in_flight = limiter.in_flight(),
                "Requesting tile"
            );
            provider.fetch_tile(pano_id, coord, zoom).await
        };

        let failure = match outcome {
            Ok(response) => match classify(response) {
                Ok(image) => return Some(Tile { coord, image }),
                Err(failure) => failure,
            },
            Err(e) => AttemptFailure::Transient(e.to_string()),
        };

        match failure {
            AttemptFailure::Absent(reason) => {
                trace!(pano_id, %coord, reason, "Tile absent");
                return None;
            }
            AttemptFailure::Transient(error) if attempt < max_attempts => {
                let wait = config.backoff_delay(attempt);
                warn!(
                    pano_id,
                    %coord,
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    error = %error,
                    "Tile request failed, retrying"
                );
                tokio::time::sleep(wait).await;
            }
            AttemptFailure::Transient(error) => {
                warn!(
                    pano_id,
                    %coord,
                    attempts = max_attempts,
                    error = %error,
                    "Tile request failed, giving up"
                );
            }
        }
    }

    None
}

/// Turns a response into a decoded tile or a failure class.
fn classify(response: HttpResponse) -> Result<RgbImage, AttemptFailure> {
    if response.content_length == Some(BLACK_TILE_BYTE_SIZE) {
        return Err(AttemptFailure::Absent("black placeholder"));
    }
    if !response.is_success() {
        return Err(AttemptFailure::Absent("request rejected"));
    }

    image::load_from_memory(&response.body)
        .map(|decoded| decoded.to_rgb8())
        .map_err(|e| AttemptFailure::Transient(format!("image decode error: {}", e)))
}

/// Fetches every cell of `grid` concurrently.
///
/// Returns the surviving tiles sorted in grid order (x-major, then y).
#[instrument(skip(provider, limiter, config), fields(pano_id = %pano_id, zoom = %zoom))]
pub async fn fetch_stage<P>(
    provider: Arc<P>,
    limiter: Arc<ConcurrencyLimiter>,
    pano_id: Arc<str>,
    zoom: ZoomLevel,
    grid: GridExtent,
    config: DownloadConfig,
) -> Vec<Tile>
where
    P: TileProvider,
{
    let mut downloads = JoinSet::new();

    for coord in grid.cells() {
        let provider = Arc::clone(&provider);
        let limiter = Arc::clone(&limiter);
        let pano_id = Arc::clone(&pano_id);

        downloads.spawn(async move {
            fetch_tile(&*provider, &limiter, &pano_id, coord, zoom, &config).await
        });
    }

    let mut tiles = Vec::with_capacity(grid.cell_count());
    while let Some(result) = downloads.join_next().await {
        match result {
            Ok(Some(tile)) => tiles.push(tile),
            Ok(None) => {}
            Err(join_err) => {
                warn!(pano_id = %pano_id, error = %join_err, "Tile task panicked");
            }
        }
    }

    tiles.sort_by_key(|tile| tile.coord);

    debug!(
        pano_id = %pano_id,
        requested = grid.cell_count(),
        fetched = tiles.len(),
        "Fetch stage complete"
    );

    tiles
}
