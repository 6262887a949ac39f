//! Provider types and traits

use super::http::HttpResponse;
use crate::coord::{TileCoord, ZoomLevel};
use std::future::Future;
use thiserror::Error;

/// Errors that can occur during provider operations.
///
/// These are transport-level failures. An HTTP response with a non-success
/// status is not an error here; it is returned as a normal [`HttpResponse`]
/// and classified by the fetch stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The tile URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Async source of panorama tiles.
///
/// Implementors address one tile by panorama identifier, zoom level and grid
/// position, and return the raw HTTP response for classification. They
/// also bound how long one request may take and report an expired
/// deadline as a [`ProviderError`].
pub trait TileProvider: Send + Sync + 'static {
    /// Requests one tile.
    ///
    /// # Arguments
    ///
    /// * `pano_id` - Panorama identifier
    /// * `coord` - Tile position within the panorama grid
    /// * `zoom` - Zoom level
    fn fetch_tile(
        &self,
        pano_id: &str,
        coord: TileCoord,
        zoom: ZoomLevel,
    ) -> impl Future<Output = Result<HttpResponse, ProviderError>> + Send;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}
