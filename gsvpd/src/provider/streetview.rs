//! Street View panorama tile provider.
//!
//! # URL Pattern
//!
//! `https://cbk0.google.com/cbk?output=tile&panoid={id}&zoom={z}&x={x}&y={y}`
//!
//! - `panoid` - Panorama identifier
//! - `zoom` - Panorama zoom level (0-5)
//! - `x`, `y` - Tile column and row within the panorama grid
//!
//! The server answers uniformly black cells with a fixed 1184-byte
//! placeholder; classification of that response is left to the fetch stage.

use crate::coord::{TileCoord, ZoomLevel};
use crate::provider::{AsyncHttpClient, HttpResponse, ProviderError, TileProvider};

/// Default tile endpoint.
pub const DEFAULT_TILE_ENDPOINT: &str = "https://cbk0.google.com/cbk";

/// Street View panorama tile provider.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use gsvpd::provider::{AsyncReqwestClient, StreetViewProvider};
///
/// let client = AsyncReqwestClient::new(Duration::from_secs(30), 100, 100)?;
/// let provider = StreetViewProvider::new(client);
/// ```
pub struct StreetViewProvider<C: AsyncHttpClient> {
    http_client: C,
    endpoint: String,
}

impl<C: AsyncHttpClient> StreetViewProvider<C> {
    /// Creates a provider using the default endpoint.
    pub fn new(http_client: C) -> Self {
        Self::with_endpoint(http_client, DEFAULT_TILE_ENDPOINT)
    }

    /// Creates a provider using a custom endpoint (e.g. a local mirror).
    pub fn with_endpoint(http_client: C, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    /// Builds the tile URL for the given panorama cell.
    ///
    /// Query values are form-encoded, so an identifier can never add or
    /// replace parameters.
    fn build_url(
        &self,
        pano_id: &str,
        coord: TileCoord,
        zoom: ZoomLevel,
    ) -> Result<String, ProviderError> {
        let zoom = zoom.to_string();
        let x = coord.x.to_string();
        let y = coord.y.to_string();

        reqwest::Url::parse_with_params(
            &self.endpoint,
            [
                ("output", "tile"),
                ("panoid", pano_id),
                ("zoom", zoom.as_str()),
                ("x", x.as_str()),
                ("y", y.as_str()),
            ],
        )
        .map(String::from)
        .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", self.endpoint, e)))
    }
}

impl<C: AsyncHttpClient + 'static> TileProvider for StreetViewProvider<C> {
    async fn fetch_tile(
        &self,
        pano_id: &str,
        coord: TileCoord,
        zoom: ZoomLevel,
    ) -> Result<HttpResponse, ProviderError> {
        let url = self.build_url(pano_id, coord, zoom)?;
        self.http_client.get(&url).await
    }

    fn name(&self) -> &str {
        "Street View"
    }
}
