//! Panorama tile provider abstraction
//!
//! This module provides the HTTP client used as the batch's shared
//! connection pool and the tile source that addresses Street View tiles by
//! panorama identifier, zoom level and grid position.

mod http;
mod streetview;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, HttpResponse};
pub use streetview::{StreetViewProvider, DEFAULT_TILE_ENDPOINT};
pub use types::{ProviderError, TileProvider};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
