//! Scripted tile providers, in-memory stores and tile fixtures for pipeline tests.

use crate::coord::{TileCoord, ZoomLevel, TILE_SIZE};
use crate::pipeline::stages::BLACK_TILE_BYTE_SIZE;
use crate::provider::{HttpResponse, ProviderError, TileProvider};
use crate::store::{ArtifactStore, StoreError};
use image::{Rgb, RgbImage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

type Responder =
    dyn Fn(&str, TileCoord, u32) -> Result<HttpResponse, ProviderError> + Send + Sync;

/// Provider whose answers come from a closure of (pano id, coord, attempt).
///
/// `attempt` is 1 for the first request of a cell, 2 for the first retry and
/// so on. Every request is counted.
pub struct ScriptedProvider {
    respond: Box<Responder>,
    calls: Mutex<HashMap<(String, TileCoord), u32>>,
}

impl ScriptedProvider {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str, TileCoord, u32) -> Result<HttpResponse, ProviderError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Requests made for one cell.
    pub fn calls_for(&self, pano_id: &str, coord: TileCoord) -> u32 {
        self.calls
            .lock()
            .unwrap()
            .get(&(pano_id.to_string(), coord))
            .copied()
            .unwrap_or(0)
    }

    /// Requests made in total.
    pub fn total_calls(&self) -> u32 {
        self.calls.lock().unwrap().values().sum()
    }
}

impl TileProvider for ScriptedProvider {
    async fn fetch_tile(
        &self,
        pano_id: &str,
        coord: TileCoord,
        _zoom: ZoomLevel,
    ) -> Result<HttpResponse, ProviderError> {
        let attempt = {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry((pano_id.to_string(), coord)).or_insert(0);
            *count += 1;
            *count
        };
        (self.respond)(pano_id, coord, attempt)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// PNG-encoded image response.
pub fn image_response(image: &RgbImage) -> Result<HttpResponse, ProviderError> {
    let mut body = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut body), image::ImageFormat::Png)
        .unwrap();
    Ok(HttpResponse {
        status: 200,
        content_length: Some(body.len() as u64),
        body,
    })
}

/// Full-size tile of one color.
pub fn uniform_tile(color: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgb(color))
}

/// The placeholder the server sends for a uniformly black cell.
pub fn black_response() -> Result<HttpResponse, ProviderError> {
    Ok(HttpResponse {
        status: 200,
        content_length: Some(BLACK_TILE_BYTE_SIZE),
        body: vec![0; BLACK_TILE_BYTE_SIZE as usize],
    })
}

pub fn status_response(status: u16) -> Result<HttpResponse, ProviderError> {
    Ok(HttpResponse {
        status,
        content_length: Some(0),
        body: Vec::new(),
    })
}

pub fn transport_error() -> Result<HttpResponse, ProviderError> {
    Err(ProviderError::HttpError("connection reset".to_string()))
}

/// Store that keeps every saved panorama in memory.
#[derive(Default)]
pub struct RecordingStore {
    saved: Mutex<Vec<(String, ZoomLevel, RgbImage)>>,
    fail: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every save fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn saved_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self
            .saved
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn image_for(&self, pano_id: &str) -> Option<RgbImage> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _, _)| id == pano_id)
            .map(|(_, _, image)| image.clone())
    }
}

impl ArtifactStore for RecordingStore {
    fn save(&self, image: &RgbImage, pano_id: &str, zoom: ZoomLevel) -> Result<u64, StoreError> {
        if self.fail {
            return Err(StoreError::io(
                Path::new("/unwritable"),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ));
        }
        self.saved
            .lock()
            .unwrap()
            .push((pano_id.to_string(), zoom, image.clone()));
        Ok(image.as_raw().len() as u64)
    }

    fn location(&self) -> &Path {
        Path::new("memory")
    }
}
