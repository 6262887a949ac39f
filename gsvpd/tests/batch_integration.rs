//! Integration tests for the batch pipeline.
//!
//! These tests drive the public API end to end: Street View URLs are built
//! by the real provider, answered by an in-process tile server, and the
//! stitched panoramas land on disk through the JPEG store.

use gsvpd::config::{ConcurrencyConfig, DownloadConfig};
use gsvpd::coord::ZoomLevel;
use gsvpd::pipeline::BatchRunner;
use gsvpd::provider::{AsyncHttpClient, HttpResponse, ProviderError, StreetViewProvider};
use gsvpd::store::JpegFileStore;
use image::{Rgb, RgbImage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// A tile request decoded from a Street View URL.
#[derive(Debug, Clone)]
struct TileRequest {
    pano_id: String,
    x: u32,
    y: u32,
}

fn parse_request(url: &str) -> TileRequest {
    let url = reqwest::Url::parse(url).unwrap();
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

    assert_eq!(params["output"], "tile");
    TileRequest {
        pano_id: params["panoid"].to_string(),
        x: params["x"].parse().unwrap(),
        y: params["y"].parse().unwrap(),
    }
}

type Handler = dyn Fn(&TileRequest) -> Result<HttpResponse, ProviderError> + Send + Sync;

/// In-process stand-in for the tile endpoint.
#[derive(Clone)]
struct TileServer {
    handler: Arc<Handler>,
    requests: Arc<AtomicUsize>,
}

impl TileServer {
    fn new<F>(handler: F) -> Self
    where
        F: Fn(&TileRequest) -> Result<HttpResponse, ProviderError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl AsyncHttpClient for TileServer {
    async fn get(&self, url: &str) -> Result<HttpResponse, ProviderError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        (self.handler)(&parse_request(url))
    }
}

fn png(image: &RgbImage) -> Result<HttpResponse, ProviderError> {
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

fn uniform(color: [u8; 3]) -> Result<HttpResponse, ProviderError> {
    png(&RgbImage::from_pixel(512, 512, Rgb(color)))
}

fn black_placeholder() -> Result<HttpResponse, ProviderError> {
    Ok(HttpResponse {
        status: 200,
        content_length: Some(1184),
        body: vec![0; 1184],
    })
}

fn runner(server: TileServer, output: &Path) -> BatchRunner<StreetViewProvider<TileServer>, JpegFileStore> {
    BatchRunner::new(
        StreetViewProvider::new(server),
        JpegFileStore::new(output),
        ConcurrencyConfig::new()
            .with_max_panoramas(2)
            .with_max_tiles(8)
            .with_workers(2),
        DownloadConfig::new().with_retry_base_delay(Duration::ZERO),
    )
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn image_size(path: &Path) -> (u32, u32) {
    let image = image::open(path).unwrap();
    (image.width(), image.height())
}

// =============================================================================
// Integration Tests
// =============================================================================

#[tokio::test]
async fn test_zoom3_batch_with_one_missing_panorama() {
    let temp = TempDir::new().unwrap();
    let server = TileServer::new(|request| match request.pano_id.as_str() {
        "current" => uniform([128, 128, 128]),
        "legacy" if request.x < 7 => uniform([64, 64, 64]),
        "legacy" => Ok(HttpResponse {
            status: 400,
            content_length: Some(0),
            body: Vec::new(),
        }),
        _ => black_placeholder(),
    });

    let outcome = runner(server.clone(), temp.path())
        .run(&ids(&["current", "expired", "legacy"]), ZoomLevel::new(3).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.total, 3);
    assert_eq!(outcome.succeeded, 2);
    assert_eq!(outcome.output_dir, temp.path());

    let zoom_dir = temp.path().join("panos_z3");
    let mut files: Vec<_> = std::fs::read_dir(&zoom_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    files.sort();
    assert_eq!(files, vec!["current.jpg", "legacy.jpg"]);

    assert_eq!(image_size(&zoom_dir.join("current.jpg")), (4096, 2048));
    assert_eq!(image_size(&zoom_dir.join("legacy.jpg")), (3328, 1664));

    // 32 cells per panorama, black placeholders are never retried
    assert_eq!(server.request_count(), 96);
}

#[tokio::test]
async fn test_zoom3_batch_with_unreachable_panorama() {
    let temp = TempDir::new().unwrap();
    let server = TileServer::new(|request| match request.pano_id.as_str() {
        "current" => uniform([128, 128, 128]),
        _ => Err(ProviderError::HttpError("connection refused".to_string())),
    });

    let outcome = runner(server.clone(), temp.path())
        .run(&ids(&["current", "unreachable"]), ZoomLevel::new(3).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.total, 2);
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.failed(), 1);

    let zoom_dir = temp.path().join("panos_z3");
    let files: Vec<_> = std::fs::read_dir(&zoom_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files, vec!["current.jpg"]);

    // Every cell of the unreachable panorama uses all of its attempts
    let attempts = DownloadConfig::default().max_retries() as usize;
    assert_eq!(server.request_count(), 32 + 32 * attempts);
}

#[tokio::test]
async fn test_zoom0_legacy_panorama() {
    let temp = TempDir::new().unwrap();
    // 60% of the tile is black padding
    let tile = RgbImage::from_fn(512, 512, |x, _| {
        if x < 204 {
            Rgb([180, 150, 120])
        } else {
            Rgb([0, 0, 0])
        }
    });
    let server = TileServer::new(move |_| png(&tile));

    let outcome = runner(server, temp.path())
        .run(&ids(&["old"]), ZoomLevel::new(0).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(
        image_size(&temp.path().join("panos_z0").join("old.jpg")),
        (416, 208)
    );
}

#[tokio::test]
async fn test_zoom2_current_panorama() {
    let temp = TempDir::new().unwrap();
    let server = TileServer::new(|_| uniform([200, 10, 10]));

    let outcome = runner(server.clone(), temp.path())
        .run(&ids(&["fresh"]), ZoomLevel::new(2).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(server.request_count(), 8);

    let path = temp.path().join("panos_z2").join("fresh.jpg");
    assert_eq!(image_size(&path), (2048, 1024));
    let pixel = image::open(&path).unwrap().to_rgb8().get_pixel(1500, 700).0;
    assert!(pixel[0] > 150 && pixel[1] < 60, "unexpected pixel {:?}", pixel);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let temp = TempDir::new().unwrap();
    let failures = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&failures);
    let server = TileServer::new(move |_| {
        // First two requests overall fail at the transport level
        if counter.fetch_add(1, Ordering::SeqCst) < 2 {
            Err(ProviderError::HttpError("connection reset".to_string()))
        } else {
            uniform([90, 90, 90])
        }
    });

    let outcome = runner(server.clone(), temp.path())
        .run(&ids(&["flaky"]), ZoomLevel::new(1).unwrap())
        .await
        .unwrap();

    assert_eq!(outcome.succeeded, 1);
    assert_eq!(server.request_count(), 4);
}

#[tokio::test]
async fn test_empty_batch_makes_no_requests() {
    let temp = TempDir::new().unwrap();
    let server = TileServer::new(|_| uniform([1, 1, 1]));

    let outcome = runner(server.clone(), temp.path())
        .run(&[], ZoomLevel::new(4).unwrap())
        .await
        .unwrap();

    assert_eq!((outcome.total, outcome.succeeded), (0, 0));
    assert_eq!(server.request_count(), 0);
    assert!(!temp.path().join("panos_z4").exists());
}
