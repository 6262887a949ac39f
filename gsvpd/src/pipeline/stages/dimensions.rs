//! Dimension resolution - works out the true size of a panorama.
//!
//! Panoramas exist in two generations. Legacy captures are smaller than the
//! tile grid suggests and the server pads the unused area with black. At
//! zoom 0-2 the two are told apart by sampling pixels; from zoom 3 upwards
//! the number of columns and rows that actually came back is enough.

use crate::coord::{GridExtent, PanoramaDimensions, ZoomLevel};
use crate::pipeline::executor::BlockingExecutor;
use crate::pipeline::stages::fetch::Tile;
use crate::pipeline::JobError;
use image::RgbImage;
use tracing::{debug, instrument};

/// Highest channel value still considered black.
pub const BLACK_THRESHOLD: u8 = 10;

/// Rows sampled at the bottom of a tile by [`has_black_bottom`].
pub const BOTTOM_ROWS: u32 = 5;

/// A zoom-0 tile more black than this is a legacy panorama.
pub const LEGACY_BLACK_FRACTION: f64 = 0.55;

/// Current-generation sizes for zoom 0, 1 and 2.
const CURRENT_SIZES: [PanoramaDimensions; 3] = [
    PanoramaDimensions::new(512, 256),
    PanoramaDimensions::new(1024, 512),
    PanoramaDimensions::new(2048, 1024),
];

/// Legacy sizes for zoom 0, 1 and 2.
const LEGACY_SIZES: [PanoramaDimensions; 3] = [
    PanoramaDimensions::new(416, 208),
    PanoramaDimensions::new(832, 416),
    PanoramaDimensions::new(1664, 832),
];

/// Observed tile counts at zoom 3-5 and the panorama size they imply.
const TILE_COUNT_SIZES: [(GridExtent, PanoramaDimensions); 6] = [
    (GridExtent::new(8, 4), PanoramaDimensions::new(4096, 2048)),
    (GridExtent::new(7, 4), PanoramaDimensions::new(3328, 1664)),
    (GridExtent::new(16, 8), PanoramaDimensions::new(8192, 4096)),
    (GridExtent::new(13, 7), PanoramaDimensions::new(6656, 3328)),
    (GridExtent::new(32, 16), PanoramaDimensions::new(16384, 8192)),
    (GridExtent::new(26, 13), PanoramaDimensions::new(13312, 6656)),
];

/// Current-generation size at a pixel-sampled zoom (0-2).
pub fn current_size(zoom: ZoomLevel) -> Option<PanoramaDimensions> {
    CURRENT_SIZES.get(zoom.value() as usize).copied()
}

/// Legacy size at a pixel-sampled zoom (0-2).
pub fn legacy_size(zoom: ZoomLevel) -> Option<PanoramaDimensions> {
    LEGACY_SIZES.get(zoom.value() as usize).copied()
}

/// Size implied by an observed tile extent, if it is a known one.
pub fn size_for_tile_count(observed: GridExtent) -> Option<PanoramaDimensions> {
    TILE_COUNT_SIZES
        .iter()
        .find(|(extent, _)| *extent == observed)
        .map(|(_, dims)| *dims)
}

fn is_black(pixel: &image::Rgb<u8>) -> bool {
    pixel.0.iter().all(|&channel| channel <= BLACK_THRESHOLD)
}

/// Fraction (0.0-1.0) of pixels whose every channel is at most [`BLACK_THRESHOLD`].
pub fn black_fraction(image: &RgbImage) -> f64 {
    let total = image.width() as u64 * image.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let black = image.pixels().filter(|p| is_black(p)).count() as u64;
    black as f64 / total as f64
}

/// Returns true if the bottom [`BOTTOM_ROWS`] rows are entirely black.
///
/// Images shorter than that are sampled whole; an empty image is not black.
pub fn has_black_bottom(image: &RgbImage) -> bool {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return false;
    }
    let first_row = height.saturating_sub(BOTTOM_ROWS);
    (first_row..height).all(|y| (0..width).all(|x| is_black(image.get_pixel(x, y))))
}

/// Resolves the final panorama size.
///
/// - zoom 0: legacy if more than 55% of the first tile is black
/// - zoom 1-2: legacy if the bottom rows of the second tile are black;
///   `None` with fewer than two tiles
/// - zoom 3-5: looked up from the observed tile extent; `None` if unknown
///
/// `tiles` must be in grid order. Pixel sampling runs on `executor`.
#[instrument(skip(executor, tiles), fields(tiles = tiles.len()))]
pub async fn resolve_dimensions<E>(
    executor: &E,
    tiles: &[Tile],
    zoom: ZoomLevel,
    observed: GridExtent,
) -> Result<Option<PanoramaDimensions>, JobError>
where
    E: BlockingExecutor,
{
    let (current, legacy) = match (current_size(zoom), legacy_size(zoom)) {
        (Some(current), Some(legacy)) => (current, legacy),
        _ => return Ok(size_for_tile_count(observed)),
    };

    let is_legacy = if zoom.value() == 0 {
        let Some(first) = tiles.first() else {
            return Ok(None);
        };
        let sample = first.image.clone();
        let fraction = executor
            .execute_blocking(move || black_fraction(&sample))
            .await?;
        debug!(black_fraction = fraction, "Sampled first tile");
        fraction > LEGACY_BLACK_FRACTION
    } else {
        let Some(second) = tiles.get(1) else {
            return Ok(None);
        };
        let sample = second.image.clone();
        let black_bottom = executor
            .execute_blocking(move || has_black_bottom(&sample))
            .await?;
        debug!(black_bottom, coord = %second.coord, "Sampled second tile");
        black_bottom
    };

    Ok(Some(if is_legacy { legacy } else { current }))
}
