//! Stitch stage - composites tiles onto one canvas.
//!
//! Tiles are pasted at `(x * 512, y * 512)` without scaling or blending.
//! Anything past the canvas edge is clipped, which is how legacy panoramas
//! lose the padding the server added around them. Cells with no tile stay
//! black.

use crate::coord::PanoramaDimensions;
use crate::pipeline::stages::fetch::Tile;
use image::{imageops, RgbImage};

/// Stitches `tiles` into a canvas of exactly `dims`.
///
/// Consumes the tiles; each raster is released as soon as it has been
/// composited. The result depends only on the tiles and `dims`, not on the
/// order of `tiles`, as long as no two tiles share a coordinate.
pub fn stitch_tiles(tiles: Vec<Tile>, dims: PanoramaDimensions) -> RgbImage {
    let mut canvas = RgbImage::new(dims.width, dims.height);

    for tile in tiles {
        let (x, y) = tile.coord.pixel_offset();
        imageops::replace(&mut canvas, &tile.image, i64::from(x), i64::from(y));
    }

    canvas
}
