//! Pipeline stages for panorama reconstruction.
//!
//! 1. **Fetch** - Download every cell of the requested tile grid
//! 2. **Dimensions** - Work out the true panorama size
//! 3. **Stitch** - Composite the surviving tiles onto one canvas

mod dimensions;
mod fetch;
mod stitch;

pub use dimensions::{
    black_fraction, current_size, has_black_bottom, legacy_size, resolve_dimensions,
    size_for_tile_count, BLACK_THRESHOLD, BOTTOM_ROWS, LEGACY_BLACK_FRACTION,
};
pub use fetch::{fetch_stage, fetch_tile, Tile, BLACK_TILE_BYTE_SIZE};
pub use stitch::stitch_tiles;
