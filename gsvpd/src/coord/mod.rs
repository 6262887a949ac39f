//! Panorama grid coordinates.
//!
//! Provides the tile coordinate, zoom level and grid extent types shared by
//! every pipeline stage, plus the helper that measures which part of the
//! grid actually came back from the tile server.

mod types;


pub use types::{
    CoordError, GridCells, GridExtent, PanoramaDimensions, TileCoord, ZoomLevel, MAX_ZOOM,
    MIN_ZOOM, TILE_SIZE,
};

use std::collections::BTreeSet;

/// Measures the observed grid extent of a set of tile coordinates.
///
/// The extent is the number of distinct columns and distinct rows present,
/// not the bounding box: a grid with a hole in the middle still reports the
/// full width if every column contributed at least one tile.
pub fn observed_extent<I>(coords: I) -> GridExtent
where
    I: IntoIterator<Item = TileCoord>,
{
    let mut columns = BTreeSet::new();
    let mut rows = BTreeSet::new();

    for coord in coords {
        columns.insert(coord.x);
        rows.insert(coord.y);
    }

    GridExtent::new(columns.len() as u32, rows.len() as u32)
}
