//! Coordinate type definitions

use std::fmt;

/// Edge length of every panorama tile, in pixels, at every zoom level.
pub const TILE_SIZE: u32 = 512;

/// Supported zoom levels.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 5;

/// Position of a tile within a panorama's tile grid.
///
/// `x` grows to the right (column), `y` grows downwards (row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column index, 0 at the left edge
    pub x: u32,
    /// Row index, 0 at the top edge
    pub y: u32,
}

impl TileCoord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Pixel offset of this tile's top-left corner on the stitched canvas.
    #[inline]
    pub fn pixel_offset(&self) -> (u32, u32) {
        (self.x * TILE_SIZE, self.y * TILE_SIZE)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// A number of tiles along each axis of a panorama grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridExtent {
    /// Tiles along x
    pub columns: u32,
    /// Tiles along y
    pub rows: u32,
}

impl GridExtent {
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Total number of cells in the grid.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Returns true if `coord` lies inside this grid.
    #[inline]
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x < self.columns && coord.y < self.rows
    }

    /// Iterates over every cell, column by column (x-major, then y).
    pub fn cells(&self) -> GridCells {
        GridCells {
            extent: *self,
            current: 0,
        }
    }
}

impl fmt::Display for GridExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Iterator over all cells of a [`GridExtent`].
#[derive(Debug, Clone)]
pub struct GridCells {
    extent: GridExtent,
    current: usize,
}

impl Iterator for GridCells {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.extent.cell_count() {
            return None;
        }

        let rows = self.extent.rows as usize;
        let x = (self.current / rows) as u32;
        let y = (self.current % rows) as u32;

        self.current += 1;

        Some(TileCoord { x, y })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.extent.cell_count() - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridCells {}

/// Panorama zoom level (0-5).
///
/// The zoom level selects the tile grid that is requested and the strategy
/// used to work out the final panorama size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoomLevel(u8);

impl ZoomLevel {
    /// Creates a zoom level, rejecting values above [`MAX_ZOOM`].
    pub fn new(zoom: u8) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        Ok(Self(zoom))
    }

    /// Returns the raw zoom value.
    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Tile grid requested for this zoom level.
    ///
    /// This is always the current-format grid. Legacy panoramas are smaller,
    /// so the cells along the far edges simply come back empty.
    pub fn grid(&self) -> GridExtent {
        let columns = 1u32 << self.0;
        let rows = if self.0 == 0 { 1 } else { 1u32 << (self.0 - 1) };
        GridExtent::new(columns, rows)
    }
}

impl TryFrom<u8> for ZoomLevel {
    type Error = CoordError;

    fn try_from(zoom: u8) -> Result<Self, Self::Error> {
        Self::new(zoom)
    }
}

impl fmt::Display for ZoomLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Final pixel size of a stitched panorama.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanoramaDimensions {
    pub width: u32,
    pub height: u32,
}

impl PanoramaDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for PanoramaDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Errors that can occur when building coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Zoom level is outside valid range (0 to 5)
    InvalidZoom(u8),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between {} and {})",
                    zoom, MIN_ZOOM, MAX_ZOOM
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
