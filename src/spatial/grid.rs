//! Tile geometry and the grid it induces over a source image
//!
//! Tile dimensions are fixed when a mosaic is configured. The grid is derived
//! from the image size and never changes during a run. The rightmost column
//! of every row is counted in the grid but never sampled, so every row
//! carries `cols - 1` tiles.

use crate::io::configuration::{DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH};
use crate::io::error::{Result, invalid_input};

/// Fixed tile dimensions in pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileGeometry {
    tile_width: usize,
    tile_height: usize,
}

impl TileGeometry {
    /// Create a geometry from tile width and height
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either dimension is zero
    pub fn new(tile_width: usize, tile_height: usize) -> Result<Self> {
        if tile_width == 0 {
            return Err(invalid_input("tile_width", &tile_width, &"must be positive"));
        }
        if tile_height == 0 {
            return Err(invalid_input(
                "tile_height",
                &tile_height,
                &"must be positive",
            ));
        }
        Ok(Self {
            tile_width,
            tile_height,
        })
    }

    /// Parse a geometry from textual dimensions
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if either value is not a positive integer
    pub fn parse(tile_width: &str, tile_height: &str) -> Result<Self> {
        Self::new(
            parse_dimension("tile_width", tile_width)?,
            parse_dimension("tile_height", tile_height)?,
        )
    }

    /// Tile width in pixels
    pub const fn tile_width(&self) -> usize {
        self.tile_width
    }

    /// Tile height in pixels
    pub const fn tile_height(&self) -> usize {
        self.tile_height
    }

    /// Number of pixels in one tile
    pub const fn tile_area(&self) -> usize {
        self.tile_width * self.tile_height
    }
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
        }
    }
}

/// Parse a non-negative pixel dimension
///
/// # Errors
///
/// Returns `InvalidInput` naming the parameter when the text is not an
/// unsigned integer
pub fn parse_dimension(parameter: &'static str, text: &str) -> Result<usize> {
    text.trim()
        .parse::<usize>()
        .map_err(|e| invalid_input(parameter, &text, &e))
}

/// Row and column counts covering an image with whole tiles
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Create a grid with explicit dimensions
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Grid covering an image, rounding partial tiles up
    pub const fn for_image(width: usize, height: usize, geometry: TileGeometry) -> Self {
        Self {
            rows: height.div_ceil(geometry.tile_height),
            cols: width.div_ceil(geometry.tile_width),
        }
    }

    /// Number of tile rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of tile columns, including the unsampled right edge column
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Whether a run over this grid has nothing to do
    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Tiles sampled per row
    pub const fn sampled_cols(&self) -> usize {
        self.cols.saturating_sub(1)
    }

    /// Total number of tiles a run samples
    pub const fn sampled_tiles(&self) -> usize {
        self.rows * self.sampled_cols()
    }

    /// Pixel size (width, height) of the assembled mosaic
    pub const fn mosaic_size(&self, geometry: TileGeometry) -> (usize, usize) {
        (
            self.sampled_cols() * geometry.tile_width,
            self.rows * geometry.tile_height,
        )
    }

    /// Sampling progress after `rows_sampled` rows, in percent
    pub fn percent_sampled(&self, rows_sampled: usize) -> f64 {
        if self.rows == 0 {
            return 100.0;
        }
        (rows_sampled.min(self.rows) as f64 / self.rows as f64) * 100.0
    }
}
