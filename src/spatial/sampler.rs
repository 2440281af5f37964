//! Per-row tile sampling
//!
//! A row strip is split into tiles of fixed width, left to right. Each tile is
//! averaged into one color. The rightmost column of the grid is never
//! sampled, whether or not it is a full tile, so a row of `cols` grid columns
//! yields `cols - 1` colors.

use crate::color::{ColorAverager, PixelSample, TileColor};
use crate::io::error::{Result, invalid_input};
use crate::spatial::grid::{TileGeometry, parse_dimension};
use crate::spatial::source::CHANNELS;
use ndarray::{ArrayView1, ArrayView3, Axis, s};

/// Geometry of one row strip as handed to a sampler
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RowGeometry {
    tile_width: usize,
    row_width: usize,
    tile_height: usize,
}

impl RowGeometry {
    /// Create row geometry from tile width, strip width and tile height
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a tile dimension is zero
    pub fn new(tile_width: usize, row_width: usize, tile_height: usize) -> Result<Self> {
        let tile = TileGeometry::new(tile_width, tile_height)?;
        Ok(Self::for_strip(tile, row_width))
    }

    /// Row geometry for strips of an image `row_width` pixels wide
    pub const fn for_strip(tile: TileGeometry, row_width: usize) -> Self {
        Self {
            tile_width: tile.tile_width(),
            row_width,
            tile_height: tile.tile_height(),
        }
    }

    /// Parse row geometry from text
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if any value fails to parse as a non-negative
    /// integer or a tile dimension is zero
    pub fn parse(tile_width: &str, row_width: &str, tile_height: &str) -> Result<Self> {
        Self::new(
            parse_dimension("tile_width", tile_width)?,
            parse_dimension("row_width", row_width)?,
            parse_dimension("tile_height", tile_height)?,
        )
    }

    /// Tile width in pixels
    pub const fn tile_width(&self) -> usize {
        self.tile_width
    }

    /// Strip width in pixels
    pub const fn row_width(&self) -> usize {
        self.row_width
    }

    /// Tile height in pixels
    pub const fn tile_height(&self) -> usize {
        self.tile_height
    }

    /// Grid columns spanned by the strip, including the partial edge
    pub const fn cols(&self) -> usize {
        self.row_width.div_ceil(self.tile_width)
    }

    /// Tiles sampled from one strip
    pub const fn sampled_cols(&self) -> usize {
        self.cols().saturating_sub(1)
    }

    /// Expected length of a strip buffer in bytes
    pub const fn strip_len(&self) -> usize {
        self.row_width * self.tile_height * CHANNELS
    }
}

/// Splits row strips into tiles and averages each one
#[derive(Clone, Copy, Debug)]
pub struct TileSampler {
    geometry: RowGeometry,
}

impl TileSampler {
    /// Create a sampler for strips of the given geometry
    pub const fn new(geometry: RowGeometry) -> Self {
        Self { geometry }
    }

    /// Geometry this sampler expects
    pub const fn geometry(&self) -> RowGeometry {
        self.geometry
    }

    /// Iterate the tile colors of one strip in column order
    ///
    /// Tiles are averaged lazily, one per call to `next`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the buffer is absent or its length does not
    /// match the geometry
    pub fn tiles<'a>(&self, pixels: Option<&'a [u8]>) -> Result<RowTiles<'a>> {
        let pixels = pixels.ok_or_else(|| {
            invalid_input("row_pixels", &"<absent>", &"no pixel data for row")
        })?;

        let shape = (
            self.geometry.tile_height,
            self.geometry.row_width,
            CHANNELS,
        );
        let view = ArrayView3::from_shape(shape, pixels).map_err(|e| {
            invalid_input(
                "row_pixels",
                &pixels.len(),
                &format!("expected {} bytes: {e}", self.geometry.strip_len()),
            )
        })?;

        Ok(RowTiles {
            view,
            tile_width: self.geometry.tile_width,
            next_col: 0,
            sampled_cols: self.geometry.sampled_cols(),
        })
    }

    /// Sample a whole strip, reporting each tile before the next is sampled
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the buffer is absent or malformed; no tile
    /// is reported in that case
    pub fn sample_row<F>(&self, pixels: Option<&[u8]>, mut on_tile: F) -> Result<Vec<TileColor>>
    where
        F: FnMut(usize, TileColor),
    {
        let tiles = self.tiles(pixels)?;
        let mut colors = Vec::with_capacity(self.geometry.sampled_cols());
        for (col, color) in tiles.enumerate() {
            on_tile(col, color);
            colors.push(color);
        }
        Ok(colors)
    }
}

/// Lazy iterator over the sampled tiles of one strip
#[derive(Debug)]
pub struct RowTiles<'a> {
    view: ArrayView3<'a, u8>,
    tile_width: usize,
    next_col: usize,
    sampled_cols: usize,
}

impl Iterator for RowTiles<'_> {
    type Item = TileColor;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_col >= self.sampled_cols {
            return None;
        }
        let left = self.next_col * self.tile_width;
        let tile = self.view.slice(s![.., left..left + self.tile_width, ..]);
        self.next_col += 1;

        let samples = tile.lanes(Axis(2)).into_iter().map(pixel_from_lane);
        Some(ColorAverager::average(samples))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sampled_cols.saturating_sub(self.next_col);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowTiles<'_> {}

fn pixel_from_lane(lane: ArrayView1<'_, u8>) -> PixelSample {
    let mut rgba = [0; CHANNELS];
    for (dst, src) in rgba.iter_mut().zip(lane.iter()) {
        *dst = *src;
    }
    PixelSample::from_rgba(&rgba)
}
