//! Row assembly from out-of-order tile resolutions
//!
//! Tiles of a row resolve in any order, and rows may finish resolving in any
//! order. The assembler fills each row in place, counts resolved columns and
//! releases completed rows strictly by ascending row index so the presentation
//! layer can append them without knowing the image geometry.

use crate::color::TileColor;
use crate::io::error::{Result, sample_failure};
use crate::resolve::lookup::TilePayload;
use crate::spatial::Grid;
use std::collections::BTreeMap;

/// One sampled tile and, once resolved, its rendered payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTile {
    /// Averaged tile color
    pub color: TileColor,
    /// Rendered tile, absent until resolution arrives
    pub payload: Option<TilePayload>,
}

/// Tiles of one grid row in column order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowResult {
    row: usize,
    tiles: Vec<ResolvedTile>,
    expected: usize,
    resolved: usize,
    sampled: bool,
}

impl RowResult {
    /// Create an empty row expecting `expected` tiles
    pub fn new(row: usize, expected: usize) -> Self {
        Self {
            row,
            tiles: Vec::with_capacity(expected),
            expected,
            resolved: 0,
            sampled: false,
        }
    }

    /// Row index within the grid
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Tiles in column order
    pub fn tiles(&self) -> &[ResolvedTile] {
        &self.tiles
    }

    /// Number of tiles resolved so far
    pub const fn resolved(&self) -> usize {
        self.resolved
    }

    /// Sampling of the row finished and every expected tile has resolved data
    pub const fn is_complete(&self) -> bool {
        self.sampled && self.resolved == self.expected
    }

    /// Sampled colors in column order
    pub fn colors(&self) -> impl Iterator<Item = TileColor> + '_ {
        self.tiles.iter().map(|tile| tile.color)
    }

    /// Resolved payloads in column order
    pub fn payloads(&self) -> impl Iterator<Item = &TilePayload> + '_ {
        self.tiles.iter().filter_map(|tile| tile.payload.as_ref())
    }

    fn push(&mut self, col: usize, color: TileColor) -> Result<()> {
        if col != self.tiles.len() || col >= self.expected {
            return Err(sample_failure(
                self.row,
                &format!(
                    "tile {col} arrived out of order ({} of {} sampled)",
                    self.tiles.len(),
                    self.expected
                ),
            ));
        }
        self.tiles.push(ResolvedTile {
            color,
            payload: None,
        });
        Ok(())
    }

    fn fill(&mut self, col: usize, payload: TilePayload) {
        if let Some(tile) = self.tiles.get_mut(col) {
            if tile.payload.is_none() {
                self.resolved += 1;
            }
            tile.payload = Some(payload);
        }
    }
}

/// Tracks in-progress rows and releases completed ones in row order
#[derive(Debug)]
pub struct RowAssembler {
    grid: Grid,
    pending: BTreeMap<usize, RowResult>,
    next_emit: usize,
}

impl RowAssembler {
    /// Create an assembler for every row of `grid`
    pub const fn new(grid: Grid) -> Self {
        Self {
            grid,
            pending: BTreeMap::new(),
            next_emit: 0,
        }
    }

    /// Record a sampled tile color at (`row`, `col`)
    ///
    /// # Errors
    ///
    /// Returns `SampleFailure` if the row is outside the grid, already
    /// emitted, or the column is not the next expected one
    pub fn push_color(&mut self, row: usize, col: usize, color: TileColor) -> Result<()> {
        self.row_mut(row)?.push(col, color)
    }

    /// Record the resolved payload of (`row`, `col`)
    ///
    /// Returns the rows that became ready for emission, in row order.
    pub fn resolve(&mut self, row: usize, col: usize, payload: TilePayload) -> Vec<RowResult> {
        if let Some(result) = self.pending.get_mut(&row) {
            result.fill(col, payload);
        }
        self.drain_ready()
    }

    /// Mark sampling of `row` as finished
    ///
    /// Returns the rows that became ready for emission, in row order.
    ///
    /// # Errors
    ///
    /// Returns `SampleFailure` if the row is outside the grid or already
    /// emitted
    pub fn mark_sampled(&mut self, row: usize) -> Result<Vec<RowResult>> {
        self.row_mut(row)?.sampled = true;
        Ok(self.drain_ready())
    }

    /// Number of rows already released
    pub const fn emitted_rows(&self) -> usize {
        self.next_emit
    }

    /// Every row of the grid has been released
    pub const fn is_finished(&self) -> bool {
        self.next_emit >= self.grid.rows()
    }

    fn row_mut(&mut self, row: usize) -> Result<&mut RowResult> {
        if row >= self.grid.rows() || row < self.next_emit {
            return Err(sample_failure(row, &"row is not awaiting tiles"));
        }
        let expected = self.grid.sampled_cols();
        Ok(self
            .pending
            .entry(row)
            .or_insert_with(|| RowResult::new(row, expected)))
    }

    fn drain_ready(&mut self) -> Vec<RowResult> {
        let mut ready = Vec::new();
        while self
            .pending
            .get(&self.next_emit)
            .is_some_and(RowResult::is_complete)
        {
            if let Some(result) = self.pending.remove(&self.next_emit) {
                ready.push(result);
            }
            self.next_emit += 1;
        }
        ready
    }
}
