//! Run events and summaries reported to the owner of a mosaic run

use crate::color::TileColor;
use crate::io::error::MosaicError;
use crate::resolve::{CacheStats, RowResult};
use crate::spatial::Grid;
use std::time::Duration;
use tokio::sync::mpsc;

/// Notification delivered to the owner of a run, in the order it happened
#[derive(Debug)]
pub enum RunEvent {
    /// A tile was sampled and its resolution started
    Progress {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// Averaged tile color
        color: TileColor,
    },
    /// Sampling of a row finished
    RowSampled {
        /// Row index
        row: usize,
        /// Rows sampled so far over total rows, in percent
        percent: f64,
    },
    /// Every row of the image has been sampled
    SamplingComplete {
        /// Number of rows sampled
        rows: usize,
    },
    /// A row finished resolving; rows arrive in ascending index order
    RowComplete(RowResult),
    /// Terminal: every row was sampled and resolved
    Resolved(RunSummary),
    /// Terminal: the run aborted
    Failed(MosaicError),
}

impl RunEvent {
    /// Whether no further event follows this one
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved(_) | Self::Failed(_))
    }
}

/// Totals reported by a finished run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunSummary {
    /// Grid the run covered
    pub grid: Grid,
    /// Rows handed to the presentation layer
    pub rows_emitted: usize,
    /// Tiles whose payload resolved
    pub tiles_resolved: usize,
    /// Cache statistics at the end of the run
    pub cache: CacheStats,
    /// Wall time from start to full resolution
    pub elapsed: Duration,
}

/// Channel end a run reports its events on
pub type RunSender = mpsc::UnboundedSender<RunEvent>;
