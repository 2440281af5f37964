//! Execution contexts for row sampling
//!
//! The scheduler hands each row to an [`ExecutionContext`] and listens for
//! [`SampleEvent`]s on a channel. Two contexts exist:
//!
//! ```text
//! InlineContext:  scheduler task ── sample tile ── yield ── sample tile ── ...
//!
//! WorkerContext:  scheduler task ──(RowJob by value)──► blocking thread
//!                       ▲                                    │
//!                       └──── Progress / RowSampled / Failed ┘
//! ```
//!
//! Either way the only data crossing the boundary is the job itself and the
//! events sent back.

use crate::color::TileColor;
use crate::io::configuration::Locality;
use crate::io::error::{MosaicError, sample_failure};
use crate::spatial::{RowGeometry, TileSampler};
use std::future::Future;
use tokio::sync::mpsc;

/// One row of sampling work, owned by whichever context runs it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowJob {
    /// Row index within the grid
    pub row: usize,
    /// Strip geometry
    pub geometry: RowGeometry,
    /// Flat RGBA strip, absent when the row could not be read
    pub pixels: Option<Vec<u8>>,
}

/// Notification sent from a sampling context to the scheduler
#[derive(Debug)]
pub enum SampleEvent {
    /// One tile was sampled; sent before the next tile is sampled
    Progress {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
        /// Averaged tile color
        color: TileColor,
    },
    /// The whole row was sampled
    RowSampled {
        /// Row index
        row: usize,
        /// Every sampled color in column order
        colors: Vec<TileColor>,
    },
    /// Sampling of the row failed; no further event follows for it
    Failed {
        /// Row index
        row: usize,
        /// Cause of the failure
        error: MosaicError,
    },
}

/// Channel end a context reports sampling events on
pub type SampleSender = mpsc::UnboundedSender<SampleEvent>;

/// Capability to sample rows somewhere
pub trait ExecutionContext: Send + Sync + 'static {
    /// Sample one row, reporting through `events`
    ///
    /// Every tile produces a `Progress` event, followed by exactly one
    /// `RowSampled` or `Failed`. All events are sent before the returned
    /// future completes.
    fn sample_row(&self, job: RowJob, events: SampleSender) -> impl Future<Output = ()> + Send;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Samples on the calling task, yielding to the runtime after every tile
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineContext;

impl ExecutionContext for InlineContext {
    async fn sample_row(&self, job: RowJob, events: SampleSender) {
        let row = job.row;
        let sampler = TileSampler::new(job.geometry);
        let tiles = match sampler.tiles(job.pixels.as_deref()) {
            Ok(tiles) => tiles,
            Err(e) => {
                let _ = events.send(SampleEvent::Failed {
                    row,
                    error: sample_failure(row, &e),
                });
                return;
            }
        };

        let mut colors = Vec::with_capacity(tiles.len());
        for (col, color) in tiles.enumerate() {
            if events
                .send(SampleEvent::Progress { row, col, color })
                .is_err()
            {
                return;
            }
            colors.push(color);
            tokio::task::yield_now().await;
        }
        let _ = events.send(SampleEvent::RowSampled { row, colors });
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}

/// Samples on the blocking thread pool, in parallel with the caller
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkerContext;

impl ExecutionContext for WorkerContext {
    async fn sample_row(&self, job: RowJob, events: SampleSender) {
        let row = job.row;
        let fallback = events.clone();
        let task = tokio::task::spawn_blocking(move || sample_job(job, &events));
        if let Err(e) = task.await {
            let _ = fallback.send(SampleEvent::Failed {
                row,
                error: sample_failure(row, &e),
            });
        }
    }

    fn name(&self) -> &'static str {
        "worker"
    }
}

impl ExecutionContext for Locality {
    async fn sample_row(&self, job: RowJob, events: SampleSender) {
        match self {
            Self::Inline => InlineContext.sample_row(job, events).await,
            Self::Worker => WorkerContext.sample_row(job, events).await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Inline => InlineContext.name(),
            Self::Worker => WorkerContext.name(),
        }
    }
}

// Runs entirely on the worker thread; only `job` and the events cross over.
// Stops at the first failed send since nobody is listening any more.
fn sample_job(job: RowJob, events: &SampleSender) {
    let row = job.row;
    let sampler = TileSampler::new(job.geometry);
    let tiles = match sampler.tiles(job.pixels.as_deref()) {
        Ok(tiles) => tiles,
        Err(e) => {
            let _ = events.send(SampleEvent::Failed {
                row,
                error: sample_failure(row, &e),
            });
            return;
        }
    };

    let mut colors = Vec::with_capacity(tiles.len());
    for (col, color) in tiles.enumerate() {
        if events
            .send(SampleEvent::Progress { row, col, color })
            .is_err()
        {
            log::debug!("Row {row} abandoned after {col} tiles, receiver closed");
            return;
        }
        colors.push(color);
    }
    let _ = events.send(SampleEvent::RowSampled { row, colors });
}
