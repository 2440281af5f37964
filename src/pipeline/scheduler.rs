//! Row-by-row sampling with pipelined tile resolution
//!
//! Rows are sampled strictly in ascending order; the next row is dispatched
//! only after the previous one reported `RowSampled`, with a short pause in
//! between so the runtime can serve other work. Every sampled tile starts its
//! resolution immediately, so lookups for a row overlap with sampling of the
//! remaining tiles and of later rows. Completed rows are released in row
//! order by the [`RowAssembler`].

use crate::io::error::{Result, lookup_failure, sample_failure};
use crate::pipeline::context::{ExecutionContext, RowJob, SampleEvent};
use crate::pipeline::events::{RunEvent, RunSender, RunSummary};
use crate::resolve::{RowAssembler, TileLookup, TilePayload, TileResolver};
use crate::spatial::{Grid, RowGeometry, SourceImage, TileGeometry};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

/// Outcome of one spawned resolution: (`row`, `col`, payload)
type Resolution = (usize, usize, Result<TilePayload>);

/// Drives sampling and resolution for one run
pub struct RowScheduler<C, L> {
    context: Arc<C>,
    resolver: TileResolver<L>,
    geometry: TileGeometry,
    row_delay: Duration,
}

/// Mutable bookkeeping of a run in progress
struct RunProgress {
    grid: Grid,
    assembler: RowAssembler,
    resolutions: JoinSet<Resolution>,
    tiles_resolved: usize,
}

impl<C: ExecutionContext, L: TileLookup> RowScheduler<C, L> {
    /// Create a scheduler sampling through `context` and resolving through
    /// `resolver`
    pub const fn new(
        context: Arc<C>,
        resolver: TileResolver<L>,
        geometry: TileGeometry,
        row_delay: Duration,
    ) -> Self {
        Self {
            context,
            resolver,
            geometry,
            row_delay,
        }
    }

    /// Sample and resolve every row of `image`, reporting on `events`
    ///
    /// Terminal events are left to the caller; this only returns the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first `SampleFailure` or `LookupFailure`. Rows already
    /// reported as complete stay reported.
    pub async fn run(&self, image: SourceImage, events: &RunSender) -> Result<RunSummary> {
        let started = Instant::now();
        let grid = Grid::for_image(image.width(), image.height(), self.geometry);
        log::info!(
            "Sampling {}x{} image as {} rows of {} tiles on the {} context",
            image.width(),
            image.height(),
            grid.rows(),
            grid.sampled_cols(),
            self.context.name()
        );

        let mut run = RunProgress {
            grid,
            assembler: RowAssembler::new(grid),
            resolutions: JoinSet::new(),
            tiles_resolved: 0,
        };

        if grid.is_empty() {
            emit(events, RunEvent::SamplingComplete { rows: 0 });
        } else {
            self.sample_rows(&image, &mut run, events).await?;
            emit(events, RunEvent::SamplingComplete { rows: grid.rows() });
            log::info!("Sampling complete, waiting on {} lookups", run.resolutions.len());

            while let Some(joined) = run.resolutions.join_next().await {
                run.settle(joined, events)?;
            }

            if !run.assembler.is_finished() {
                return Err(sample_failure(
                    run.assembler.emitted_rows(),
                    &"row never completed resolution",
                ));
            }
        }

        let summary = RunSummary {
            grid,
            rows_emitted: run.assembler.emitted_rows(),
            tiles_resolved: run.tiles_resolved,
            cache: self.resolver.stats(),
            elapsed: started.elapsed(),
        };
        log::info!(
            "Mosaic resolved: {} rows, {} tiles, {} lookups in {:.2?}",
            summary.rows_emitted,
            summary.tiles_resolved,
            summary.cache.lookups,
            summary.elapsed
        );
        Ok(summary)
    }

    async fn sample_rows(
        &self,
        image: &SourceImage,
        run: &mut RunProgress,
        events: &RunSender,
    ) -> Result<()> {
        let rows = run.grid.rows();
        let geometry = RowGeometry::for_strip(self.geometry, image.width());
        let (sample_tx, mut sample_rx) = mpsc::unbounded_channel();

        for row in 0..rows {
            let job = RowJob {
                row,
                geometry,
                pixels: Some(image.row_strip(row, self.geometry.tile_height())),
            };
            log::debug!("Dispatching row {row}/{rows}");

            let dispatch = self.context.sample_row(job, sample_tx.clone());
            tokio::pin!(dispatch);
            let mut dispatched = false;

            loop {
                tokio::select! {
                    biased;
                    Some(event) = sample_rx.recv() => {
                        if self.on_sample_event(event, run, events)? {
                            break;
                        }
                    }
                    Some(joined) = run.resolutions.join_next(), if !run.resolutions.is_empty() => {
                        run.settle(joined, events)?;
                    }
                    () = &mut dispatch, if !dispatched => dispatched = true,
                }
            }

            if row + 1 < rows {
                self.throttle().await;
            }
        }
        Ok(())
    }

    /// Apply one sampling event; returns whether the current row is done
    fn on_sample_event(
        &self,
        event: SampleEvent,
        run: &mut RunProgress,
        events: &RunSender,
    ) -> Result<bool> {
        match event {
            SampleEvent::Progress { row, col, color } => {
                run.assembler.push_color(row, col, color)?;
                emit(events, RunEvent::Progress { row, col, color });

                let resolution = self.resolver.resolve(color);
                run.resolutions
                    .spawn(async move { (row, col, resolution.await) });
                Ok(false)
            }
            SampleEvent::RowSampled { row, colors } => {
                if colors.len() != run.grid.sampled_cols() {
                    return Err(sample_failure(
                        row,
                        &format!(
                            "sampled {} tiles, expected {}",
                            colors.len(),
                            run.grid.sampled_cols()
                        ),
                    ));
                }
                let percent = run.grid.percent_sampled(row + 1);
                log::debug!("Row {row} sampled ({percent:.0}%)");
                emit(events, RunEvent::RowSampled { row, percent });

                for ready in run.assembler.mark_sampled(row)? {
                    emit(events, RunEvent::RowComplete(ready));
                }
                Ok(true)
            }
            SampleEvent::Failed { row, error } => {
                log::warn!("Sampling row {row} failed: {error}");
                Err(error)
            }
        }
    }

    async fn throttle(&self) {
        if self.row_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.row_delay).await;
        }
    }
}

impl RunProgress {
    fn settle(
        &mut self,
        joined: std::result::Result<Resolution, JoinError>,
        events: &RunSender,
    ) -> Result<()> {
        let (row, col, outcome) = joined.map_err(|e| lookup_failure(&"<task>", &e))?;
        let payload = outcome.inspect_err(|e| log::warn!("Resolving tile ({row}, {col}) failed: {e}"))?;
        self.tiles_resolved += 1;

        for ready in self.assembler.resolve(row, col, payload) {
            log::debug!("Row {} resolved", ready.row());
            emit(events, RunEvent::RowComplete(ready));
        }
        Ok(())
    }
}

// A dropped receiver only means nobody is listening; the run carries on
fn emit(events: &RunSender, event: RunEvent) {
    let _ = events.send(event);
}
