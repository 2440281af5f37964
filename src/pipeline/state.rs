//! Run lifecycle: one active run per mosaic, observed through a handle

use crate::io::configuration::{Locality, MosaicConfig};
use crate::io::error::{ErrorKind, MosaicError, Result, sample_failure};
use crate::io::render::RowSink;
use crate::pipeline::context::ExecutionContext;
use crate::pipeline::events::{RunEvent, RunSummary};
use crate::pipeline::scheduler::RowScheduler;
use crate::resolve::{ColorCache, RowResult, TileLookup, TileResolver};
use crate::spatial::{Grid, SourceImage};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Lifecycle state of a mosaic
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineState {
    /// No run active; the previous one, if any, fully resolved
    #[default]
    Idle,
    /// A run is sampling or resolving
    Running,
    /// The previous run aborted
    Error(ErrorKind),
}

impl PipelineState {
    /// Whether a new run may start
    pub const fn accepts_run(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Entry point turning source images into mosaic rows
///
/// Tile geometry and execution locality are fixed at construction. The
/// color cache lives as long as the mosaic and is shared by all its runs.
pub struct Mosaic<C, L> {
    config: MosaicConfig,
    context: Arc<C>,
    resolver: TileResolver<L>,
    state: Arc<Mutex<PipelineState>>,
}

impl<L: TileLookup> Mosaic<Locality, L> {
    /// Create a mosaic sampling where `config.locality` says
    pub fn new(config: MosaicConfig, lookup: L) -> Self {
        Self::with_context(config, config.locality, lookup)
    }
}

impl<C: ExecutionContext, L: TileLookup> Mosaic<C, L> {
    /// Create a mosaic sampling on a custom execution context
    pub fn with_context(config: MosaicConfig, context: C, lookup: L) -> Self {
        Self {
            config,
            context: Arc::new(context),
            resolver: TileResolver::new(lookup),
            state: Arc::new(Mutex::new(PipelineState::Idle)),
        }
    }

    /// Configuration the mosaic was built with
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        *self.state.lock()
    }

    /// Color cache shared by all runs
    pub const fn cache(&self) -> &Arc<ColorCache> {
        self.resolver.cache()
    }

    /// Grid a run over `image` would cover
    pub fn grid_for(&self, image: &SourceImage) -> Grid {
        Grid::for_image(image.width(), image.height(), self.config.geometry)
    }

    /// Start a run over `image`
    ///
    /// Must be called from within a Tokio runtime. The run proceeds in the
    /// background until it fully resolves or fails; there is no cancellation.
    ///
    /// # Errors
    ///
    /// Returns `Busy` without touching the active run if one is in progress
    pub fn start(&self, image: SourceImage) -> Result<RunHandle> {
        {
            let mut state = self.state.lock();
            if !state.accepts_run() {
                return Err(MosaicError::Busy);
            }
            *state = PipelineState::Running;
        }

        let scheduler = RowScheduler::new(
            Arc::clone(&self.context),
            self.resolver.clone(),
            self.config.geometry,
            self.config.row_delay,
        );
        let state = Arc::clone(&self.state);
        let (events, receiver) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let run_events = events.clone();
            let run = tokio::spawn(async move { scheduler.run(image, &run_events).await });
            // A panicking context must not leave the mosaic stuck in Running
            let outcome = run.await.unwrap_or_else(|e| {
                Err(sample_failure(0, &format!("sampling task aborted: {e}")))
            });
            let (next, terminal) = match outcome {
                Ok(summary) => (PipelineState::Idle, RunEvent::Resolved(summary)),
                Err(e) => {
                    log::warn!("Mosaic run aborted: {e}");
                    (PipelineState::Error(e.kind()), RunEvent::Failed(e))
                }
            };
            // Settle the state first so the terminal event can start a new run
            *state.lock() = next;
            let _ = events.send(terminal);
        });

        Ok(RunHandle {
            events: receiver,
            task,
        })
    }
}

/// Owner's view of one run
#[derive(Debug)]
pub struct RunHandle {
    events: mpsc::UnboundedReceiver<RunEvent>,
    task: JoinHandle<()>,
}

impl RunHandle {
    /// Next event of the run, `None` once the terminal event was consumed
    pub async fn next_event(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// Whether the background run has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Feed completed rows to `sink` until the run ends
    ///
    /// `observer` sees every event before it is acted on.
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the run, or the first error raised by
    /// `sink`. In the latter case the run keeps going in the background.
    pub async fn drive<S, F>(mut self, sink: &mut S, mut observer: F) -> Result<RunSummary>
    where
        S: RowSink + ?Sized,
        F: FnMut(&RunEvent),
    {
        while let Some(event) = self.events.recv().await {
            observer(&event);
            match event {
                RunEvent::RowComplete(row) => sink.render_row(&row)?,
                RunEvent::Resolved(summary) => {
                    sink.finish(&summary)?;
                    return Ok(summary);
                }
                RunEvent::Failed(e) => return Err(e),
                RunEvent::Progress { .. }
                | RunEvent::RowSampled { .. }
                | RunEvent::SamplingComplete { .. } => {}
            }
        }
        Err(MosaicError::SampleFailure {
            row: 0,
            reason: "run ended without a terminal event".to_string(),
        })
    }

    /// Wait for the run to end without rendering its rows
    ///
    /// # Errors
    ///
    /// Returns the error that aborted the run
    pub async fn wait(self) -> Result<RunSummary> {
        let mut rows: Vec<RowResult> = Vec::new();
        self.drive(&mut rows, |_| {}).await
    }
}
