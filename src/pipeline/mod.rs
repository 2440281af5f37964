//! Run orchestration
//!
//! This module contains:
//! - Execution contexts that sample rows inline or on a worker thread
//! - The row scheduler driving sampling and resolution of one run
//! - Run events and summaries
//! - The mosaic entry point guarding the single active run

/// Inline and worker sampling contexts
pub mod context;
/// Run events and summaries
pub mod events;
/// Row scheduling for one run
pub mod scheduler;
/// Run lifecycle and handles
pub mod state;

pub use context::{ExecutionContext, InlineContext, RowJob, SampleEvent, WorkerContext};
pub use events::{RunEvent, RunSummary};
pub use scheduler::RowScheduler;
pub use state::{Mosaic, PipelineState, RunHandle};
