//! Progressive photo mosaic construction from a color tile service
//!
//! The source image is partitioned into a fixed grid of tiles. Each tile is
//! reduced to one representative color, each color is resolved to a rendered
//! tile through a deduplicating cache in front of an external lookup service,
//! and completed rows are handed to a presentation sink in image order.

#![deny(unsafe_code)]

/// Pixel and tile color types with color averaging
pub mod color;
/// Input/output operations, configuration and error handling
pub mod io;
/// Run orchestration: execution contexts, row scheduling and run state
pub mod pipeline;
/// Color-to-tile resolution, caching and row assembly
pub mod resolve;
/// Tile geometry, source image buffers and per-row tile sampling
pub mod spatial;

pub use io::error::{ErrorKind, MosaicError, Result};
pub use pipeline::state::{Mosaic, PipelineState, RunHandle};
