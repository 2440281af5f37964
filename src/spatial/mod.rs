//! Spatial layout of a mosaic run
//!
//! This module contains spatial-related functionality including:
//! - Tile geometry and grid dimensions
//! - Source image storage and row strip extraction
//! - Per-row tile sampling

/// Tile geometry and grid dimensions
pub mod grid;
/// Per-row tile sampling
pub mod sampler;
/// Source image storage
pub mod source;

pub use grid::{Grid, TileGeometry};
pub use sampler::{RowGeometry, TileSampler};
pub use source::SourceImage;
