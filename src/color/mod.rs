//! Color primitives for tile sampling
//!
//! This module contains:
//! - Raw pixel samples and averaged tile colors
//! - Canonical hex keys used to address the tile service and the cache
//! - The representative color computation for one tile

/// Representative color computation for a block of pixels
pub mod averager;
/// Pixel, tile color and color key types
pub mod sample;

pub use averager::ColorAverager;
pub use sample::{ColorKey, PixelSample, TileColor};
