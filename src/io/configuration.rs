//! Mosaic constants and runtime configuration defaults

use crate::spatial::TileGeometry;
use image::ImageFormat;
use std::time::Duration;

// Tile geometry shared by the sampler and the tile service
/// Default tile width in pixels
pub const DEFAULT_TILE_WIDTH: usize = 16;
/// Default tile height in pixels
pub const DEFAULT_TILE_HEIGHT: usize = 16;

// Cooperative throttle between sampled rows
/// Delay before sampling the next row
pub const SAMPLING_DELAY_MS: u64 = 1;

// Tile service settings
/// Tile service queried when none is given
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8765/";
/// Upper bound for a single tile request
pub const LOOKUP_TIMEOUT_SECS: u64 = 30;

/// Image formats accepted as mosaic sources
pub const ACCEPTED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Gif];

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Extension of the rendered markup document
pub const OUTPUT_EXTENSION: &str = "html";

/// Where row sampling runs relative to the caller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locality {
    /// Sampling shares the caller's task and yields between tiles
    Inline,
    /// Sampling runs on an isolated blocking thread
    #[default]
    Worker,
}

/// Parameters fixed for the lifetime of a mosaic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MosaicConfig {
    /// Tile dimensions
    pub geometry: TileGeometry,
    /// Pause between sampled rows
    pub row_delay: Duration,
    /// Where sampling runs
    pub locality: Locality,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            geometry: TileGeometry::default(),
            row_delay: Duration::from_millis(SAMPLING_DELAY_MS),
            locality: Locality::default(),
        }
    }
}
