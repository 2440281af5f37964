//! Color resolution
//!
//! This module contains:
//! - The tile service capability and its HTTP implementation
//! - The deduplicating color cache
//! - Row assembly that releases completed rows in order
//! - The resolver tying cache and service together

/// Row results and ordered row assembly
pub mod assembly;
/// Single-flight color cache
pub mod cache;
/// Tile service capability and HTTP client
pub mod lookup;
/// Cached color resolution
pub mod resolver;

pub use assembly::{ResolvedTile, RowAssembler, RowResult};
pub use cache::{CacheStats, ColorCache};
pub use lookup::{HttpTileLookup, TileLookup, TilePayload};
pub use resolver::TileResolver;
