//! Tile resolution through the shared cache and the tile service

use crate::color::TileColor;
use crate::io::error::Result;
use crate::resolve::cache::{CacheStats, ColorCache};
use crate::resolve::lookup::{TileLookup, TilePayload};
use std::future::Future;
use std::sync::Arc;

/// Resolves tile colors through the shared cache and the tile service
///
/// Cloning is cheap and every clone shares one cache, so concurrent requests
/// for the same color from any clone trigger a single external lookup.
pub struct TileResolver<L> {
    lookup: Arc<L>,
    cache: Arc<ColorCache>,
}

impl<L> Clone for TileResolver<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<L: TileLookup> TileResolver<L> {
    /// Create a resolver with an empty cache
    pub fn new(lookup: L) -> Self {
        Self::with_cache(Arc::new(lookup), Arc::new(ColorCache::new()))
    }

    /// Create a resolver over an existing cache
    pub const fn with_cache(lookup: Arc<L>, cache: Arc<ColorCache>) -> Self {
        Self { lookup, cache }
    }

    /// Shared color cache
    pub const fn cache(&self) -> &Arc<ColorCache> {
        &self.cache
    }

    /// Cache statistics accumulated so far
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Resolve one tile color to its rendered payload
    ///
    /// The returned future owns everything it needs, so it can be spawned
    /// and awaited independently of the resolver.
    pub fn resolve(
        &self,
        color: TileColor,
    ) -> impl Future<Output = Result<TilePayload>> + Send + use<L> {
        let lookup = Arc::clone(&self.lookup);
        let cache = Arc::clone(&self.cache);
        async move {
            let key = color.key();
            cache.get_or_lookup(&key, || lookup.lookup(&key)).await
        }
    }
}
