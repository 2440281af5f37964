//! Tests for the single-flight color cache

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tilemosaic::color::{ColorKey, TileColor};
    use tilemosaic::io::error::lookup_failure;
    use tilemosaic::resolve::{CacheStats, ColorCache, TilePayload};
    use tilemosaic::{ErrorKind, Result};

    fn key(hex: &str) -> ColorKey {
        ColorKey::parse(hex).unwrap()
    }

    async fn answer(text: String) -> Result<TilePayload> {
        Ok(TilePayload::new(text))
    }

    async fn slow_answer(text: String) -> Result<TilePayload> {
        tokio::time::sleep(Duration::from_millis(20)).await;
        Ok(TilePayload::new(text))
    }

    async fn refuse(hex: &'static str) -> Result<TilePayload> {
        Err(lookup_failure(&hex, &"service down"))
    }

    // Tests a cached key is answered without another lookup
    // Verified by clearing the cell after each lookup
    #[tokio::test]
    async fn test_second_request_hits_cache() {
        let cache = ColorCache::new();
        let calls = AtomicUsize::new(0);
        let lookup = || {
            calls.fetch_add(1, Ordering::SeqCst);
            answer("tile".to_string())
        };

        let first = cache.get_or_lookup(&key("ff0000"), lookup).await.unwrap();
        let second = cache.get_or_lookup(&key("ff0000"), lookup).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                lookups: 1
            }
        );
        assert_eq!(cache.get(&key("FF0000")), Some(TilePayload::new("tile")));
    }

    // Tests concurrent requests for one key share a single lookup
    // Verified by creating a fresh cell per request
    #[tokio::test]
    async fn test_concurrent_requests_share_lookup() {
        let cache = ColorCache::new();
        let calls = AtomicUsize::new(0);
        let lookup = || {
            calls.fetch_add(1, Ordering::SeqCst);
            slow_answer("shared".to_string())
        };

        let k = key("00ff00");
        let (a, b) = tokio::join!(
            cache.get_or_lookup(&k, lookup),
            cache.get_or_lookup(&k, lookup)
        );

        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().lookups, 1);
        assert_eq!(cache.stats().requests(), 2);
    }

    // Tests different keys resolve independently
    // Verified by keying the cache on the first key only
    #[tokio::test]
    async fn test_distinct_keys_each_lookup() {
        let cache = ColorCache::new();
        for color in [TileColor::new(1, 0, 0), TileColor::new(0, 1, 0)] {
            let k = color.key();
            let payload = cache
                .get_or_lookup(&k, || answer(k.to_string()))
                .await
                .unwrap();
            assert_eq!(payload.as_str(), k.as_str());
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().lookups, 2);
    }

    // Tests a failed lookup is reported and leaves the key unresolved
    // Verified by caching the error as a value
    #[tokio::test]
    async fn test_failed_lookup_is_not_cached() {
        let cache = ColorCache::new();
        let k = key("0000ff");

        let error = cache
            .get_or_lookup(&k, || refuse("0000ff"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::LookupFailure);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&k), None);

        let payload = cache
            .get_or_lookup(&k, || answer("recovered".to_string()))
            .await
            .unwrap();
        assert_eq!(payload.as_str(), "recovered");
        assert_eq!(cache.stats().lookups, 2);
    }
}
