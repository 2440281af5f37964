//! Unit tests mirroring the `src/` tree, one file per source file


/// Test doubles shared by the unit tests
#[allow(dead_code)]
mod support {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tilemosaic::color::ColorKey;
    use tilemosaic::io::error::lookup_failure;
    use tilemosaic::resolve::{TileLookup, TilePayload};
    use tokio::sync::Semaphore;

    /// Lookup answering every key with `<td>key</td>` and counting calls
    #[derive(Default)]
    pub struct CountingLookup {
        calls: AtomicUsize,
    }

    impl CountingLookup {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TileLookup for CountingLookup {
        async fn lookup(&self, key: &ColorKey) -> tilemosaic::Result<TilePayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(cell_for(key))
        }
    }

    /// Lookup answering immediately without yielding to the runtime
    pub struct InstantLookup;

    impl TileLookup for InstantLookup {
        async fn lookup(&self, key: &ColorKey) -> tilemosaic::Result<TilePayload> {
            Ok(cell_for(key))
        }
    }

    /// Lookup that blocks until the test opens its gate
    pub struct GatedLookup {
        gate: Arc<Semaphore>,
        calls: AtomicUsize,
    }

    impl GatedLookup {
        pub fn new() -> (Self, Arc<Semaphore>) {
            let gate = Arc::new(Semaphore::new(0));
            let lookup = Self {
                gate: Arc::clone(&gate),
                calls: AtomicUsize::new(0),
            };
            (lookup, gate)
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TileLookup for GatedLookup {
        async fn lookup(&self, key: &ColorKey) -> tilemosaic::Result<TilePayload> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let permit = self
                .gate
                .acquire()
                .await
                .map_err(|e| lookup_failure(key, &e))?;
            drop(permit);
            Ok(cell_for(key))
        }
    }

    /// Lookup that fails for one key and succeeds for the rest
    pub struct FailingLookup {
        pub failing: ColorKey,
    }

    impl TileLookup for FailingLookup {
        async fn lookup(&self, key: &ColorKey) -> tilemosaic::Result<TilePayload> {
            if *key == self.failing {
                return Err(lookup_failure(key, &"service unavailable"));
            }
            Ok(cell_for(key))
        }
    }

    pub fn cell_for(key: &ColorKey) -> TilePayload {
        TilePayload::new(format!("<td>{key}</td>"))
    }
}
