//! Static-path cache keyed by component

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell, RwLock};
use tracing::debug;

use crate::provider::StaticPath;

/// Static paths declared by one component, in declaration order
pub type StaticPathSet = Vec<StaticPath>;

type Slot = Arc<OnceCell<Arc<StaticPathSet>>>;

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Per-component static-path sets
///
/// The first request for a component runs its provider; concurrent requests
/// for the same component wait for that one run. Invalidation detaches the
/// slot, so a run still in flight completes for its own waiters but never
/// lands in the cache.
///
/// [`clear`](Self::clear) starts a new generation. Callers pinned to an older
/// generation still get their provider results, uncached.
#[derive(Debug, Default)]
pub struct StaticPathCache {
    slots: Mutex<HashMap<String, Slot>>,
    generation: AtomicU64,
    stats: RwLock<CacheStats>,
}

impl StaticPathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation, bumped by every [`clear`](Self::clear)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cached set for `component`, running `init` on a miss
    ///
    /// A failed `init` leaves nothing cached; the next call retries.
    pub async fn get_or_try_init<F, Fut, E>(
        &self,
        component: &str,
        init: F,
    ) -> Result<Arc<StaticPathSet>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<StaticPathSet, E>>,
    {
        self.get_or_try_init_in(self.generation(), component, init).await
    }

    /// [`get_or_try_init`](Self::get_or_try_init) for a caller pinned to
    /// `generation`
    ///
    /// When the cache has moved on, `init` runs and its result is returned
    /// without being stored.
    pub async fn get_or_try_init_in<F, Fut, E>(
        &self,
        generation: u64,
        component: &str,
        init: F,
    ) -> Result<Arc<StaticPathSet>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<StaticPathSet, E>>,
    {
        let slot = {
            let mut slots = self.slots.lock().await;
            if self.generation() == generation {
                Some(Arc::clone(slots.entry(component.to_string()).or_default()))
            } else {
                None
            }
        };

        let slot = match slot {
            Some(slot) => slot,
            None => {
                debug!(component, generation, "Stale generation, static paths not cached");
                return init().await.map(Arc::new);
            }
        };

        if let Some(paths) = slot.get() {
            self.stats.write().await.hits += 1;
            debug!(component, "Static paths cache hit");
            return Ok(Arc::clone(paths));
        }

        self.stats.write().await.misses += 1;
        debug!(component, "Static paths cache miss");

        let paths = slot
            .get_or_try_init(|| async move { init().await.map(Arc::new) })
            .await?;
        Ok(Arc::clone(paths))
    }

    /// Drops the entry for `component`
    ///
    /// Returns whether a populated entry was removed.
    pub async fn invalidate(&self, component: &str) -> bool {
        let removed = self.slots.lock().await.remove(component);
        self.stats.write().await.invalidations += 1;

        let was_populated = removed.map_or(false, |slot| slot.initialized());
        debug!(component, was_populated, "Static paths invalidated");
        was_populated
    }

    /// Drops every entry and starts a new generation
    pub async fn clear(&self) {
        let mut slots = self.slots.lock().await;
        slots.clear();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether `component` currently has a populated entry
    pub async fn contains(&self, component: &str) -> bool {
        self.slots
            .lock()
            .await
            .get(component)
            .map_or(false, |slot| slot.initialized())
    }

    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}
