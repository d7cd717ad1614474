//! Time-boxed read-through cache holding a single snapshot.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::debug;

use super::clock::Clock;

struct CacheEntry<T> {
    payload: Arc<T>,
    fetched_at_ms: i64,
}

struct Slot<T> {
    entry: Option<CacheEntry<T>>,
    /// Bumped by every `invalidate`; a fetch may only store into the generation it started in.
    generation: u64,
}

/// Serves one cached value while it is younger than the freshness window and
/// refetches it from upstream otherwise.
///
/// Concurrent misses are coalesced: only one upstream fetch runs at a time and
/// callers queued behind it re-check freshness before fetching again. A fetch
/// that completes after an `invalidate` still returns its value to its caller
/// but is not stored.
pub struct TimedCache<T> {
    name: &'static str,
    slot: Mutex<Slot<T>>,
    fetch_lock: tokio::sync::Mutex<()>,
    ttl_ms: i64,
    clock: Arc<dyn Clock>,
}

impl<T> TimedCache<T> {
    pub fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            slot: Mutex::new(Slot {
                entry: None,
                generation: 0,
            }),
            fetch_lock: tokio::sync::Mutex::new(()),
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            clock,
        }
    }

    /// Return the cached value if fresh, otherwise run `fetch` and store its result.
    ///
    /// Errors from `fetch` are returned unchanged and leave the current entry,
    /// stale or not, in place.
    pub async fn get_or_fetch<F, Fut, E>(&self, fetch: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(hit) = self.fresh() {
            debug!("{} cache hit", self.name);
            return Ok(hit);
        }

        let _fetching = self.fetch_lock.lock().await;
        if let Some(hit) = self.fresh() {
            debug!("{} cache filled by a concurrent fetch", self.name);
            return Ok(hit);
        }

        let generation = self.lock_slot().generation;
        debug!("{} cache miss, fetching upstream", self.name);
        let payload = Arc::new(fetch().await?);
        self.store(generation, Arc::clone(&payload));
        Ok(payload)
    }

    /// Drop the cached value; the next lookup always goes upstream.
    pub fn invalidate(&self) {
        let mut slot = self.lock_slot();
        slot.entry = None;
        slot.generation += 1;
        debug!("{} cache invalidated", self.name);
    }

    fn fresh(&self) -> Option<Arc<T>> {
        let now = self.clock.now_millis();
        let slot = self.lock_slot();
        let entry = slot.entry.as_ref()?;
        if now.saturating_sub(entry.fetched_at_ms) < self.ttl_ms {
            Some(Arc::clone(&entry.payload))
        } else {
            None
        }
    }

    fn store(&self, generation: u64, payload: Arc<T>) {
        let fetched_at_ms = self.clock.now_millis();
        let mut slot = self.lock_slot();
        if slot.generation != generation {
            debug!("{} cache discarding a fetch that finished after invalidation", self.name);
            return;
        }
        slot.entry = Some(CacheEntry {
            payload,
            fetched_at_ms,
        });
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current entry regardless of age.
    #[cfg(test)]
    fn peek(&self) -> Option<Arc<T>> {
        self.lock_slot().entry.as_ref().map(|e| Arc::clone(&e.payload))
    }
}
