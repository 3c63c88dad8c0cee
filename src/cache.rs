//! Cache structures used by the expansion pipeline.
//!
//! Two shapes of cache cover the pipeline's needs:
//!
//! - [`SingleFlightCache`] holds expensive retrieval results (expansion
//!   sets). It guarantees at-most-one concurrent computation per key:
//!   concurrent requests for the same key block on the one in-flight
//!   computation instead of issuing duplicate retrievals. Failed
//!   computations are not cached, so the next request retries.
//! - [`BoundedCache`] holds many small values (feature vectors, per-term
//!   scores) under a fixed entry limit with least-recently-used eviction.

use std::hash::Hash;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;

/// A concurrent cache with single-flight semantics per key.
pub struct SingleFlightCache<K, V> {
    slots: Mutex<AHashMap<K, Arc<Mutex<Option<V>>>>>,
}

impl<K, V> SingleFlightCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty cache.
    pub fn new() -> Self {
        SingleFlightCache {
            slots: Mutex::new(AHashMap::new()),
        }
    }

    /// Get the cached value for `key`, or compute and cache it.
    ///
    /// While the computation runs, other callers for the same key block on
    /// its slot; callers for different keys proceed independently. A caller
    /// waking on a slot that an invalidation or a failed computation has
    /// detached from the map re-enters through the map, so at most one
    /// computation per key is in flight at any moment.
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let slot = self.slot(key.clone());
        {
            let mut guard = slot.lock();
            if let Some(value) = guard.as_ref() {
                return value.clone();
            }
            if self.is_current(&key, &slot) {
                let value = compute();
                *guard = Some(value.clone());
                return value;
            }
        }
        // The slot was detached while this thread waited on it.
        self.get_or_compute(key, compute)
    }

    /// Fallible variant of [`get_or_compute`](Self::get_or_compute).
    ///
    /// A failed computation leaves the key uncached, so a later request
    /// computes again rather than observing a stale error.
    pub fn get_or_try_compute<F, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let slot = self.slot(key.clone());
        {
            let mut guard = slot.lock();
            if let Some(value) = guard.as_ref() {
                return Ok(value.clone());
            }
            if self.is_current(&key, &slot) {
                return match compute() {
                    Ok(value) => {
                        *guard = Some(value.clone());
                        Ok(value)
                    }
                    Err(e) => {
                        self.remove_if_current(&key, &slot);
                        Err(e)
                    }
                };
            }
        }
        self.get_or_try_compute(key, compute)
    }

    /// Peek at a cached value without computing.
    pub fn get(&self, key: &K) -> Option<V> {
        let slot = self.slots.lock().get(key).cloned()?;
        let guard = slot.lock();
        guard.clone()
    }

    /// Drop the entry for `key`, forcing the next request to recompute.
    pub fn invalidate(&self, key: &K) {
        self.slots.lock().remove(key);
    }

    /// Replace the cached value for `key`.
    pub fn replace(&self, key: K, value: V) {
        let slot = self.slot(key);
        *slot.lock() = Some(value);
    }

    /// Number of keys with a slot (cached or in flight).
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// Snapshot of the currently cached keys.
    pub fn keys(&self) -> Vec<K> {
        self.slots.lock().keys().cloned().collect()
    }

    /// Whether the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }

    fn slot(&self, key: K) -> Arc<Mutex<Option<V>>> {
        self.slots.lock().entry(key).or_default().clone()
    }

    /// Whether `slot` is still the one the map holds for `key`.
    fn is_current(&self, key: &K, slot: &Arc<Mutex<Option<V>>>) -> bool {
        self.slots
            .lock()
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
    }

    /// Remove the entry for `key` only if it still holds `slot`, leaving a
    /// successor slot created in the meantime untouched.
    fn remove_if_current(&self, key: &K, slot: &Arc<Mutex<Option<V>>>) {
        let mut slots = self.slots.lock();
        if slots.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            slots.remove(key);
        }
    }
}

impl<K, V> Default for SingleFlightCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        SingleFlightCache::new()
    }
}

impl<K, V> std::fmt::Debug for SingleFlightCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlightCache").finish_non_exhaustive()
    }
}

struct BoundedInner<K, V> {
    map: AHashMap<K, (V, u64)>,
    tick: u64,
}

/// A fixed-capacity cache with least-recently-used eviction.
pub struct BoundedCache<K, V> {
    inner: Mutex<BoundedInner<K, V>>,
    capacity: usize,
}

impl<K, V> BoundedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        BoundedCache {
            inner: Mutex::new(BoundedInner {
                map: AHashMap::new(),
                tick: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Get a value, refreshing its recency.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;
        let entry = inner.map.get_mut(key)?;
        entry.1 = tick;
        Some(entry.0.clone())
    }

    /// Insert a value, evicting the least-recently-used entry at capacity.
    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;
        if !inner.map.contains_key(&key) && inner.map.len() >= self.capacity {
            if let Some(oldest) = inner
                .map
                .iter()
                .min_by_key(|(_, (_, t))| *t)
                .map(|(k, _)| k.clone())
            {
                inner.map.remove(&oldest);
            }
        }
        inner.map.insert(key, (value, tick));
    }

    /// Get the value for `key`, computing and inserting it on a miss.
    pub fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().map.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> std::fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
