//! Bounded least-recently-used cache for memoized waveforms.
//!
//! Repeated notes in a score reuse the same pitch and envelope, so the
//! synthesizer and renderer memoize their outputs. The cache is owned by
//! the component instance and bounded by a fixed capacity, which keeps the
//! memory ceiling explicit: one conversion run can never hold more than
//! `capacity` waveforms per cache, and the cache dies with its owner.

use std::collections::HashMap;
use std::hash::Hash;

/// A fixed-capacity map that evicts the least-recently-used entry when full.
///
/// Recency is tracked with a monotonic counter stamped on every access;
/// eviction removes the entry with the smallest stamp.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, (V, u64)>,
    clock: u64,
}

impl<K: Eq + Hash + Clone, V> LruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries.
    ///
    /// A zero capacity is nudged up to one so the cache always functions.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            clock: 0,
        }
    }

    /// Looks up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.clock += 1;
        let clock = self.clock;
        self.entries.get_mut(key).map(|(value, stamp)| {
            *stamp = clock;
            &*value
        })
    }

    /// Inserts a value, evicting the least-recently-used entry if full.
    pub fn insert(&mut self, key: K, value: V) {
        self.clock += 1;
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(key, (value, self.clock));
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, (_, stamp))| *stamp)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}
