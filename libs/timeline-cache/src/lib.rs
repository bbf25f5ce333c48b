//! In-process TTL cache for rendered timeline pages
//!
//! Provides a small keyed cache with:
//! - Lazy, read-side expiry (no background sweeper)
//! - An injected clock so expiry is testable without sleeping
//! - Whole-cache invalidation (`clear`) for mutations that can reshuffle
//!   every page of a feed
//!
//! Reads and invalidations may race; a reader observes either the stale or
//! the fresh value, never a torn one.

use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Time source for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Hand-advanced clock for tests.
#[derive(Clone)]
pub struct ManualClock {
    epoch: Instant,
    offset: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut offset = self.offset.lock().expect("clock offset poisoned");
        *offset += delta;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().expect("clock offset poisoned");
        self.epoch + *offset
    }
}

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// Keyed cache where every entry shares one fixed TTL.
///
/// Entries past their TTL are treated as absent and dropped on the next read
/// of their key.
pub struct TtlCache<K, V> {
    entries: DashMap<K, Entry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry, removing it if it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        // The guard must be dropped before `remove_if`, which takes the
        // shard lock again.
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if now.duration_since(entry.stored_at) < self.ttl {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            self.entries
                .remove_if(key, |_, entry| now.duration_since(entry.stored_at) >= self.ttl);
        }
        None
    }

    /// Insert or refresh an entry; the TTL window restarts from now.
    pub fn insert(&self, key: K, value: V) {
        self.entries.insert(
            key,
            Entry {
                stored_at: self.clock.now(),
                value,
            },
        );
    }

    /// Drop every entry, live or expired.
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
