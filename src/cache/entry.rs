//! Cache Entry Module
//!
//! Defines a stored value together with its insertion timestamp.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry: the value and when it was (last) written.
///
/// Entries live only inside the cache's map; callers get clones of `value`.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was inserted or last overwritten
    pub inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
        }
    }

    // == Age ==
    /// Time elapsed since insertion, saturating at zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    // == Is Expired ==
    /// The single expiry predicate used by both lazy and eager expiry.
    ///
    /// Strictly greater: an entry whose age equals `ttl` is still live.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}
