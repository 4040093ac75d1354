//! TTL Cache Module
//!
//! Thread-safe key/value cache with lazy expiry on read and eager expiry by a
//! background reaper.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::store::KeyedStore;
use crate::tasks::{spawn_reaper, Reap, ReaperHandle};

// == Cache Inner ==
/// State shared between the cache handle and its reaper task.
#[derive(Debug)]
struct CacheInner<K, V> {
    entries: KeyedStore<K, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    stats: StatsRecorder,
}

impl<K, V> Reap for CacheInner<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Send + 'static,
{
    fn reap_expired(&self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;

        let removed = self.entries.with_map(|map| {
            let before = map.len();
            map.retain(|_, entry| !entry.is_expired(now, ttl));
            before - map.len()
        });

        self.stats.record_reaped(removed);
        removed
    }
}

// == TTL Cache ==
/// A cache whose entries stop being visible `ttl` after they were written.
///
/// Stale entries are never returned by [`get`](TtlCache::get): a read that
/// finds one removes it. A reaper task started at construction sweeps the
/// rest every `reap_interval`, so keys that are written once and never read
/// again do not pile up.
///
/// [`size`](TtlCache::size) counts stored entries, which includes stale ones
/// the reaper has not reached yet. It can therefore exceed the number of keys
/// a caller could currently `get`.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    inner: Arc<CacheInner<K, V>>,
    reaper: Mutex<Option<ReaperHandle>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + 'static,
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates a cache on the system clock and starts its reaper.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache reading time from `clock` and starts its reaper.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CacheError::NoRuntime);
        }

        let inner = Arc::new(CacheInner {
            entries: KeyedStore::new(),
            ttl: config.ttl(),
            clock,
            stats: StatsRecorder::default(),
        });
        let reaper = spawn_reaper(Arc::downgrade(&inner), config.reap_interval());

        debug!(
            "TTL cache created: ttl={:?}, reap_interval={:?}",
            config.ttl(),
            config.reap_interval()
        );

        Ok(Self {
            inner,
            reaper: Mutex::new(Some(reaper)),
        })
    }

    // == Get ==
    /// Returns a copy of the live value for `key`.
    ///
    /// A stale entry is removed in the same critical section that found it.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.inner.clock.now();
        let ttl = self.inner.ttl;

        let (value, expired) = self.inner.entries.with_map(|map| match map.get(key) {
            Some(entry) if !entry.is_expired(now, ttl) => (Some(entry.value.clone()), false),
            Some(_) => {
                map.remove(key);
                (None, true)
            }
            None => (None, false),
        });

        if expired {
            self.inner.stats.record_expired();
        }
        match value {
            Some(_) => self.inner.stats.record_hit(),
            None => self.inner.stats.record_miss(),
        }
        value
    }

    // == Set ==
    /// Inserts or overwrites `key`, restarting its ttl window.
    pub fn set(&self, key: K, value: V) {
        let entry = CacheEntry::new(value, self.inner.clock.now());
        self.inner.entries.set(key, entry);
    }

    // == Delete ==
    /// Removes `key`; returns whether anything was removed.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.entries.delete(key)
    }

    // == Clear ==
    /// Removes every entry in one step.
    pub fn clear(&self) {
        self.inner.entries.clear();
    }

    // == Size ==
    /// Number of stored entries, including stale ones not yet reaped.
    pub fn size(&self) -> usize {
        self.inner.entries.size()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    // == Reap Expired ==
    /// Runs one sweep now, the same one the reaper runs on its interval.
    ///
    /// Returns the number of entries removed.
    pub fn reap_expired(&self) -> usize {
        self.inner.reap_expired()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats.snapshot(self.size())
    }

    // == Close ==
    /// Stops the reaper and waits for it to exit. Calling it again is a no-op.
    ///
    /// The cache stays usable afterwards; only eager expiry stops.
    pub async fn close(&self) {
        let reaper = self.reaper.lock().take();
        if let Some(reaper) = reaper {
            reaper.shutdown().await;
            debug!("TTL cache reaper stopped");
        }
    }

    /// True while the background reaper is running.
    pub fn is_reaping(&self) -> bool {
        self.reaper
            .lock()
            .as_ref()
            .is_some_and(|reaper| !reaper.is_finished())
    }
}
