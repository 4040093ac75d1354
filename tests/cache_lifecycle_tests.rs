//! Cache Lifecycle Tests
//!
//! Reaper startup, convergence and teardown, observed through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ttl_dispatch::cache::{ManualClock, TtlCache};
use ttl_dispatch::tasks::{spawn_reaper, Reap};
use ttl_dispatch::{CacheConfig, CacheError};

const TTL: Duration = Duration::from_secs(10);
const FAST_REAP: Duration = Duration::from_millis(10);

fn manual_cache(reap_interval: Duration) -> (TtlCache<String, u32>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let config = CacheConfig::new(TTL, reap_interval).unwrap();
    let cache = TtlCache::with_clock(config, clock.clone()).unwrap();
    (cache, clock)
}

async fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if done() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    done()
}

#[derive(Default)]
struct CountingTarget {
    sweeps: AtomicUsize,
}

impl Reap for CountingTarget {
    fn reap_expired(&self) -> usize {
        self.sweeps.fetch_add(1, Ordering::SeqCst);
        0
    }
}

// == Reaper Convergence ==

#[tokio::test]
async fn test_reaper_removes_unread_expired_entries() {
    let (cache, clock) = manual_cache(FAST_REAP);
    for n in 0..3 {
        cache.set(format!("k{}", n), n);
    }

    clock.advance(TTL + Duration::from_secs(1));

    assert!(wait_until(|| cache.size() == 0).await);
    assert_eq!(cache.stats().reaped, 3);
    // Nothing was read, so nothing counts as a lazy expiry
    assert_eq!(cache.stats().expired, 0);

    cache.close().await;
}

#[tokio::test]
async fn test_reaper_keeps_live_entries() {
    let (cache, clock) = manual_cache(FAST_REAP);
    cache.set("old".to_string(), 1);
    clock.advance(TTL - Duration::from_secs(2));
    cache.set("fresh".to_string(), 2);
    clock.advance(Duration::from_secs(3));

    assert!(wait_until(|| cache.size() == 1).await);
    assert_eq!(cache.get("fresh"), Some(2));

    cache.close().await;
}

#[tokio::test]
async fn test_entry_at_exact_ttl_survives_sweep() {
    let (cache, clock) = manual_cache(FAST_REAP);
    cache.set("edge".to_string(), 1);
    clock.advance(TTL);

    tokio::time::sleep(FAST_REAP * 5).await;
    assert_eq!(cache.get("edge"), Some(1));

    cache.close().await;
}

// == Close ==

#[tokio::test]
async fn test_close_is_idempotent() {
    let (cache, _clock) = manual_cache(FAST_REAP);
    assert!(cache.is_reaping());

    cache.close().await;
    assert!(!cache.is_reaping());

    cache.close().await;
    assert!(!cache.is_reaping());
}

#[tokio::test]
async fn test_cache_usable_after_close() {
    let (cache, clock) = manual_cache(FAST_REAP);
    cache.close().await;

    cache.set("k".to_string(), 1);
    assert_eq!(cache.get("k"), Some(1));

    // Without a reaper, stale entries linger until read
    clock.advance(TTL + Duration::from_secs(1));
    tokio::time::sleep(FAST_REAP * 5).await;
    assert_eq!(cache.size(), 1);
    assert_eq!(cache.get("k"), None);
    assert_eq!(cache.size(), 0);
}

// == Drop ==

#[tokio::test]
async fn test_dropping_handle_stops_sweeps() {
    let target = Arc::new(CountingTarget::default());
    let handle = spawn_reaper(Arc::downgrade(&target), FAST_REAP);

    assert!(wait_until(|| target.sweeps.load(Ordering::SeqCst) > 0).await);
    drop(handle);
    // Let an in-flight sweep, if any, finish
    tokio::time::sleep(FAST_REAP * 2).await;

    let settled = target.sweeps.load(Ordering::SeqCst);
    tokio::time::sleep(FAST_REAP * 10).await;
    assert_eq!(target.sweeps.load(Ordering::SeqCst), settled);
}

#[tokio::test]
async fn test_reaper_exits_when_target_dropped() {
    let target = Arc::new(CountingTarget::default());
    let handle = spawn_reaper(Arc::downgrade(&target), FAST_REAP);

    drop(target);

    assert!(wait_until(|| handle.is_finished()).await);
}

#[test]
fn test_cache_drop_inside_block_on() {
    let reaped = tokio_test::block_on(async {
        let (cache, clock) = manual_cache(FAST_REAP);
        cache.set("k".to_string(), 1);
        clock.advance(TTL * 2);

        wait_until(|| cache.size() == 0).await;
        let reaped = cache.stats().reaped;
        drop(cache);
        reaped
    });

    assert_eq!(reaped, 1);
}

// == Construction ==

#[test]
fn test_construction_requires_runtime() {
    let config = CacheConfig::new(TTL, FAST_REAP).unwrap();

    let result = TtlCache::<String, u32>::new(config);
    assert!(matches!(result, Err(CacheError::NoRuntime)));
}

#[test]
fn test_zero_durations_rejected() {
    assert!(matches!(
        CacheConfig::new(Duration::ZERO, FAST_REAP),
        Err(CacheError::Configuration(_))
    ));
    assert!(matches!(
        CacheConfig::new(TTL, Duration::ZERO),
        Err(CacheError::Configuration(_))
    ));
}
