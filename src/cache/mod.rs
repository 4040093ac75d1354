//! Cache Module
//!
//! Provides an in-memory key/value cache with TTL expiration, enforced lazily
//! on read and eagerly by a background reaper.

mod clock;
mod entry;
mod stats;
mod ttl_cache;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use ttl_cache::TtlCache;
