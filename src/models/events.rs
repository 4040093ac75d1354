//! Cache lifecycle event payloads
//!
//! Broadcast through the dispatcher whenever the service mutates the cache.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Event name emitted after a key is written
pub const EVENT_SET: &str = "cache.set";
/// Event name emitted after a key is removed
pub const EVENT_DELETE: &str = "cache.delete";
/// Event name emitted after the cache is emptied
pub const EVENT_CLEAR: &str = "cache.clear";

/// What happened to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheEventKind {
    Set,
    Deleted,
    Cleared,
}

impl CacheEventKind {
    /// Dispatcher event name for this kind.
    pub fn event_name(&self) -> &'static str {
        match self {
            CacheEventKind::Set => EVENT_SET,
            CacheEventKind::Deleted => EVENT_DELETE,
            CacheEventKind::Cleared => EVENT_CLEAR,
        }
    }
}

/// Payload handed to lifecycle listeners.
#[derive(Debug, Clone, Serialize)]
pub struct CacheEvent {
    pub kind: CacheEventKind,
    /// Affected key; `None` for whole-cache events
    pub key: Option<String>,
    pub at: DateTime<Utc>,
}

impl CacheEvent {
    pub fn set(key: impl Into<String>) -> Self {
        Self::new(CacheEventKind::Set, Some(key.into()))
    }

    pub fn deleted(key: impl Into<String>) -> Self {
        Self::new(CacheEventKind::Deleted, Some(key.into()))
    }

    pub fn cleared() -> Self {
        Self::new(CacheEventKind::Cleared, None)
    }

    fn new(kind: CacheEventKind, key: Option<String>) -> Self {
        Self {
            kind,
            key,
            at: Utc::now(),
        }
    }

    /// Dispatcher event name this payload is emitted under.
    pub fn event_name(&self) -> &'static str {
        self.kind.event_name()
    }
}
