//! TTL Dispatch - in-process runtime primitives
//!
//! A thread-safe TTL cache with a stoppable background reaper, and a
//! publish/subscribe dispatcher with explicit subscription handles and
//! aggregated listener failures. Both are built on one synchronized keyed
//! store. A small HTTP service in `api` shows them in use.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::TtlCache;
pub use config::{CacheConfig, Config};
pub use error::{CacheError, DispatchError};
pub use events::{Dispatcher, EmitOutcome, SubscriptionId};
pub use store::KeyedStore;
