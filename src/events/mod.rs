//! Events Module
//!
//! Publish/subscribe dispatcher keyed by event name, with explicit
//! subscription handles and aggregated listener failures.

mod dispatcher;
mod subscription;

#[cfg(test)]
mod property_tests;

pub use dispatcher::{Dispatcher, EmitOutcome};
pub use subscription::{Handler, Subscription, SubscriptionId};
