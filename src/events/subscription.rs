//! Subscription Module
//!
//! Subscription ids and the registered (id, handler) pairs.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Process-wide id source; ids are never reused.
static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Callback invoked with the emitted payload.
pub type Handler<A> = Arc<dyn Fn(&A) -> anyhow::Result<()> + Send + Sync>;

// == Subscription Id ==
/// Opaque token identifying one handler's registration to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocates a fresh id, unique for the lifetime of the process.
    pub(crate) fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw id, e.g. one received back from a client.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// == Subscription ==
/// One registration in an event's ordered subscriber list.
pub struct Subscription<A> {
    pub id: SubscriptionId,
    pub handler: Handler<A>,
    /// Present for single-shot registrations; set once the handler is claimed
    pub(crate) fired: Option<Arc<AtomicBool>>,
}

impl<A> Subscription<A> {
    pub(crate) fn new(id: SubscriptionId, handler: Handler<A>) -> Self {
        Self {
            id,
            handler,
            fired: None,
        }
    }

    pub(crate) fn single_shot(id: SubscriptionId, handler: Handler<A>) -> Self {
        Self {
            id,
            handler,
            fired: Some(Arc::new(AtomicBool::new(false))),
        }
    }

    /// Reserves this subscription for one invocation.
    ///
    /// Always true for regular subscriptions. For single-shot ones only the
    /// first caller across all snapshots gets true.
    pub(crate) fn claim(&self) -> bool {
        self.fired
            .as_ref()
            .map_or(true, |fired| !fired.swap(true, Ordering::AcqRel))
    }
}

// Manual impls: deriving would needlessly require `A: Clone`/`A: Debug`
impl<A> Clone for Subscription<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
            fired: self.fired.clone(),
        }
    }
}

impl<A> fmt::Debug for Subscription<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("single_shot", &self.fired.is_some())
            .finish_non_exhaustive()
    }
}
