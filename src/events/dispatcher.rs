//! Event Dispatcher Module
//!
//! Named-event publish/subscribe with explicit subscription handles and
//! per-handler failure isolation.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use crate::error::DispatchError;
use crate::events::{Subscription, SubscriptionId};
use crate::store::KeyedStore;

// == Emit Outcome ==
/// Successful result of an emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitOutcome {
    /// Nobody was subscribed, or only already-fired `once` handlers; nothing ran
    NoListeners,
    /// This many handlers ran and all succeeded
    Delivered(usize),
}

impl EmitOutcome {
    /// Number of handlers invoked.
    pub fn listeners(&self) -> usize {
        match self {
            EmitOutcome::NoListeners => 0,
            EmitOutcome::Delivered(n) => *n,
        }
    }
}

/// Registry of subscribers, ordered by subscription time per event name.
///
/// An event name never maps to an empty list.
struct Registry<A> {
    events: KeyedStore<String, Vec<Subscription<A>>>,
}

impl<A> Registry<A> {
    fn remove(&self, event: &str, id: SubscriptionId) -> bool {
        self.events.with_map(|events| {
            let Some(subscribers) = events.get_mut(event) else {
                return false;
            };
            let before = subscribers.len();
            subscribers.retain(|sub| sub.id != id);
            let removed = subscribers.len() < before;
            if subscribers.is_empty() {
                events.remove(event);
            }
            removed
        })
    }
}

// == Dispatcher ==
/// Publish/subscribe hub for payloads of type `A`.
///
/// Cloning is cheap and every clone shares the same registry.
///
/// # Dispatch semantics
/// - Handlers run in subscription order.
/// - [`emit`](Dispatcher::emit) works on a snapshot taken before the first
///   handler runs, so subscribing or unsubscribing from inside a handler
///   only affects later emissions.
/// - A failing or panicking handler never stops the others; failures are
///   reported after the whole fan-out.
/// - The registry lock is never held while a handler runs.
pub struct Dispatcher<A> {
    registry: Arc<Registry<A>>,
}

impl<A: 'static> Dispatcher<A> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry {
                events: KeyedStore::new(),
            }),
        }
    }

    // == Subscribe ==
    /// Appends `handler` to the subscribers of `event` and returns its id.
    pub fn subscribe<F>(&self, event: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&A) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId::next();
        self.insert(event.into(), Subscription::new(id, Arc::new(handler)));
        id
    }

    // == Once ==
    /// Subscribes `handler` for a single invocation.
    ///
    /// The subscription is removed as soon as an emission claims it. Two
    /// emissions racing on the same snapshot still invoke `handler` only once
    /// (the other one does not count it as delivered), and a removal that
    /// finds the subscription already gone is a no-op.
    pub fn once<F>(&self, event: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&A) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let event = event.into();
        let id = SubscriptionId::next();
        let registry: Weak<Registry<A>> = Arc::downgrade(&self.registry);
        let name = event.clone();

        // Removed before running, so a panicking handler does not linger
        let wrapper = move |args: &A| {
            if let Some(registry) = registry.upgrade() {
                registry.remove(&name, id);
            }
            handler(args)
        };

        self.insert(event, Subscription::single_shot(id, Arc::new(wrapper)));
        id
    }

    fn insert(&self, event: String, subscription: Subscription<A>) {
        debug!("Subscribing {} to '{}'", subscription.id, event);
        self.registry.events.with_map(|events| {
            events.entry(event).or_default().push(subscription);
        });
    }

    // == Unsubscribe ==
    /// Removes subscription `id` from `event`; returns whether it was found.
    pub fn unsubscribe(&self, event: &str, id: SubscriptionId) -> bool {
        let removed = self.registry.remove(event, id);
        if removed {
            debug!("Unsubscribed {} from '{}'", id, event);
        }
        removed
    }

    // == Emit ==
    /// Invokes every handler subscribed to `event` with `args`.
    ///
    /// Returns [`EmitOutcome::NoListeners`] when nobody is subscribed. A
    /// handler that panics counts as a failed handler. When handlers fail, a single failure is returned as
    /// [`DispatchError::ListenerFailure`]; several are summarized as
    /// [`DispatchError::AggregateListenerFailure`] carrying the first one.
    pub fn emit(&self, event: &str, args: &A) -> Result<EmitOutcome, DispatchError> {
        let snapshot = self
            .registry
            .events
            .with_map(|events| events.get(event).cloned());

        let Some(snapshot) = snapshot else {
            debug!("No listeners for '{}'", event);
            return Ok(EmitOutcome::NoListeners);
        };

        let mut delivered = 0;
        let mut failures: Vec<(SubscriptionId, anyhow::Error)> = Vec::new();
        for sub in &snapshot {
            if !sub.claim() {
                continue;
            }
            delivered += 1;

            let result = panic::catch_unwind(AssertUnwindSafe(|| (sub.handler)(args)))
                .unwrap_or_else(|payload| Err(panic_to_error(payload)));
            if let Err(e) = result {
                warn!("Listener {} for '{}' failed: {:#}", sub.id, event, e);
                failures.push((sub.id, e));
            }
        }

        let count = failures.len();
        let mut failures = failures.into_iter();
        match failures.next() {
            None if delivered == 0 => Ok(EmitOutcome::NoListeners),
            None => Ok(EmitOutcome::Delivered(delivered)),
            Some((subscription, source)) if count == 1 => Err(DispatchError::ListenerFailure {
                event: event.to_string(),
                subscription,
                source,
            }),
            Some((_, source)) => Err(DispatchError::AggregateListenerFailure {
                event: event.to_string(),
                count,
                source,
            }),
        }
    }

    // == Listener Count ==
    /// Number of active subscriptions for `event`; 0 for unknown names.
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry
            .events
            .with_map(|events| events.get(event).map_or(0, Vec::len))
    }

    // == Clear ==
    /// Removes every subscription from every event; returns how many.
    pub fn clear(&self) -> usize {
        let removed = self.registry.events.with_map(|events| {
            let count: usize = events.values().map(Vec::len).sum();
            events.clear();
            count
        });
        debug!("Dispatcher cleared, {} subscriptions removed", removed);
        removed
    }

    /// True if no event has subscribers.
    pub fn is_empty(&self) -> bool {
        self.registry.events.is_empty()
    }
}

impl<A: 'static> Default for Dispatcher<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("events", &self.registry.events.size())
            .finish()
    }
}

fn panic_to_error(payload: Box<dyn Any + Send>) -> anyhow::Error {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    anyhow::anyhow!("listener panicked: {}", message)
}
