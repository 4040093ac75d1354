//! Property-Based Tests for the Dispatcher

use proptest::prelude::*;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::DispatchError;
use crate::events::{Dispatcher, EmitOutcome};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every handler runs, in subscription order, whichever of them fail; the
    // reported error matches the number of failures.
    #[test]
    fn prop_fan_out_isolation(pattern in prop::collection::vec(any::<bool>(), 1..20)) {
        let dispatcher: Dispatcher<()> = Dispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for (index, fails) in pattern.iter().copied().enumerate() {
            let log = Arc::clone(&log);
            dispatcher.subscribe("event", move |_: &()| {
                log.lock().push(index);
                if fails {
                    anyhow::bail!("handler {index} failed");
                }
                Ok(())
            });
        }

        let result = dispatcher.emit("event", &());
        let expected_order: Vec<usize> = (0..pattern.len()).collect();
        let observed = log.lock().clone();
        prop_assert_eq!(observed, expected_order);

        let failing: Vec<usize> = pattern
            .iter()
            .enumerate()
            .filter(|(_, fails)| **fails)
            .map(|(i, _)| i)
            .collect();

        match (failing.len(), result) {
            (0, Ok(outcome)) => {
                prop_assert_eq!(outcome, EmitOutcome::Delivered(pattern.len()));
            }
            (1, Err(DispatchError::ListenerFailure { source, .. })) => {
                prop_assert_eq!(source.to_string(), format!("handler {} failed", failing[0]));
            }
            (n, Err(err @ DispatchError::AggregateListenerFailure { .. })) if n > 1 => {
                prop_assert_eq!(err.failure_count(), n);
                prop_assert_eq!(
                    err.first_failure().to_string(),
                    format!("handler {} failed", failing[0])
                );
            }
            (n, other) => {
                prop_assert!(false, "{} failures but got {:?}", n, other);
            }
        }
    }

    // Unsubscribing any subset leaves exactly the complement, still in order.
    #[test]
    fn prop_unsubscribe_removes_only_matching(
        removals in prop::collection::vec(any::<bool>(), 1..20)
    ) {
        let dispatcher: Dispatcher<()> = Dispatcher::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let ids: Vec<_> = (0..removals.len())
            .map(|index| {
                let log = Arc::clone(&log);
                dispatcher.subscribe("event", move |_: &()| {
                    log.lock().push(index);
                    Ok(())
                })
            })
            .collect();

        for (id, remove) in ids.iter().zip(&removals) {
            if *remove {
                prop_assert!(dispatcher.unsubscribe("event", *id));
            }
        }

        let kept: Vec<usize> = removals
            .iter()
            .enumerate()
            .filter(|(_, remove)| !**remove)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(dispatcher.listener_count("event"), kept.len());

        let outcome = dispatcher.emit("event", &()).unwrap();
        prop_assert_eq!(outcome.listeners(), kept.len());
        let observed = log.lock().clone();
        prop_assert_eq!(observed, kept);
    }
}
