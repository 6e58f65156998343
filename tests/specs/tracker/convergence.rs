// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Convergence specs
//!
//! Polling and push deliveries interleave in any order. Whatever the order,
//! the tracker must settle on the same record for the fields the reducer
//! governs.

use crate::prelude::*;
use fw_core::test_support::strategies::{arb_active_state, arb_patch, arb_terminal_state};
use proptest::prelude::*;

const CREATED_AT: u64 = 1_000;

/// Non-terminal updates, an optional stale full snapshot, and exactly one
/// terminal update. The terminal payload either travels with the terminal
/// state or arrives as its own update.
fn arb_deliveries() -> impl Strategy<Value = (InvocationState, Vec<TrackerEvent>)> {
    let active = proptest::collection::vec(
        (arb_active_state(), proptest::option::of(1_100u64..1_200)),
        0..8,
    );
    (active, arb_terminal_state(), 1_200u64..1_300, any::<bool>(), any::<bool>()).prop_flat_map(
        |(active, terminal, ended, split_payload, stale_snapshot)| {
            let mut events: Vec<TrackerEvent> = active
                .into_iter()
                .map(|(state, started)| {
                    let mut patch = state_patch(state);
                    patch.started_at_ms = started;
                    invocation_updated_event("t1", patch)
                })
                .collect();
            let payload = match terminal {
                InvocationState::Completed => {
                    InvocationPatch::new().result(serde_json::json!({ "ok": true }))
                }
                _ => InvocationPatch::new().error("boom"),
            };
            let finish = InvocationPatch::new().state(terminal).ended_at_ms(ended);
            if split_payload {
                events.push(invocation_updated_event("t1", payload));
                events.push(invocation_updated_event("t1", finish));
            } else {
                let InvocationPatch { result, error, .. } = payload;
                events.push(invocation_updated_event("t1", InvocationPatch { result, error, ..finish }));
            }
            if stale_snapshot {
                events.push(TrackerEvent::InvocationObserved {
                    invocation: invocation("t1", "a1", InvocationState::Running, CREATED_AT),
                });
            }
            (Just(terminal), Just(events).prop_shuffle())
        },
    )
}

fn replay(events: &[TrackerEvent]) -> Tracker {
    let mut tracker = Tracker::new();
    tracker.add_invocation(invocation("t1", "a1", InvocationState::Pending, CREATED_AT));
    for event in events {
        tracker.apply_event(event);
    }
    tracker
}

fn max_started(events: &[TrackerEvent]) -> Option<u64> {
    events
        .iter()
        .filter_map(|event| match event {
            TrackerEvent::InvocationUpdated { patch, .. } => patch.started_at_ms,
            _ => None,
        })
        .max()
}

proptest! {
    #[test]
    fn terminal_record_is_order_independent((terminal, events) in arb_deliveries()) {
        let tracker = replay(&events);
        let inv = tracker.get_invocation("t1").unwrap();

        prop_assert_eq!(inv.state, terminal);
        prop_assert_eq!(inv.started_at_ms, max_started(&events));
        prop_assert!(inv.ended_at_ms.is_some());
        match terminal {
            InvocationState::Completed => {
                prop_assert!(inv.result.is_some());
                prop_assert!(inv.error.is_none());
            }
            _ => {
                prop_assert!(inv.error.is_some());
                prop_assert!(inv.result.is_none());
            }
        }
        prop_assert_eq!(tracker.active_job_count(), 0);
    }

    #[test]
    fn completed_or_failed_never_changes_state(
        terminal in arb_terminal_state(),
        patches in proptest::collection::vec(arb_patch(), 0..12),
    ) {
        let mut tracker = Tracker::new();
        tracker.add_invocation(invocation("t1", "a1", terminal, 0));
        for patch in &patches {
            tracker.update_invocation("t1", patch);
            prop_assert_eq!(tracker.get_invocation("t1").map(|i| i.state), Some(terminal));
        }
    }

    #[test]
    fn replaying_a_delivery_log_is_idempotent((_, events) in arb_deliveries()) {
        let once = replay(&events);
        let mut twice = replay(&events);
        for event in &events {
            twice.apply_event(event);
        }
        prop_assert_eq!(once.get_invocation("t1"), twice.get_invocation("t1"));
    }
}
