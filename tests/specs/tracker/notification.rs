// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification specs
//!
//! Dashboard panels subscribe to derived values and re-render only when the
//! value they watch changes.

use crate::prelude::*;
use similar_asserts::assert_eq;

/// Scenario:
/// 1. Two panels subscribe to the active job count
/// 2. A running invocation is added: both fire with 1
/// 3. One panel unsubscribes; the invocation completes
///
/// Only the remaining panel fires, with 0.
#[test]
fn active_job_count_listeners() {
    let mut tracker = Tracker::new();
    let header = Seen::<usize>::new();
    let sidebar = Seen::<usize>::new();
    let header_sub = tracker.subscribe(TrackerState::active_job_count, header.listener());
    let _sidebar_sub = tracker.subscribe(TrackerState::active_job_count, sidebar.listener());

    tracker.add_invocation(invocation("t1", "a1", InvocationState::Running, 1_000));
    assert_eq!(header.values(), vec![1]);
    assert_eq!(sidebar.values(), vec![1]);

    header_sub.unsubscribe();
    tracker.update_invocation("t1", &state_patch(InvocationState::Completed));

    assert_eq!(header.values(), vec![1]);
    assert_eq!(sidebar.values(), vec![1, 0]);
}

#[test]
fn unsubscribe_after_tracker_dropped_is_harmless() {
    let tracker = Tracker::new();
    let sub = tracker.subscribe(TrackerState::active_job_count, Seen::<usize>::new().listener());
    drop(tracker);

    sub.unsubscribe();
    sub.unsubscribe();
}

#[test]
fn most_recent_panel_tracks_newest_creation() {
    let mut tracker = Tracker::new();
    let latest = Seen::<Option<String>>::new();
    let _sub = tracker.subscribe(
        |s: &TrackerState| s.most_recent_invocation().map(|i| i.thread_id.to_string()),
        latest.listener(),
    );

    tracker.add_invocation(invocation("t1", "a1", InvocationState::Pending, 1_000));
    tracker.add_invocation(invocation("t0", "a1", InvocationState::Pending, 500));
    tracker.add_invocation(invocation("t2", "a2", InvocationState::Pending, 2_000));
    tracker.update_invocation("t2", &state_patch(InvocationState::Running));

    assert_eq!(latest.values(), vec![Some("t1".to_string()), Some("t2".to_string())]);
}

#[test]
fn health_panel_fires_on_status_change_only() {
    let mut tracker = Tracker::new();
    let health = Seen::<HealthStatus>::new();
    let status =
        |s: &TrackerState| s.health_summary("ok", &fw_tracker::HealthPolicy::default()).status;
    let _sub = tracker.subscribe(status, health.listener());

    tracker.add_invocation(invocation("t1", "a1", InvocationState::Running, 1_000));
    tracker.add_invocation(invocation("t2", "a1", InvocationState::Running, 1_001));
    tracker.update_invocation("t1", &state_patch(InvocationState::Completed));
    tracker.update_invocation("t2", &state_patch(InvocationState::Failed));

    assert_eq!(health.values(), vec![HealthStatus::Warning, HealthStatus::Healthy]);
}

/// A listener that acknowledges every new pending invocation by moving it to
/// running. The request is queued and applied after the notification pass.
#[test]
fn listener_requested_updates_are_applied_after_the_pass() {
    let mut tracker = Tracker::new();
    let deferred = tracker.deferred();
    let _ack = tracker.subscribe(
        |s: &TrackerState| {
            s.invocations()
                .filter(|i| i.state == InvocationState::Pending)
                .map(|i| i.thread_id.to_string())
                .collect::<Vec<_>>()
        },
        move |pending: &Vec<String>| {
            for thread_id in pending {
                deferred.update_invocation(
                    thread_id.as_str(),
                    InvocationPatch::new().state(InvocationState::Running).started_at_ms(1_010u64),
                );
            }
        },
    );

    tracker.add_invocation(invocation("t1", "a1", InvocationState::Pending, 1_000));

    let inv = tracker.get_invocation("t1").unwrap();
    assert_eq!(inv.state, InvocationState::Running);
    assert_eq!(inv.started_at_ms, Some(1_010));
    assert!(tracker.deferred().is_empty());
}
