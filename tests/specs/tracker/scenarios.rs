// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reducer scenarios
//!
//! Out-of-order and unknown-target deliveries from the polling and push
//! sources, driven through the tracker's mutation API.

use crate::prelude::*;
use similar_asserts::assert_eq;

/// Scenario:
/// 1. Observe t1 pending at T0
/// 2. Push stream reports running, started at T1
/// 3. A stale poll reports pending again
///
/// The stale poll must not move the invocation backwards.
#[test]
fn stale_poll_does_not_regress_running_invocation() {
    let mut tracker = Tracker::new();
    tracker.add_invocation(invocation("t1", "a1", InvocationState::Pending, 1_000));
    tracker.update_invocation(
        "t1",
        &InvocationPatch::new().state(InvocationState::Running).started_at_ms(1_100u64),
    );

    let outcome = tracker.update_invocation("t1", &state_patch(InvocationState::Pending));

    let inv = tracker.get_invocation("t1").unwrap();
    assert_eq!(inv.state, InvocationState::Running);
    assert_eq!(inv.started_at_ms, Some(1_100));
    assert!(outcome.report().is_some_and(|r| !r.is_clean()));
}

/// Scenario:
/// 1. Poll observes t1 running
/// 2. Push stream reports completion with a result
/// 3. A poll snapshot fetched before the completion arrives last
///
/// The invocation stays completed and keeps its result.
#[test]
fn stale_poll_snapshot_does_not_revive_completed_invocation() {
    let mut tracker = Tracker::new();
    tracker.add_invocation(invocation("t1", "a1", InvocationState::Running, 1_000));
    tracker.update_invocation(
        "t1",
        &InvocationPatch::new()
            .state(InvocationState::Completed)
            .ended_at_ms(1_400u64)
            .result(serde_json::json!({ "rows": 3 })),
    );

    tracker.add_invocation(invocation("t1", "a1", InvocationState::Running, 1_000));

    let inv = tracker.get_invocation("t1").unwrap();
    assert_eq!(inv.state, InvocationState::Completed);
    assert_eq!(inv.ended_at_ms, Some(1_400));
    assert_eq!(inv.result, Some(serde_json::json!({ "rows": 3 })));
    assert_eq!(tracker.active_job_count(), 0);
}

#[test]
fn update_for_unknown_thread_creates_nothing() {
    let mut tracker = Tracker::new();
    tracker.add_invocation(invocation("t1", "a1", InvocationState::Running, 1_000));

    let outcome = tracker.update_invocation("t2", &state_patch(InvocationState::Completed));

    assert!(outcome.is_unknown_target());
    assert!(tracker.get_invocation("t2").is_none());
    assert_eq!(tracker.state().invocation_count(), 1);
}

#[test]
fn second_agent_snapshot_replaces_the_first() {
    let mut tracker = Tracker::new();
    tracker.set_agents(vec![agent("a1", AgentState::Running), agent("a2", AgentState::Stopped)]);
    tracker.set_agents(vec![agent("a3", AgentState::NotCreated)]);

    let names: Vec<_> = tracker.state().agents().map(|a| a.name.to_string()).collect();
    assert_eq!(names, vec!["a3".to_string()]);
}

#[test]
fn late_result_lands_after_completion() {
    let mut tracker = Tracker::new();
    tracker.add_invocation(invocation("t1", "a1", InvocationState::Running, 1_000));
    tracker.update_invocation(
        "t1",
        &InvocationPatch::new().state(InvocationState::Completed).ended_at_ms(1_500u64),
    );
    tracker.update_invocation(
        "t1",
        &InvocationPatch::new().result(serde_json::json!({ "rows": 3 })),
    );

    assert_eq!(
        invocation_json(&tracker, "t1"),
        serde_json::json!({
            "threadId": "t1",
            "agent": "a1",
            "state": "completed",
            "result": { "rows": 3 },
            "createdAt": 1_000,
            "endedAt": 1_500,
        })
    );
}

#[test]
fn progress_steps_keep_arrival_order() {
    let mut tracker = Tracker::new();
    tracker.add_invocation(invocation("t1", "a1", InvocationState::Running, 1_000));
    tracker.update_invocation("t1", &step_patch("fetch", StepState::Running));
    tracker.update_invocation("t1", &step_patch("parse", StepState::Pending));
    tracker.update_invocation("t1", &step_patch("fetch", StepState::Completed));
    // Stale report for a finished step
    tracker.update_invocation("t1", &step_patch("fetch", StepState::Running));

    let steps: Vec<_> = tracker
        .get_invocation("t1")
        .and_then(|inv| inv.progress.as_ref())
        .map(|p| p.steps.iter().map(|s| (s.id.clone(), s.state)).collect())
        .unwrap_or_default();
    assert_eq!(
        steps,
        vec![("fetch".to_string(), StepState::Completed), ("parse".to_string(), StepState::Pending)]
    );
}

#[test]
fn health_follows_gateway_and_active_jobs() {
    let mut tracker = Tracker::with_config(TrackerConfig::default().max_active_jobs(1));
    assert_eq!(tracker.health_summary("ok").status, HealthStatus::Healthy);

    tracker.add_invocation(invocation("t1", "a1", InvocationState::Running, 1_000));
    tracker.add_invocation(invocation("t2", "a1", InvocationState::Pending, 1_001));
    let summary = tracker.health_summary("ok");
    assert_eq!(summary.status, HealthStatus::Warning);
    assert_eq!(summary.active_jobs, 2);

    assert_eq!(tracker.health_summary("unreachable").status, HealthStatus::Error);
}
