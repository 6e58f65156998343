// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::state::TrackerState;
use fw_core::test_support::{
    agents_snapshot_event, invocation_observed_event, invocation_updated_event, state_patch,
};
use fw_core::{AgentState, InvocationPatch, InvocationState, ProgressPatch};
use serde_json::json;

#[test]
fn snapshot_event_sets_agents() {
    let mut state = TrackerState::new();
    state.apply_event(&agents_snapshot_event(&[
        ("a1", AgentState::Running),
        ("a2", AgentState::Stopped),
    ]));

    assert_eq!(state.agent_count(), 2);
    assert!(state.get_agent("a1").is_some_and(|a| a.is_running()));
}

#[test]
fn observed_then_updated_events_merge() {
    let mut state = TrackerState::new();
    state.apply_event(&invocation_observed_event("t1", "a1", InvocationState::Pending, 100));
    state.apply_event(&invocation_updated_event(
        "t1",
        InvocationPatch::new()
            .state(InvocationState::Completed)
            .ended_at_ms(180u64)
            .result(json!({ "summary": "ok" })),
    ));

    let inv = state.get_invocation("t1").unwrap();
    assert_eq!(inv.state, InvocationState::Completed);
    assert_eq!(inv.ended_at_ms, Some(180));
    assert_eq!(inv.result, Some(json!({ "summary": "ok" })));
}

#[test]
fn replaying_events_is_idempotent() {
    let events = vec![
        agents_snapshot_event(&[("a1", AgentState::Running)]),
        invocation_observed_event("t1", "a1", InvocationState::Pending, 100),
        invocation_updated_event(
            "t1",
            InvocationPatch::new()
                .state(InvocationState::Running)
                .started_at_ms(120u64)
                .progress(ProgressPatch::new().percent(30u8)),
        ),
    ];

    let mut once = TrackerState::new();
    for event in &events {
        once.apply_event(event);
    }
    let mut twice = once.clone();
    for event in &events {
        twice.apply_event(event);
    }

    assert_eq!(once.get_invocation("t1"), twice.get_invocation("t1"));
    assert_eq!(once.agent_count(), twice.agent_count());
}

#[test]
fn update_event_for_unknown_thread_creates_nothing() {
    let mut state = TrackerState::new();
    state.apply_event(&invocation_updated_event("t9", state_patch(InvocationState::Failed)));
    assert_eq!(state.invocation_count(), 0);
}
