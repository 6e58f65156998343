// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod events;

use super::*;
use fw_core::test_support::{agent, invocation, state_patch};
use fw_core::{AgentState, InvocationState};

// ── Agents ───────────────────────────────────────────────────────────────────

#[test]
fn set_agents_replaces_previous_snapshot() {
    let mut state = TrackerState::new();
    state.set_agents(vec![agent("a1", AgentState::Running), agent("a2", AgentState::Stopped)]);
    state.set_agents(vec![agent("a3", AgentState::NotCreated)]);

    assert!(state.get_agent("a1").is_none());
    assert!(state.get_agent("a2").is_none());
    assert_eq!(state.get_agent("a3").map(|a| a.state), Some(AgentState::NotCreated));
    assert_eq!(state.agent_count(), 1);
}

#[test]
fn set_agents_keeps_last_duplicate() {
    let mut state = TrackerState::new();
    state.set_agents(vec![agent("a1", AgentState::Running), agent("a1", AgentState::Stopped)]);

    assert_eq!(state.agent_count(), 1);
    assert_eq!(state.get_agent("a1").map(|a| a.state), Some(AgentState::Stopped));
}

#[test]
fn set_agents_preserves_snapshot_order() {
    let mut state = TrackerState::new();
    state.set_agents(vec![
        agent("zeta", AgentState::Running),
        agent("alpha", AgentState::Running),
        agent("mid", AgentState::Stopped),
    ]);

    let names: Vec<_> = state.agents().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn set_agents_does_not_touch_invocations() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Running, 10));
    state.set_agents(Vec::new());

    assert!(state.get_invocation("t1").is_some());
    assert_eq!(state.agent_count(), 0);
}

// ── Invocations ──────────────────────────────────────────────────────────────

#[test]
fn add_invocation_inserts_record() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Pending, 10));

    let inv = state.get_invocation("t1").unwrap();
    assert_eq!(inv.agent, "a1");
    assert_eq!(inv.state, InvocationState::Pending);
}

#[test]
fn add_invocation_replaces_record_and_keeps_position() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Running, 10));
    state.add_invocation(invocation("t2", "a1", InvocationState::Pending, 20));
    state.update_invocation("t1", &InvocationPatch::new().started_at_ms(15u64));

    state.add_invocation(invocation("t1", "a2", InvocationState::Completed, 10));

    let inv = state.get_invocation("t1").unwrap();
    assert_eq!(inv.agent, "a2");
    assert_eq!(inv.state, InvocationState::Completed);
    assert_eq!(inv.started_at_ms, Some(15));
    let order: Vec<_> = state.invocations().map(|i| i.thread_id.as_str()).collect();
    assert_eq!(order, vec!["t1", "t2"]);
}

#[test]
fn stale_running_record_does_not_revive_completed_invocation() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Running, 10));
    state.update_invocation(
        "t1",
        &InvocationPatch::new()
            .state(InvocationState::Completed)
            .ended_at_ms(40u64)
            .result(serde_json::json!({ "rows": 2 })),
    );

    let mut stale = invocation("t1", "a1", InvocationState::Running, 10);
    stale.started_at_ms = Some(12);
    state.add_invocation(stale);

    let inv = state.get_invocation("t1").unwrap();
    assert_eq!(inv.state, InvocationState::Completed);
    assert_eq!(inv.ended_at_ms, Some(40));
    assert_eq!(inv.started_at_ms, Some(12));
    assert_eq!(inv.result, Some(serde_json::json!({ "rows": 2 })));
    assert_eq!(state.active_job_count(), 0);
}

#[test]
fn stale_pending_record_does_not_regress_running_invocation() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Pending, 10));
    state.update_invocation(
        "t1",
        &InvocationPatch::new().state(InvocationState::Running).started_at_ms(20u64),
    );

    state.add_invocation(invocation("t1", "a1", InvocationState::Pending, 10));

    let inv = state.get_invocation("t1").unwrap();
    assert_eq!(inv.state, InvocationState::Running);
    assert_eq!(inv.started_at_ms, Some(20));
}

#[test]
fn result_before_completion_is_held_until_completed() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Running, 10));
    state.update_invocation("t1", &InvocationPatch::new().result(serde_json::json!("early")));
    assert!(state.get_invocation("t1").unwrap().result.is_none());

    state.update_invocation("t1", &state_patch(InvocationState::Completed));

    assert_eq!(state.get_invocation("t1").unwrap().result, Some(serde_json::json!("early")));
}

#[test]
fn error_before_failure_is_released_by_full_record() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Running, 10));
    state.update_invocation("t1", &InvocationPatch::new().error("disk full"));

    state.add_invocation(invocation("t1", "a1", InvocationState::Failed, 10));

    assert_eq!(state.get_invocation("t1").unwrap().error.as_deref(), Some("disk full"));
}

#[test]
fn payload_arriving_with_terminal_state_wins_over_held_one() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Running, 10));
    state.update_invocation("t1", &InvocationPatch::new().result(serde_json::json!("early")));
    state.update_invocation(
        "t1",
        &InvocationPatch::new()
            .state(InvocationState::Completed)
            .result(serde_json::json!("final")),
    );

    assert_eq!(state.get_invocation("t1").unwrap().result, Some(serde_json::json!("final")));
}

#[test]
fn held_payload_for_other_terminal_state_is_discarded() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Running, 10));
    state.update_invocation("t1", &InvocationPatch::new().result(serde_json::json!("early")));
    state.update_invocation("t1", &state_patch(InvocationState::Failed));

    let inv = state.get_invocation("t1").unwrap();
    assert!(inv.result.is_none());
    assert!(inv.error.is_none());
}

#[test]
fn removing_invocation_drops_its_held_payload() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Running, 10));
    state.update_invocation("t1", &InvocationPatch::new().result(serde_json::json!("early")));
    state.remove_invocations(&["t1".into()]);

    state.add_invocation(invocation("t1", "a1", InvocationState::Completed, 10));

    assert!(state.get_invocation("t1").unwrap().result.is_none());
}

#[test]
fn invocation_may_reference_unknown_agent() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "ghost", InvocationState::Pending, 10));

    assert!(state.get_agent("ghost").is_none());
    assert!(state.get_invocation("t1").is_some());
}

#[test]
fn update_of_unknown_invocation_is_dropped() {
    let mut state = TrackerState::new();
    let outcome = state.update_invocation("t2", &state_patch(InvocationState::Running));

    assert!(outcome.is_unknown_target());
    assert!(outcome.report().is_none());
    assert!(state.get_invocation("t2").is_none());
    assert_eq!(state.invocation_count(), 0);
}

#[test]
fn update_after_late_creation_applies() {
    let mut state = TrackerState::new();
    state.update_invocation("t1", &state_patch(InvocationState::Running));
    state.add_invocation(invocation("t1", "a1", InvocationState::Pending, 10));
    state.update_invocation("t1", &state_patch(InvocationState::Running));

    assert_eq!(state.get_invocation("t1").map(|i| i.state), Some(InvocationState::Running));
}

#[test]
fn regression_scenario_keeps_running_and_start_time() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Pending, 100));
    state.update_invocation(
        "t1",
        &InvocationPatch::new().state(InvocationState::Running).started_at_ms(110u64),
    );
    let outcome = state.update_invocation("t1", &state_patch(InvocationState::Pending));

    let inv = state.get_invocation("t1").unwrap();
    assert_eq!(inv.state, InvocationState::Running);
    assert_eq!(inv.started_at_ms, Some(110));
    assert!(outcome.report().is_some_and(|r| r.rejected[0].is_state_conflict()));
}

#[test]
fn remove_invocations_counts_only_known_ids() {
    let mut state = TrackerState::new();
    state.add_invocation(invocation("t1", "a1", InvocationState::Completed, 10));
    state.add_invocation(invocation("t2", "a1", InvocationState::Completed, 20));
    state.add_invocation(invocation("t3", "a1", InvocationState::Completed, 30));

    let removed = state.remove_invocations(&["t2".into(), "nope".into()]);

    assert_eq!(removed, 1);
    let order: Vec<_> = state.invocations().map(|i| i.thread_id.as_str()).collect();
    assert_eq!(order, vec!["t1", "t3"]);
}

#[test]
fn state_serializes_as_maps() {
    let mut state = TrackerState::new();
    state.set_agents(vec![agent("a1", AgentState::Running)]);
    state.add_invocation(invocation("t1", "a1", InvocationState::Pending, 10));

    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["agents"]["a1"]["state"], "running");
    assert_eq!(json["invocations"]["t1"]["createdAt"], 10);

    let restored: TrackerState = serde_json::from_value(json).unwrap();
    assert_eq!(restored.get_invocation("t1").map(|i| i.created_at_ms), Some(10));
}
