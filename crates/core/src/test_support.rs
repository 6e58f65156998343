// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{
    Agent, AgentState, Invocation, InvocationPatch, InvocationState, ProgressPatch, ProgressStep,
    StepState, ThreadId, TrackerEvent,
};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for the invocation state machine.
pub mod strategies {
    use crate::invocation::{InvocationState, StepState};
    use crate::patch::InvocationPatch;
    use proptest::prelude::*;

    pub fn arb_invocation_state() -> impl Strategy<Value = InvocationState> {
        prop_oneof![
            Just(InvocationState::Pending),
            Just(InvocationState::Running),
            Just(InvocationState::Completed),
            Just(InvocationState::Failed),
        ]
    }

    pub fn arb_active_state() -> impl Strategy<Value = InvocationState> {
        prop_oneof![Just(InvocationState::Pending), Just(InvocationState::Running)]
    }

    pub fn arb_terminal_state() -> impl Strategy<Value = InvocationState> {
        prop_oneof![Just(InvocationState::Completed), Just(InvocationState::Failed)]
    }

    pub fn arb_step_state() -> impl Strategy<Value = StepState> {
        prop_oneof![
            Just(StepState::Pending),
            Just(StepState::Running),
            Just(StepState::Completed),
            Just(StepState::Failed),
        ]
    }

    /// Patches touching any mix of state and timestamps.
    pub fn arb_patch() -> impl Strategy<Value = InvocationPatch> {
        (
            proptest::option::of(arb_invocation_state()),
            proptest::option::of(0u64..10_000),
            proptest::option::of(0u64..10_000),
        )
            .prop_map(|(state, started_at_ms, ended_at_ms)| InvocationPatch {
                state,
                started_at_ms,
                ended_at_ms,
                ..InvocationPatch::default()
            })
    }
}

// ── Record factory functions ────────────────────────────────────────────────

pub fn agent(name: &str, state: AgentState) -> Agent {
    Agent::new(name, state)
}

pub fn invocation(thread_id: &str, agent: &str, state: InvocationState, created_at_ms: u64) -> Invocation {
    Invocation::new(thread_id, agent, state, created_at_ms)
}

pub fn state_patch(state: InvocationState) -> InvocationPatch {
    InvocationPatch::new().state(state)
}

pub fn step_patch(id: &str, state: StepState) -> InvocationPatch {
    InvocationPatch::new().progress(ProgressPatch::new().step(ProgressStep::new(id, id, state)))
}

// ── Event factory functions ─────────────────────────────────────────────────

pub fn agents_snapshot_event(agents: &[(&str, AgentState)]) -> TrackerEvent {
    TrackerEvent::AgentsSnapshot {
        agents: agents.iter().map(|(name, state)| agent(name, *state)).collect(),
    }
}

pub fn invocation_observed_event(
    thread_id: &str,
    agent: &str,
    state: InvocationState,
    created_at_ms: u64,
) -> TrackerEvent {
    TrackerEvent::InvocationObserved { invocation: invocation(thread_id, agent, state, created_at_ms) }
}

pub fn invocation_updated_event(thread_id: &str, patch: InvocationPatch) -> TrackerEvent {
    TrackerEvent::InvocationUpdated { thread_id: ThreadId::new(thread_id), patch }
}
