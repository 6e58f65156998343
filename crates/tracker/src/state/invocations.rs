// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invocation observation and update handlers.

use fw_core::{Invocation, InvocationPatch, InvocationState, ThreadId};
use indexmap::IndexMap;

use super::TrackerState;
use crate::merge::{merge_invocation, reconcile_record, MergeReport};

/// Result of routing a partial update to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The target existed; the report lists any rejected fields.
    Merged(MergeReport),
    /// No record for the thread id. The update was dropped.
    UnknownTarget,
}

impl UpdateOutcome {
    pub fn report(&self) -> Option<&MergeReport> {
        match self {
            UpdateOutcome::Merged(report) => Some(report),
            UpdateOutcome::UnknownTarget => None,
        }
    }

    pub fn is_unknown_target(&self) -> bool {
        matches!(self, UpdateOutcome::UnknownTarget)
    }
}

/// A `result` or `error` that arrived before the matching terminal state.
#[derive(Debug, Clone, Default)]
pub(crate) struct HeldPayload {
    result: Option<serde_json::Value>,
    error: Option<String>,
}

pub(crate) fn insert(state: &mut TrackerState, mut invocation: Invocation) {
    let thread_id = invocation.thread_id.clone();
    match state.invocations.get_mut(thread_id.as_str()) {
        Some(existing) => {
            let report = reconcile_record(existing, &mut invocation);
            log_report(&thread_id, &report);
            // Keeps the original insertion slot.
            *existing = invocation;
        }
        None => {
            tracing::debug!(
                thread_id = %invocation.thread_id,
                agent = %invocation.agent,
                state = %invocation.state,
                "invocation observed",
            );
            state.invocations.insert(thread_id.clone(), invocation);
        }
    }
    if let Some(invocation) = state.invocations.get_mut(thread_id.as_str()) {
        release_held(&mut state.held, invocation);
    }
}

pub(crate) fn update(
    state: &mut TrackerState,
    thread_id: &str,
    patch: &InvocationPatch,
) -> UpdateOutcome {
    let Some(invocation) = state.invocations.get_mut(thread_id) else {
        tracing::warn!(thread_id, "update for unknown invocation dropped");
        return UpdateOutcome::UnknownTarget;
    };

    let report = merge_invocation(invocation, patch);
    log_report(thread_id, &report);

    if invocation.is_terminal() {
        release_held(&mut state.held, invocation);
    } else if patch.result.is_some() || patch.error.is_some() {
        let held = state.held.entry(invocation.thread_id.clone()).or_default();
        if let Some(result) = &patch.result {
            held.result = Some(result.clone());
        }
        if let Some(error) = &patch.error {
            held.error = Some(error.clone());
        }
        tracing::debug!(thread_id, "payload held until terminal state");
    }
    UpdateOutcome::Merged(report)
}

/// Attach a payload held for a now-terminal invocation. A payload that
/// arrived with or after the terminal state takes precedence.
fn release_held(held: &mut IndexMap<ThreadId, HeldPayload>, invocation: &mut Invocation) {
    if !invocation.is_terminal() {
        return;
    }
    let Some(payload) = held.shift_remove(invocation.thread_id.as_str()) else {
        return;
    };
    match invocation.state {
        InvocationState::Completed if invocation.result.is_none() => {
            invocation.result = payload.result;
        }
        InvocationState::Failed if invocation.error.is_none() => {
            invocation.error = payload.error;
        }
        _ => {}
    }
}

fn log_report(thread_id: &str, report: &MergeReport) {
    for rejection in &report.rejected {
        if rejection.is_state_conflict() {
            tracing::warn!(thread_id, %rejection, "stale invocation update");
        } else {
            tracing::debug!(thread_id, %rejection, "invocation field corrected");
        }
    }
    if let Some((from, to)) = report.transition {
        tracing::debug!(thread_id, %from, %to, "invocation state advanced");
    }
}
