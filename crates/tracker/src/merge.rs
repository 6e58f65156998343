// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invariant-preserving merge of partial updates into invocation records.
//!
//! Updates arrive from polling and streaming in any order, so a merge never
//! fails: fields that would break an invariant are dropped and reported,
//! everything else applies. Applying the same patch twice yields the same
//! record as applying it once.

use fw_core::{Invocation, InvocationPatch, InvocationState, ProgressPatch, ProgressStep, StepState};

/// A patch field the reducer refused to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The record is terminal and the patch asked for a different state
    TerminalState { current: InvocationState, requested: InvocationState },
    /// The patch would move the state backwards
    StateRegression { current: InvocationState, requested: InvocationState },
    /// `startedAt` earlier than `createdAt`
    StartedBeforeCreated { created_at_ms: u64, requested: u64 },
    /// `startedAt` would move earlier than its current value
    StartedAtEarlier { current: u64, requested: u64 },
    /// `startedAt` later than an already known `endedAt`
    StartedAfterEnded { ended_at_ms: u64, requested: u64 },
    /// `endedAt` would move earlier than its current value
    EndedAtEarlier { current: u64, requested: u64 },
    /// `endedAt` earlier than `startedAt` (or `createdAt` when not started)
    EndedBeforeStart { start_ms: u64, requested: u64 },
    /// A result only belongs to a completed invocation
    ResultWithoutCompletion { state: InvocationState },
    /// An error only belongs to a failed invocation
    ErrorWithoutFailure { state: InvocationState },
    /// A progress step would move backwards
    StepRegression { step: String, current: StepState, requested: StepState },
}

impl Rejection {
    /// Conflicts on the state field itself.
    pub fn is_state_conflict(&self) -> bool {
        matches!(self, Rejection::TerminalState { .. } | Rejection::StateRegression { .. })
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TerminalState { current, requested } => {
                write!(f, "state {requested} ignored, already {current}")
            }
            Rejection::StateRegression { current, requested } => {
                write!(f, "state regression {current} -> {requested} ignored")
            }
            Rejection::StartedBeforeCreated { created_at_ms, requested } => {
                write!(f, "startedAt {requested} precedes createdAt {created_at_ms}")
            }
            Rejection::StartedAtEarlier { current, requested } => {
                write!(f, "startedAt {requested} would move back from {current}")
            }
            Rejection::StartedAfterEnded { ended_at_ms, requested } => {
                write!(f, "startedAt {requested} follows endedAt {ended_at_ms}")
            }
            Rejection::EndedAtEarlier { current, requested } => {
                write!(f, "endedAt {requested} would move back from {current}")
            }
            Rejection::EndedBeforeStart { start_ms, requested } => {
                write!(f, "endedAt {requested} precedes start {start_ms}")
            }
            Rejection::ResultWithoutCompletion { state } => {
                write!(f, "result dropped, invocation is {state}")
            }
            Rejection::ErrorWithoutFailure { state } => {
                write!(f, "error dropped, invocation is {state}")
            }
            Rejection::StepRegression { step, current, requested } => {
                write!(f, "step {step} regression {current} -> {requested} ignored")
            }
        }
    }
}

/// What a merge changed and what it refused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub rejected: Vec<Rejection>,
    /// Set when the state field moved
    pub transition: Option<(InvocationState, InvocationState)>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Merge `patch` into `inv` in place.
pub fn merge_invocation(inv: &mut Invocation, patch: &InvocationPatch) -> MergeReport {
    let mut report = MergeReport::default();

    if let Some(agent) = &patch.agent {
        inv.agent = agent.clone();
    }

    if let Some(requested) = patch.state {
        merge_state(inv, requested, &mut report);
    }

    if let Some(requested) = patch.started_at_ms {
        merge_started_at(inv, requested, &mut report);
    }
    if let Some(requested) = patch.ended_at_ms {
        merge_ended_at(inv, requested, &mut report);
    }

    if let Some(progress) = &patch.progress {
        merge_progress(inv, progress, &mut report);
    }

    // Checked against the post-merge state so a terminal transition and its
    // payload can travel in the same patch.
    if let Some(result) = &patch.result {
        if inv.state == InvocationState::Completed {
            inv.result = Some(result.clone());
        } else {
            report.rejected.push(Rejection::ResultWithoutCompletion { state: inv.state });
        }
    }
    if let Some(error) = &patch.error {
        if inv.state == InvocationState::Failed {
            inv.error = Some(error.clone());
        } else {
            report.rejected.push(Rejection::ErrorWithoutFailure { state: inv.state });
        }
    }

    report
}

/// Reconcile a full record re-observed for a known thread id.
///
/// `incoming` replaces the stored record except where it would undo what the
/// store already knows: a terminal outcome (state, result, error, `endedAt`)
/// is kept, the state never regresses, and known timestamps never move
/// earlier. A poll snapshot fetched before the push stream's completion can
/// therefore arrive last without reviving the invocation.
pub fn reconcile_record(existing: &Invocation, incoming: &mut Invocation) -> MergeReport {
    let mut report = MergeReport::default();
    let (current, requested) = (existing.state, incoming.state);

    if current.is_terminal() && requested != current {
        report.rejected.push(Rejection::TerminalState { current, requested });
        incoming.state = current;
        incoming.result.clone_from(&existing.result);
        incoming.error.clone_from(&existing.error);
        incoming.ended_at_ms = existing.ended_at_ms;
    } else if !current.can_advance_to(requested) {
        report.rejected.push(Rejection::StateRegression { current, requested });
        incoming.state = current;
    } else if current != requested {
        report.transition = Some((current, requested));
    }
    if incoming.state == InvocationState::Completed && incoming.result.is_none() {
        incoming.result.clone_from(&existing.result);
    }
    if incoming.state == InvocationState::Failed && incoming.error.is_none() {
        incoming.error.clone_from(&existing.error);
    }

    if let Some(current) = existing.started_at_ms {
        match incoming.started_at_ms {
            Some(requested) if requested < current => {
                report.rejected.push(Rejection::StartedAtEarlier { current, requested });
                incoming.started_at_ms = Some(current);
            }
            None => incoming.started_at_ms = Some(current),
            Some(_) => {}
        }
    }
    if let Some(current) = existing.ended_at_ms {
        match incoming.ended_at_ms {
            Some(requested) if requested < current => {
                report.rejected.push(Rejection::EndedAtEarlier { current, requested });
                incoming.ended_at_ms = Some(current);
            }
            None => incoming.ended_at_ms = Some(current),
            Some(_) => {}
        }
    }
    if let (Some(start_ms), Some(requested)) = (incoming.started_at_ms, incoming.ended_at_ms) {
        if requested < start_ms {
            report.rejected.push(Rejection::EndedBeforeStart { start_ms, requested });
            incoming.ended_at_ms = existing.ended_at_ms.filter(|ended| *ended >= start_ms);
        }
    }

    report
}

fn merge_state(inv: &mut Invocation, requested: InvocationState, report: &mut MergeReport) {
    let current = inv.state;
    if current == requested {
        return;
    }
    if current.is_terminal() {
        report.rejected.push(Rejection::TerminalState { current, requested });
    } else if !current.can_advance_to(requested) {
        report.rejected.push(Rejection::StateRegression { current, requested });
    } else {
        inv.state = requested;
        report.transition = Some((current, requested));
    }
}

fn merge_started_at(inv: &mut Invocation, requested: u64, report: &mut MergeReport) {
    if requested < inv.created_at_ms {
        report
            .rejected
            .push(Rejection::StartedBeforeCreated { created_at_ms: inv.created_at_ms, requested });
        return;
    }
    if let Some(current) = inv.started_at_ms {
        if requested < current {
            report.rejected.push(Rejection::StartedAtEarlier { current, requested });
            return;
        }
    }
    if let Some(ended_at_ms) = inv.ended_at_ms {
        if requested > ended_at_ms {
            report.rejected.push(Rejection::StartedAfterEnded { ended_at_ms, requested });
            return;
        }
    }
    inv.started_at_ms = Some(requested);
}

fn merge_ended_at(inv: &mut Invocation, requested: u64, report: &mut MergeReport) {
    if let Some(current) = inv.ended_at_ms {
        if requested < current {
            report.rejected.push(Rejection::EndedAtEarlier { current, requested });
            return;
        }
    }
    let start_ms = inv.started_at_ms.unwrap_or(inv.created_at_ms);
    if requested < start_ms {
        report.rejected.push(Rejection::EndedBeforeStart { start_ms, requested });
        return;
    }
    inv.ended_at_ms = Some(requested);
}

fn merge_progress(inv: &mut Invocation, patch: &ProgressPatch, report: &mut MergeReport) {
    let progress = inv.progress.get_or_insert_with(Default::default);
    if let Some(percent) = patch.percent {
        progress.percent = percent.min(100);
    }
    if let Some(message) = &patch.message {
        progress.message = Some(message.clone());
    }
    merge_steps(&mut progress.steps, &patch.steps, report);
}

/// Upsert steps by id. Known ids update in place, new ids append in arrival
/// order; existing steps are never reordered.
pub fn merge_steps(steps: &mut Vec<ProgressStep>, incoming: &[ProgressStep], report: &mut MergeReport) {
    for step in incoming {
        let Some(existing) = steps.iter_mut().find(|s| s.id == step.id) else {
            steps.push(step.clone());
            continue;
        };
        existing.label.clone_from(&step.label);
        if existing.state.can_advance_to(step.state) {
            existing.state = step.state;
        } else {
            report.rejected.push(Rejection::StepRegression {
                step: step.id.clone(),
                current: existing.state,
                requested: step.state,
            });
        }
    }
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod tests;
