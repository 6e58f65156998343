// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retention of historical invocations.
//!
//! The tracker consults its policy after every mutation and drops whatever
//! the policy names. Active invocations are never candidates.

use fw_core::ThreadId;

use crate::state::TrackerState;

pub trait RetentionPolicy: Send {
    /// Thread ids to evict from `state`, in any order.
    fn evictions(&self, state: &TrackerState) -> Vec<ThreadId>;
}

/// Keep every invocation for the life of the tracker.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl RetentionPolicy for KeepAll {
    fn evictions(&self, _state: &TrackerState) -> Vec<ThreadId> {
        Vec::new()
    }
}

/// Cap the number of stored invocations by evicting the oldest-inserted
/// terminal ones. When active invocations alone exceed the cap, nothing
/// further is evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedHistory {
    cap: usize,
}

impl BoundedHistory {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl RetentionPolicy for BoundedHistory {
    fn evictions(&self, state: &TrackerState) -> Vec<ThreadId> {
        let excess = state.invocation_count().saturating_sub(self.cap);
        state
            .invocations()
            .filter(|inv| inv.is_terminal())
            .take(excess)
            .map(|inv| inv.thread_id.clone())
            .collect()
    }
}

/// Apply `policy` to `state`, returning how many records were dropped.
pub(crate) fn enforce(policy: &dyn RetentionPolicy, state: &mut TrackerState) -> usize {
    let (active, evictable): (Vec<ThreadId>, Vec<ThreadId>) = policy
        .evictions(state)
        .into_iter()
        .partition(|id| state.get_invocation(id).is_some_and(|inv| inv.is_active()));
    if !active.is_empty() {
        tracing::warn!(count = active.len(), "retention policy named active invocations, kept");
    }
    if evictable.is_empty() {
        return 0;
    }
    let removed = state.remove_invocations(&evictable);
    tracing::debug!(removed, remaining = state.invocation_count(), "retention evicted invocations");
    removed
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
