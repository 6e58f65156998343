// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Entity store: the canonical agent and invocation records.

mod agents;
mod invocations;

pub use invocations::UpdateOutcome;

use invocations::HeldPayload;

use fw_core::{Agent, AgentName, Invocation, InvocationPatch, ThreadId, TrackerEvent};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// In-memory state of the fleet as last reported by the gateway.
///
/// Both maps are private; every change goes through the operations below so
/// the reducer's invariants hold for all writers.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TrackerState {
    /// Agents in the order of the last snapshot.
    agents: IndexMap<AgentName, Agent>,
    /// Invocations in first-observation order.
    invocations: IndexMap<ThreadId, Invocation>,
    /// Payloads waiting for their terminal state. Not part of the dump.
    #[serde(skip)]
    held: IndexMap<ThreadId, HeldPayload>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire agent collection. Invocations are untouched.
    pub fn set_agents(&mut self, agents: impl IntoIterator<Item = Agent>) {
        agents::replace_all(self, agents);
    }

    pub fn get_agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Insert the record, or reconcile it with the one already stored under
    /// its thread id. A stored terminal outcome survives a stale snapshot.
    pub fn add_invocation(&mut self, invocation: Invocation) {
        invocations::insert(self, invocation);
    }

    /// Merge a partial update into a known invocation.
    ///
    /// Unknown thread ids are dropped: no record is created from a partial.
    pub fn update_invocation(&mut self, thread_id: &str, patch: &InvocationPatch) -> UpdateOutcome {
        invocations::update(self, thread_id, patch)
    }

    pub fn get_invocation(&self, thread_id: &str) -> Option<&Invocation> {
        self.invocations.get(thread_id)
    }

    /// Invocations in first-observation order.
    pub fn invocations(&self) -> impl DoubleEndedIterator<Item = &Invocation> {
        self.invocations.values()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.len()
    }

    /// Drop invocations by id, keeping the order of the rest. Used by
    /// retention policies only.
    pub(crate) fn remove_invocations(&mut self, thread_ids: &[ThreadId]) -> usize {
        for id in thread_ids {
            self.held.shift_remove(id.as_str());
        }
        thread_ids.iter().filter(|id| self.invocations.shift_remove(id.as_str()).is_some()).count()
    }

    /// Apply a feed event to the store.
    ///
    /// # Idempotency
    ///
    /// Applying the same event twice leaves the same state as applying it
    /// once: snapshots and observed records replace, and the reducer accepts
    /// a repeated patch as a no-op.
    pub fn apply_event(&mut self, event: &TrackerEvent) {
        match event {
            TrackerEvent::AgentsSnapshot { agents } => self.set_agents(agents.iter().cloned()),
            TrackerEvent::InvocationObserved { invocation } => {
                self.add_invocation(invocation.clone())
            }
            TrackerEvent::InvocationUpdated { thread_id, patch } => {
                self.update_invocation(thread_id, patch);
            }
        }
    }
}

#[cfg(test)]
#[path = "../state_tests/mod.rs"]
mod tests;
