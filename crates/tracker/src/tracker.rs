// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The tracker context: store, reducer, subscriptions, and retention behind
//! one owner.
//!
//! Every mutation runs the same commit sequence: apply, enforce retention,
//! notify subscribers, then apply anything listeners deferred and notify
//! again until the deferred queue is empty.

use std::collections::VecDeque;
use std::sync::Arc;

use fw_core::{Agent, Invocation, InvocationPatch, ThreadId, TrackerEvent};
use parking_lot::Mutex;

use crate::env::TrackerConfig;
use crate::retention::{self, RetentionPolicy};
use crate::state::{TrackerState, UpdateOutcome};
use crate::subscription::{Subscription, Subscriptions};
use crate::views::{HealthPolicy, HealthSummary};

/// Upper bound on deferred batches applied by a single commit. Anything left
/// over stays queued for the next mutation or [`Tracker::flush_deferred`].
const MAX_DEFERRED_PASSES: usize = 64;

/// Queue of mutations requested from inside listeners.
///
/// Listeners run while the tracker is mid-commit and cannot mutate it
/// directly; they push events here instead. Clone it into the listener.
#[derive(Debug, Clone, Default)]
pub struct DeferredUpdates {
    queue: Arc<Mutex<VecDeque<TrackerEvent>>>,
}

impl DeferredUpdates {
    pub fn push(&self, event: TrackerEvent) {
        self.queue.lock().push_back(event);
    }

    pub fn set_agents(&self, agents: Vec<Agent>) {
        self.push(TrackerEvent::AgentsSnapshot { agents });
    }

    pub fn add_invocation(&self, invocation: Invocation) {
        self.push(TrackerEvent::InvocationObserved { invocation });
    }

    pub fn update_invocation(&self, thread_id: impl Into<ThreadId>, patch: InvocationPatch) {
        self.push(TrackerEvent::InvocationUpdated { thread_id: thread_id.into(), patch });
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    fn take_all(&self) -> VecDeque<TrackerEvent> {
        std::mem::take(&mut *self.queue.lock())
    }
}

/// Execution state tracker for one dashboard session.
pub struct Tracker {
    state: TrackerState,
    subscriptions: Subscriptions,
    deferred: DeferredUpdates,
    retention: Box<dyn RetentionPolicy>,
    health: HealthPolicy,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::with_config(TrackerConfig::default())
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("agents", &self.state.agent_count())
            .field("invocations", &self.state.invocation_count())
            .field("subscriptions", &self.subscriptions.len())
            .field("deferred", &self.deferred.len())
            .field("health", &self.health)
            .finish()
    }
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `FW_HISTORY_CAP` / `FW_MAX_ACTIVE_JOBS`.
    pub fn from_env() -> Self {
        Self::with_config(TrackerConfig::from_env())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            state: TrackerState::new(),
            subscriptions: Subscriptions::default(),
            deferred: DeferredUpdates::default(),
            retention: config.retention(),
            health: config.health,
        }
    }

    /// Replace the retention policy. Takes effect on the next mutation.
    pub fn with_retention(mut self, policy: impl RetentionPolicy + 'static) -> Self {
        self.retention = Box::new(policy);
        self
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn health_policy(&self) -> HealthPolicy {
        self.health
    }

    // ── Mutations ────────────────────────────────────────────────────────────

    pub fn set_agents(&mut self, agents: impl IntoIterator<Item = Agent>) {
        self.state.set_agents(agents);
        self.commit();
    }

    pub fn add_invocation(&mut self, invocation: Invocation) {
        self.state.add_invocation(invocation);
        self.commit();
    }

    pub fn update_invocation(&mut self, thread_id: &str, patch: &InvocationPatch) -> UpdateOutcome {
        let outcome = self.state.update_invocation(thread_id, patch);
        self.commit();
        outcome
    }

    pub fn apply_event(&mut self, event: &TrackerEvent) {
        tracing::debug!(event = %event.log_summary(), "applying event");
        self.state.apply_event(event);
        self.commit();
    }

    /// Apply events queued on [`Tracker::deferred`] outside of a listener.
    pub fn flush_deferred(&mut self) {
        if !self.deferred.is_empty() {
            self.commit();
        }
    }

    fn commit(&mut self) {
        self.settle();
        for _ in 0..MAX_DEFERRED_PASSES {
            let batch = self.deferred.take_all();
            if batch.is_empty() {
                return;
            }
            for event in &batch {
                tracing::debug!(event = %event.log_summary(), "applying deferred event");
                self.state.apply_event(event);
            }
            self.settle();
        }
        tracing::warn!(
            pending = self.deferred.len(),
            passes = MAX_DEFERRED_PASSES,
            "deferred updates still queued after commit"
        );
    }

    fn settle(&mut self) {
        retention::enforce(self.retention.as_ref(), &mut self.state);
        self.subscriptions.notify(&self.state);
    }

    // ── Subscriptions ────────────────────────────────────────────────────────

    /// Watch the value `selector` derives from the state.
    ///
    /// `listener` fires after a mutation only when the selected value differs
    /// from the last one it saw. It is not called with the initial value.
    pub fn subscribe<T, S, L>(&self, selector: S, listener: L) -> Subscription
    where
        T: PartialEq + Send + 'static,
        S: Fn(&TrackerState) -> T + Send + 'static,
        L: FnMut(&T) + Send + 'static,
    {
        self.subscriptions.subscribe(&self.state, selector, listener)
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Handle for queueing mutations from inside a listener.
    pub fn deferred(&self) -> DeferredUpdates {
        self.deferred.clone()
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn get_agent(&self, name: &str) -> Option<&Agent> {
        self.state.get_agent(name)
    }

    pub fn get_invocation(&self, thread_id: &str) -> Option<&Invocation> {
        self.state.get_invocation(thread_id)
    }

    pub fn active_job_count(&self) -> usize {
        self.state.active_job_count()
    }

    pub fn most_recent_invocation(&self) -> Option<&Invocation> {
        self.state.most_recent_invocation()
    }

    /// Health against the configured [`HealthPolicy`].
    pub fn health_summary(&self, gateway_status: &str) -> HealthSummary {
        self.state.health_summary(gateway_status, &self.health)
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
