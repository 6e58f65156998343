// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared imports and helpers for specs.

pub use fw_core::test_support::{
    agent, invocation, invocation_updated_event, state_patch, step_patch,
};
pub use fw_core::{AgentState, InvocationPatch, InvocationState, StepState, TrackerEvent};
pub use fw_tracker::{HealthStatus, Tracker, TrackerConfig, TrackerState};

use parking_lot::Mutex;
use std::sync::Arc;

/// Values a listener has been called with, in firing order.
#[derive(Clone)]
pub struct Seen<T>(Arc<Mutex<Vec<T>>>);

impl<T: Clone + Send + 'static> Seen<T> {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }

    /// A listener that records into this log.
    pub fn listener(&self) -> impl FnMut(&T) + Send + 'static {
        let sink = Arc::clone(&self.0);
        move |value: &T| sink.lock().push(value.clone())
    }

    pub fn values(&self) -> Vec<T> {
        self.0.lock().clone()
    }
}

/// Invocation as JSON, for snapshot comparisons.
pub fn invocation_json(tracker: &Tracker, thread_id: &str) -> serde_json::Value {
    serde_json::to_value(tracker.get_invocation(thread_id)).unwrap()
}
