// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event accessors and log summaries

use super::TrackerEvent;
use crate::id::ThreadId;

impl TrackerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackerEvent::AgentsSnapshot { .. } => "agents:snapshot",
            TrackerEvent::InvocationObserved { .. } => "invocation:observed",
            TrackerEvent::InvocationUpdated { .. } => "invocation:updated",
        }
    }

    /// The invocation this event targets, if any.
    pub fn thread_id(&self) -> Option<&ThreadId> {
        match self {
            TrackerEvent::AgentsSnapshot { .. } => None,
            TrackerEvent::InvocationObserved { invocation } => Some(&invocation.thread_id),
            TrackerEvent::InvocationUpdated { thread_id, .. } => Some(thread_id),
        }
    }

    /// One-line description for logs.
    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            TrackerEvent::AgentsSnapshot { agents } => format!("{t} count={}", agents.len()),
            TrackerEvent::InvocationObserved { invocation } => format!(
                "{t} thread={} agent={} state={}",
                invocation.thread_id, invocation.agent, invocation.state
            ),
            TrackerEvent::InvocationUpdated { thread_id, patch } => match patch.state {
                Some(state) => format!("{t} thread={thread_id} state={state}"),
                None => format!("{t} thread={thread_id}"),
            },
        }
    }
}
