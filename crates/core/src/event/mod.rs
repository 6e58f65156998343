// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Feed events delivered by the data-fetching layer.
//!
//! Polling snapshots and push-stream messages are both expressed as
//! [`TrackerEvent`]s. Serializes with `{"type": "scope:name", ...fields}`.

mod decode;
mod methods;

pub use decode::DecodeError;

use crate::agent::Agent;
use crate::id::ThreadId;
use crate::invocation::Invocation;
use crate::patch::InvocationPatch;
use serde::{Deserialize, Serialize};

/// A decoded update for the execution tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TrackerEvent {
    /// Full agent list; replaces every known agent.
    #[serde(rename = "agents:snapshot")]
    AgentsSnapshot { agents: Vec<Agent> },

    /// Complete invocation record (first observation or authoritative refetch).
    #[serde(rename = "invocation:observed")]
    InvocationObserved { invocation: Invocation },

    /// Partial update for a known invocation.
    #[serde(rename = "invocation:updated")]
    InvocationUpdated {
        #[serde(rename = "threadId")]
        thread_id: ThreadId,
        patch: InvocationPatch,
    },
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
