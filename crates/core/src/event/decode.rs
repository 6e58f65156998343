// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoding boundary for feed payloads.
//!
//! The tracker trusts its input; identity checks happen here, before an
//! event is handed over.

use super::TrackerEvent;
use thiserror::Error;

/// Reasons a feed payload is rejected before reaching the tracker.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{event}: missing {field}")]
    MissingIdentity { event: &'static str, field: &'static str },
}

impl TrackerEvent {
    /// Decode and validate a single JSON feed message.
    pub fn from_json(payload: &str) -> Result<Self, DecodeError> {
        let event: TrackerEvent = serde_json::from_str(payload)?;
        event.validate()?;
        Ok(event)
    }

    /// Decode and validate an already-parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DecodeError> {
        let event: TrackerEvent = serde_json::from_value(value)?;
        event.validate()?;
        Ok(event)
    }

    /// Reject events whose identity fields are empty.
    pub fn validate(&self) -> Result<(), DecodeError> {
        let missing = |field| DecodeError::MissingIdentity { event: self.name(), field };
        match self {
            TrackerEvent::AgentsSnapshot { agents } => {
                if agents.iter().any(|a| a.name.is_empty()) {
                    return Err(missing("agent name"));
                }
            }
            TrackerEvent::InvocationObserved { invocation } => {
                if invocation.thread_id.is_empty() {
                    return Err(missing("threadId"));
                }
                if invocation.agent.is_empty() {
                    return Err(missing("agent"));
                }
            }
            TrackerEvent::InvocationUpdated { thread_id, .. } => {
                if thread_id.is_empty() {
                    return Err(missing("threadId"));
                }
            }
        }
        Ok(())
    }
}
