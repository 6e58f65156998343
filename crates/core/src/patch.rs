// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Partial invocation updates.
//!
//! Every field is optional. An absent field means "no change", never "clear".

use crate::id::AgentName;
use crate::invocation::{InvocationState, ProgressStep};
use serde::{Deserialize, Serialize};

/// Partial update to an invocation's progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Steps to upsert by id
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<ProgressStep>,
}

impl ProgressPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: ProgressStep) -> Self {
        self.steps.push(step);
        self
    }

    crate::setters! {
        set {
            steps: Vec<ProgressStep>,
        }
        option {
            percent: u8,
            message: String,
        }
    }
}

/// Partial update to an invocation, merged field-by-field into the stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<InvocationState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, rename = "startedAt", skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, rename = "endedAt", skip_serializing_if = "Option::is_none")]
    pub ended_at_ms: Option<u64>,
}

impl InvocationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    crate::setters! {
        option {
            agent: AgentName,
            state: InvocationState,
            progress: ProgressPatch,
            result: serde_json::Value,
            error: String,
            started_at_ms: u64,
            ended_at_ms: u64,
        }
    }

    /// True if applying this patch could not change anything.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
#[path = "patch_tests.rs"]
mod tests;
