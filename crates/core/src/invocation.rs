// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Invocation records and their state machine.
//!
//! An invocation is one run of an agent. Its state only ever moves forward:
//!
//! ```text
//! pending ──► running ──► completed
//!                    └──► failed
//! ```
//!
//! `completed` and `failed` share the top rank, so neither may replace the
//! other once reached.

use crate::id::{AgentName, ThreadId};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl InvocationState {
    /// Position in the forward-only ordering. Terminal states share a rank.
    pub fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Pending or running.
    pub fn is_active(self) -> bool {
        !self.is_terminal()
    }

    /// Whether moving from `self` to `next` is allowed.
    ///
    /// Staying put is always allowed; otherwise the rank must strictly
    /// increase, and a terminal state admits nothing else.
    pub fn can_advance_to(self, next: Self) -> bool {
        self == next || (!self.is_terminal() && next.rank() > self.rank())
    }
}

crate::simple_display! {
    InvocationState {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// State of one pipeline step inside an invocation's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepState {
    pub fn rank(self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Running => 1,
            Self::Completed | Self::Failed => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Same forward-only rule as [`InvocationState::can_advance_to`].
    pub fn can_advance_to(self, next: Self) -> bool {
        self == next || (!self.is_terminal() && next.rank() > self.rank())
    }
}

crate::simple_display! {
    StepState {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
    }
}

/// One step of an invocation's pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressStep {
    pub id: String,
    pub label: String,
    pub state: StepState,
}

impl ProgressStep {
    pub fn new(id: impl Into<String>, label: impl Into<String>, state: StepState) -> Self {
        Self { id: id.into(), label: label.into(), state }
    }
}

/// Progress reported by a running invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Completion percentage, 0 to 100, clamped on merge
    #[serde(default)]
    pub percent: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Steps in pipeline order
    #[serde(default)]
    pub steps: Vec<ProgressStep>,
}

impl Progress {
    pub fn step(&self, id: &str) -> Option<&ProgressStep> {
        self.steps.iter().find(|s| s.id == id)
    }
}

/// One execution of an agent, keyed by its thread id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invocation {
    pub thread_id: ThreadId,
    /// Agent that ran this invocation. The agent may no longer be listed.
    pub agent: AgentName,
    pub state: InvocationState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    /// Opaque payload, present only once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Failure description, present only once failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Epoch milliseconds when the gateway created the invocation
    #[serde(rename = "createdAt")]
    pub created_at_ms: u64,
    #[serde(default, rename = "startedAt", skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, rename = "endedAt", skip_serializing_if = "Option::is_none")]
    pub ended_at_ms: Option<u64>,
}

impl Invocation {
    pub fn new(
        thread_id: impl Into<ThreadId>,
        agent: impl Into<AgentName>,
        state: InvocationState,
        created_at_ms: u64,
    ) -> Self {
        Self {
            thread_id: thread_id.into(),
            agent: agent.into(),
            state,
            progress: None,
            result: None,
            error: None,
            created_at_ms,
            started_at_ms: None,
            ended_at_ms: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Wall-clock run time, once both ends are known.
    pub fn duration_ms(&self) -> Option<u64> {
        let started = self.started_at_ms?;
        let ended = self.ended_at_ms?;
        Some(ended.saturating_sub(started))
    }
}

crate::builder! {
    pub struct InvocationBuilder => Invocation {
        into {
            thread_id: ThreadId = "t-1",
            agent: AgentName = "agent-1",
        }
        set {
            state: InvocationState = InvocationState::Pending,
            created_at_ms: u64 = 1_000_000,
        }
        option {
            progress: Progress = None,
            result: serde_json::Value = None,
            error: String = None,
            started_at_ms: u64 = None,
            ended_at_ms: u64 = None,
        }
    }
}

#[cfg(test)]
#[path = "invocation_tests.rs"]
mod tests;
