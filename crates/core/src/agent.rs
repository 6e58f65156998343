// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent records as reported by the gateway's agent-list snapshot.
//!
//! An agent's fields always come from a single fetch: records are replaced
//! wholesale, never patched.

use crate::id::AgentName;
use serde::{Deserialize, Serialize};

/// Deployment state of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentState {
    Running,
    Stopped,
    /// Known to the gateway but no container exists yet
    NotCreated,
}

crate::simple_display! {
    AgentState {
        Running => "running",
        Stopped => "stopped",
        NotCreated => "not-created",
    }
}

/// Point-in-time resource gauges. No history is retained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetrics {
    pub cpu: f64,
    pub memory: f64,
    pub requests: u64,
}

/// A deployed agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub name: AgentName,
    pub state: AgentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Epoch milliseconds of the agent's last reported activity
    #[serde(default, rename = "lastActivity", skip_serializing_if = "Option::is_none")]
    pub last_activity_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<AgentMetrics>,
}

impl Agent {
    pub fn new(name: impl Into<AgentName>, state: AgentState) -> Self {
        Self {
            name: name.into(),
            state,
            port: None,
            registry: None,
            repo: None,
            tag: None,
            last_activity_ms: None,
            metrics: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == AgentState::Running
    }

    /// Image reference in `registry/repo:tag` form, when the agent reports one.
    pub fn image(&self) -> Option<String> {
        let repo = self.repo.as_deref()?;
        let mut image = match self.registry.as_deref() {
            Some(registry) if !registry.is_empty() => format!("{registry}/{repo}"),
            _ => repo.to_string(),
        };
        if let Some(tag) = self.tag.as_deref() {
            image.push(':');
            image.push_str(tag);
        }
        Some(image)
    }
}

crate::builder! {
    pub struct AgentBuilder => Agent {
        into {
            name: AgentName = "agent-1",
        }
        set {
            state: AgentState = AgentState::Running,
        }
        option {
            port: u16 = None,
            registry: String = None,
            repo: String = None,
            tag: String = None,
            last_activity_ms: u64 = None,
            metrics: AgentMetrics = None,
        }
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
