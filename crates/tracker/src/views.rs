// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derived views over the entity store.
//!
//! Every view is recomputed from the current records on each call; nothing
//! here is cached.

use fw_core::{AgentState, Invocation};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::state::TrackerState;

/// Gateway status string that counts as reachable and healthy.
pub const GATEWAY_OK: &str = "ok";

/// Caller-supplied thresholds for [`TrackerState::health_summary`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthPolicy {
    /// Active jobs tolerated before a healthy gateway reports a warning
    pub max_active_jobs: usize,
}

/// Coarse dashboard health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Error,
}

fw_core::simple_display! {
    HealthStatus {
        Healthy => "healthy",
        Warning => "warning",
        Error => "error",
    }
}

/// Health status together with the raw inputs it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    pub status: HealthStatus,
    pub active_jobs: usize,
    pub gateway_ok: bool,
}

/// Number of agents in each deployment state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCounts {
    pub running: usize,
    pub stopped: usize,
    pub not_created: usize,
}

impl AgentCounts {
    pub fn total(&self) -> usize {
        self.running + self.stopped + self.not_created
    }
}

impl TrackerState {
    /// Invocations that are pending or running.
    pub fn active_job_count(&self) -> usize {
        self.invocations().filter(|inv| inv.is_active()).count()
    }

    /// The invocation with the latest `createdAt`. On a tie the later
    /// insertion wins.
    pub fn most_recent_invocation(&self) -> Option<&Invocation> {
        self.invocations().fold(None, |best: Option<&Invocation>, inv| match best {
            Some(b) if b.created_at_ms > inv.created_at_ms => Some(b),
            _ => Some(inv),
        })
    }

    /// Up to `limit` invocations, newest `createdAt` first, ties broken by
    /// later insertion first.
    pub fn recent_invocations(&self, limit: usize) -> Vec<&Invocation> {
        let mut recent: Vec<(usize, &Invocation)> = self.invocations().enumerate().collect();
        recent.sort_by(|(ia, a), (ib, b)| {
            b.created_at_ms.cmp(&a.created_at_ms).then_with(|| ib.cmp(ia))
        });
        recent.into_iter().take(limit).map(|(_, inv)| inv).collect()
    }

    /// Latest invocation per agent name, keyed in order of each agent's
    /// first invocation.
    pub fn most_recent_per_agent(&self) -> IndexMap<&str, &Invocation> {
        let mut latest: IndexMap<&str, &Invocation> = IndexMap::new();
        for inv in self.invocations() {
            let slot = latest.entry(inv.agent.as_str()).or_insert(inv);
            if inv.created_at_ms >= slot.created_at_ms {
                *slot = inv;
            }
        }
        latest
    }

    /// Invocations of one agent, in insertion order.
    pub fn invocations_for_agent<'a>(
        &'a self,
        agent: &'a str,
    ) -> impl Iterator<Item = &'a Invocation> + 'a {
        self.invocations().filter(move |inv| inv.agent == agent)
    }

    pub fn agent_counts(&self) -> AgentCounts {
        let mut counts = AgentCounts::default();
        for agent in self.agents() {
            match agent.state {
                AgentState::Running => counts.running += 1,
                AgentState::Stopped => counts.stopped += 1,
                AgentState::NotCreated => counts.not_created += 1,
            }
        }
        counts
    }

    /// Healthy iff the gateway reports [`GATEWAY_OK`] and the active job count
    /// is within `policy`; warning if the gateway is ok but more jobs are
    /// active; error for any other gateway status.
    pub fn health_summary(&self, gateway_status: &str, policy: &HealthPolicy) -> HealthSummary {
        let active_jobs = self.active_job_count();
        let gateway_ok = gateway_status == GATEWAY_OK;
        let status = if !gateway_ok {
            HealthStatus::Error
        } else if active_jobs > policy.max_active_jobs {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        };
        HealthSummary { status, active_jobs, gateway_ok }
    }
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
