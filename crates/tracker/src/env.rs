// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the tracker.

use crate::retention::{BoundedHistory, KeepAll, RetentionPolicy};
use crate::views::HealthPolicy;

/// Maximum stored invocations before terminal history is evicted
pub const HISTORY_CAP_VAR: &str = "FW_HISTORY_CAP";

/// Active jobs tolerated before a healthy gateway reports a warning
pub const MAX_ACTIVE_JOBS_VAR: &str = "FW_MAX_ACTIVE_JOBS";

/// Tracker settings, read from the environment or built directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerConfig {
    /// `None` keeps every invocation
    pub history_cap: Option<usize>,
    pub health: HealthPolicy,
}

impl TrackerConfig {
    pub fn from_env() -> Self {
        Self {
            history_cap: parse_history_cap(std::env::var(HISTORY_CAP_VAR).ok().as_deref()),
            health: HealthPolicy {
                max_active_jobs: parse_max_active_jobs(
                    std::env::var(MAX_ACTIVE_JOBS_VAR).ok().as_deref(),
                ),
            },
        }
    }

    pub fn history_cap(mut self, cap: usize) -> Self {
        self.history_cap = Some(cap);
        self
    }

    pub fn max_active_jobs(mut self, max: usize) -> Self {
        self.health.max_active_jobs = max;
        self
    }

    pub(crate) fn retention(&self) -> Box<dyn RetentionPolicy> {
        match self.history_cap {
            Some(cap) => Box::new(BoundedHistory::new(cap)),
            None => Box::new(KeepAll),
        }
    }
}

/// A positive integer caps history; unset keeps everything.
pub fn parse_history_cap(raw: Option<&str>) -> Option<usize> {
    let raw = raw?.trim();
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => {
            tracing::warn!(var = HISTORY_CAP_VAR, value = raw, "ignoring invalid history cap");
            None
        }
        Ok(cap) => Some(cap),
    }
}

/// Non-negative integer, default 0.
pub fn parse_max_active_jobs(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim) else {
        return 0;
    };
    raw.parse::<usize>().unwrap_or_else(|_| {
        tracing::warn!(var = MAX_ACTIVE_JOBS_VAR, value = raw, "ignoring invalid active job limit");
        0
    })
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
