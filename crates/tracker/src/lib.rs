// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fw-tracker: client-side execution state tracker for the fleet dashboard

pub mod env;
pub mod merge;
pub mod retention;
mod state;
mod subscription;
mod tracker;
pub mod views;

pub use env::TrackerConfig;
pub use merge::{merge_invocation, merge_steps, reconcile_record, MergeReport, Rejection};
pub use retention::{BoundedHistory, KeepAll, RetentionPolicy};
pub use state::{TrackerState, UpdateOutcome};
pub use subscription::Subscription;
pub use tracker::{DeferredUpdates, Tracker};
pub use views::{AgentCounts, HealthPolicy, HealthStatus, HealthSummary, GATEWAY_OK};
