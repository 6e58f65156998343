// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fw-core: Record types and feed events for the fleetwatch execution tracker

pub mod macros;

pub mod agent;
pub mod event;
pub mod id;
pub mod invocation;
pub mod patch;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

#[cfg(any(test, feature = "test-support"))]
pub use agent::AgentBuilder;
pub use agent::{Agent, AgentMetrics, AgentState};
pub use event::{DecodeError, TrackerEvent};
pub use id::{short, AgentName, ThreadId};
#[cfg(any(test, feature = "test-support"))]
pub use invocation::InvocationBuilder;
pub use invocation::{Invocation, InvocationState, Progress, ProgressStep, StepState};
pub use patch::{InvocationPatch, ProgressPatch};
