// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent snapshot handling.

use fw_core::Agent;
use indexmap::IndexMap;

use super::TrackerState;

pub(crate) fn replace_all(state: &mut TrackerState, agents: impl IntoIterator<Item = Agent>) {
    let mut next = IndexMap::new();
    for agent in agents {
        if let Some(previous) = next.insert(agent.name.clone(), agent) {
            tracing::debug!(agent = %previous.name, "duplicate agent in snapshot, keeping last entry");
        }
    }
    tracing::debug!(before = state.agents.len(), after = next.len(), "agent snapshot applied");
    state.agents = next;
}
