//! Live agent positions served through [`reach_core::AgentOracle`].
use std::collections::HashMap;
use std::sync::RwLock;

use glam::DVec3;
use tracing::warn;

use reach_core::{AgentId, AgentOracle};

/// Authoritative record of where each connected agent stands.
///
/// Positions are written by the host's movement code and read by the
/// authority when it re-validates a relayed request.
#[derive(Debug, Default)]
pub struct AgentRegistry {
    positions: RwLock<HashMap<AgentId, DVec3>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&self, agent: AgentId, position: DVec3) {
        self.move_to(agent, position);
    }

    pub fn move_to(&self, agent: AgentId, position: DVec3) {
        match self.positions.write() {
            Ok(mut positions) => {
                positions.insert(agent, position);
            }
            Err(_) => warn!(%agent, "agent registry lock poisoned, position not recorded"),
        }
    }

    /// Removes `agent`; later requests from it are rejected as unknown.
    pub fn despawn(&self, agent: AgentId) -> Option<DVec3> {
        self.positions.write().ok()?.remove(&agent)
    }
}

impl AgentOracle for AgentRegistry {
    fn position(&self, agent: AgentId) -> Option<DVec3> {
        self.positions.read().ok()?.get(&agent).copied()
    }
}
