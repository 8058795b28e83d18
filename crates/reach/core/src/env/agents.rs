use glam::DVec3;

use crate::state::AgentId;

/// Authoritative lookup of where an agent currently is.
pub trait AgentOracle: Send + Sync {
    /// Continuous position of `agent`, or `None` when it has no live entity.
    fn position(&self, agent: AgentId) -> Option<DVec3>;
}
