use serde::{Deserialize, Serialize};

use reach_core::{AgentId, GridPos, Rejection};

/// What the authority did with one delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelayEvent {
    /// Validation passed and the effect ran.
    Applied { sender: AgentId, position: GridPos },

    /// The request was stale or forged and was dropped silently.
    Rejected {
        sender: AgentId,
        position: GridPos,
        rejection: Rejection,
    },

    /// The payload could not be decoded.
    Malformed { sender: AgentId, reason: String },

    /// The authoritative grid could not be read for the target.
    Failed {
        sender: AgentId,
        position: GridPos,
        error: String,
    },
}

impl RelayEvent {
    pub fn sender(&self) -> AgentId {
        match self {
            RelayEvent::Applied { sender, .. }
            | RelayEvent::Rejected { sender, .. }
            | RelayEvent::Malformed { sender, .. }
            | RelayEvent::Failed { sender, .. } => *sender,
        }
    }
}
