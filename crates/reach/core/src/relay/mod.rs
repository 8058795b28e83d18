//! Relay of a located target from the initiating side to the authoritative side.
//!
//! The only datum crossing the trust boundary is [`RelayMessage`]: a bare
//! cell address. The [`Initiator`] produces it from a locator hit; the
//! [`Authority`] takes the sender identity from the channel, re-derives
//! everything else from its own state and either applies the interaction or
//! drops the request without a reply.
mod authority;
mod initiator;

use crate::env::{ChannelError, GridError};
use crate::error::{ErrorSeverity, ReachError};
use crate::locator::{Candidate, LocateError};
use crate::state::GridPos;

pub use authority::Authority;
pub use initiator::Initiator;

/// Target cell sent from the initiating side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelayMessage {
    pub position: GridPos,
}

impl RelayMessage {
    pub const fn new(position: GridPos) -> Self {
        Self { position }
    }
}

/// Result of handling one trigger on the initiating side.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerOutcome<F> {
    /// A target was found and relayed.
    Consumed(Candidate<F>),
    /// Nothing in range; the trigger falls through to other handlers.
    NotConsumed,
}

impl<F> TriggerOutcome<F> {
    pub fn consumed(&self) -> bool {
        matches!(self, TriggerOutcome::Consumed(_))
    }

    pub fn candidate(&self) -> Option<&Candidate<F>> {
        match self {
            TriggerOutcome::Consumed(candidate) => Some(candidate),
            TriggerOutcome::NotConsumed => None,
        }
    }
}

/// Why the authoritative side dropped a request.
///
/// Never sent back to the initiator: answering would let a client probe
/// which cells hold features.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rejection {
    #[error("sender has no live agent")]
    UnknownSender,

    #[error("target is {distance:.2} away, limit is {max_radius}")]
    OutOfRange { distance: f64, max_radius: f64 },

    #[error("target cell is empty")]
    NoFeature,

    #[error("feature at target does not qualify")]
    NotQualifying,
}

impl ReachError for Rejection {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Rejection::UnknownSender => "REJECT_UNKNOWN_SENDER",
            Rejection::OutOfRange { .. } => "REJECT_OUT_OF_RANGE",
            Rejection::NoFeature => "REJECT_NO_FEATURE",
            Rejection::NotQualifying => "REJECT_NOT_QUALIFYING",
        }
    }
}

/// Result of handling one message on the authoritative side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    Applied,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_applied(&self) -> bool {
        matches!(self, Verdict::Applied)
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RelayError {
    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl ReachError for RelayError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RelayError::Locate(err) => err.severity(),
            RelayError::Grid(err) => err.severity(),
            RelayError::Channel(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RelayError::Locate(err) => err.error_code(),
            RelayError::Grid(err) => err.error_code(),
            RelayError::Channel(err) => err.error_code(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::env::{ChannelError, InteractionEffect, RelayChannel};
    use crate::locator::tests::TestFeature;
    use crate::state::{AgentId, InteractionTarget};

    use super::RelayMessage;

    #[derive(Default)]
    pub(crate) struct RecordingChannel {
        pub sent: Vec<RelayMessage>,
        pub fail_with: Option<ChannelError>,
    }

    impl RelayChannel for RecordingChannel {
        fn send(&mut self, message: &RelayMessage) -> Result<(), ChannelError> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            self.sent.push(*message);
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingEffect {
        pub calls: Vec<(AgentId, TestFeature, InteractionTarget)>,
    }

    impl InteractionEffect<TestFeature> for RecordingEffect {
        fn perform(&mut self, agent: AgentId, feature: &TestFeature, target: InteractionTarget) {
            self.calls.push((agent, feature.clone(), target));
        }
    }
}
