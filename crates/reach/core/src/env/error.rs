//! Collaborator access errors.

use crate::error::{ErrorSeverity, ReachError};
use crate::state::GridPos;

/// The grid collaborator could not answer a query.
///
/// Distinct from "no feature here": a cell whose data is unavailable must
/// never be treated as empty.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GridError {
    /// The region containing the cell is not loaded.
    #[error("cell {0} is not loaded")]
    Unloaded(GridPos),

    /// The backing store could not be read at all.
    #[error("grid storage unavailable: {0}")]
    Unavailable(String),
}

impl ReachError for GridError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            GridError::Unloaded(_) => ErrorSeverity::Recoverable,
            GridError::Unavailable(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            GridError::Unloaded(_) => "GRID_UNLOADED",
            GridError::Unavailable(_) => "GRID_UNAVAILABLE",
        }
    }
}

/// The message channel failed to accept or deliver a message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChannelError {
    #[error("channel '{0}' is not registered")]
    UnknownChannel(String),

    #[error("channel '{0}' is full")]
    Full(String),

    #[error("channel '{0}' is closed")]
    Closed(String),

    #[error("failed to encode relay message: {0}")]
    Encode(String),

    #[error("failed to decode relay message: {0}")]
    Decode(String),
}

impl ReachError for ChannelError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ChannelError::Full(_) | ChannelError::Closed(_) => ErrorSeverity::Recoverable,
            ChannelError::Decode(_) => ErrorSeverity::Validation,
            ChannelError::UnknownChannel(_) => ErrorSeverity::Fatal,
            ChannelError::Encode(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ChannelError::UnknownChannel(_) => "CHANNEL_UNKNOWN",
            ChannelError::Full(_) => "CHANNEL_FULL",
            ChannelError::Closed(_) => "CHANNEL_CLOSED",
            ChannelError::Encode(_) => "CHANNEL_ENCODE",
            ChannelError::Decode(_) => "CHANNEL_DECODE",
        }
    }
}
