//! Unified error types surfaced by the runtime API.
//!
//! Wraps relay, channel and configuration failures so hosts can bubble them
//! up with consistent context.
use thiserror::Error;

use reach_core::{ChannelError, ConfigError, ErrorSeverity, ReachError, RelayError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("invalid reach configuration")]
    Config(#[from] ConfigError),

    #[error("{field} must be between 1 and {max}, got {value}")]
    InvalidCapacity {
        field: &'static str,
        value: usize,
        max: usize,
    },

    #[error("channel '{0}' is already registered")]
    ChannelAlreadyRegistered(String),

    #[error("authority worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Severity of the underlying failure, for log levels.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Relay(err) => err.severity(),
            RuntimeError::Channel(err) => err.severity(),
            RuntimeError::Config(err) => err.severity(),
            RuntimeError::InvalidCapacity { .. } => ErrorSeverity::Fatal,
            RuntimeError::ChannelAlreadyRegistered(_) => ErrorSeverity::Fatal,
            RuntimeError::WorkerJoin(_) => ErrorSeverity::Internal,
        }
    }
}
