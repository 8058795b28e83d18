//! Common error infrastructure for reach-core.
//!
//! Domain errors (`GridError`, `LocateError`, `RelayError`, ...) live next to
//! the code that raises them. This module holds the classification shared by
//! all of them so adapters can decide what to log and what to surface.
//!
//! "Nothing found" and "request rejected" are not errors here: they are
//! ordinary return values (`Option::None`, [`crate::relay::Verdict::Rejected`]).

/// Severity level of an error, used for categorization and logging priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Temporary condition; the user can simply retrigger.
    ///
    /// Examples: chunk not loaded, channel full
    Recoverable,

    /// Invalid input that should be dropped without retry.
    ///
    /// Examples: malformed payload
    Validation,

    /// Unexpected inconsistency in a collaborator.
    Internal,

    /// Misconfiguration; the component cannot operate at all.
    ///
    /// Examples: negative or NaN search radius
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Whether retriggering later may succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all reach-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Keep `error_code` stable; adapters use it as a log field
pub trait ReachError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
