//! Nearest-feature lookup and authoritative relay, independent of any engine.
//!
//! `reach-core` holds the rules shared by the initiating and the authoritative
//! side: the bounded-radius [`locator`] that picks the closest qualifying
//! feature around an agent, and the [`relay`] halves that ship the chosen cell
//! across the trust boundary and re-validate it there. Everything the rules
//! need from the host (grid contents, agent positions, the interaction effect,
//! the message channel) comes in through the traits in [`env`].
pub mod config;
pub mod env;
pub mod error;
pub mod locator;
pub mod relay;
pub mod state;

pub use config::{ConfigError, ReachConfig, ScanOrder};
pub use env::{
    AgentOracle, ChannelError, Env, FeaturePolicy, GridError, GridOracle, InteractionEffect,
    PolicyFn, RelayChannel,
};
pub use error::{ErrorSeverity, ReachError};
pub use locator::{Candidate, LocateError, ProximityLocator, feature_distance, locate};
pub use relay::{
    Authority, Initiator, Rejection, RelayError, RelayMessage, TriggerOutcome, Verdict,
};
pub use state::{AgentId, Facing, GridPos, InteractionTarget, SelectionBox};
