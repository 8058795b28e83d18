//! Tokio runtime around the `reach-core` relay.
//!
//! This crate gives the engine-independent rules a concrete world and a
//! process boundary to cross. Hosts build a [`RelayRuntime`], connect one
//! [`ClientSession`] per player, and observe what the authority did through
//! [`RelayEvent`]s.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`session`] is the client half that answers the trigger hotkey
//! - [`transport`] and [`codec`] carry relay messages between the halves
//! - [`oracle`], [`policy`] and [`effect`] adapt the block world to the core traits
//! - [`events`] broadcasts authority outcomes
//! - [`workers`] keeps the authority task internal to the crate
pub mod api;
pub mod codec;
pub mod config;
pub mod effect;
pub mod events;
pub mod oracle;
pub mod policy;
pub mod runtime;
pub mod session;
pub mod transport;

mod workers;

pub use api::{Result, RuntimeError};
pub use codec::Envelope;
pub use config::{RuntimeConfig, TriggerBinding};
pub use effect::ToggleDoor;
pub use events::{EventBus, RelayEvent};
pub use oracle::{AgentRegistry, Block, BlockGrid, ChunkPos, Door, DoorKind, SharedGrid};
pub use policy::DoorPolicy;
pub use runtime::{RelayRuntime, RelayRuntimeBuilder};
pub use session::ClientSession;
pub use transport::{ChannelHub, ClientEndpoint, Delivery, ServerInbox};
