//! Concrete world adapters behind the `reach-core` oracle traits.
//!
//! The grid and the agent registry stand in for a host engine's block
//! accessor and entity list. Both sides of a session use the same types:
//! the client reads its own (possibly stale) [`SharedGrid`] view while the
//! authority reads the canonical one.
mod agents;
mod grid;

pub use agents::AgentRegistry;
pub use grid::{Block, BlockGrid, CHUNK_SIZE, ChunkPos, Door, DoorKind, SharedGrid};
