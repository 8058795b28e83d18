//! Value types shared by the locator and the relay.
mod common;
mod geometry;

pub use common::{AgentId, Facing, GridPos, InteractionTarget};
pub use geometry::SelectionBox;
