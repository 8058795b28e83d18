//! Door toggling as the interaction effect.
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, warn};

use reach_core::{AgentId, InteractionEffect, InteractionTarget};

use crate::oracle::{Block, SharedGrid};

/// Flips the open state of the door at the target cell.
///
/// The cell must still hold exactly the feature that was validated; a door
/// replaced or toggled in between is left alone.
///
/// Clones share the grid and the application counter, so a test or host can
/// keep one handle while the worker owns another.
#[derive(Clone, Debug)]
pub struct ToggleDoor {
    grid: SharedGrid,
    applied: Arc<AtomicUsize>,
}

impl ToggleDoor {
    pub fn new(grid: SharedGrid) -> Self {
        Self {
            grid,
            applied: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of times the effect toggled a door.
    pub fn applied(&self) -> usize {
        self.applied.load(Ordering::Acquire)
    }
}

impl InteractionEffect<Block> for ToggleDoor {
    fn perform(&mut self, agent: AgentId, feature: &Block, target: InteractionTarget) {
        let mut grid = match self.grid.write() {
            Ok(grid) => grid,
            Err(err) => {
                warn!(%agent, position = %target.position, %err, "cannot toggle door");
                return;
            }
        };
        let Some(block) = grid.get_mut(target.position) else {
            debug!(%agent, position = %target.position, "door vanished before toggle");
            return;
        };
        // Only the block that was validated may be toggled.
        if &*block != feature {
            debug!(%agent, position = %target.position, "door changed before toggle");
            return;
        }
        let Block::Door(door) = block else {
            return;
        };

        door.toggle();
        self.applied.fetch_add(1, Ordering::AcqRel);
        debug!(%agent, position = %target.position, face = %target.face, open = door.open, "door toggled");
    }
}
