//! Which blocks count as interactable doors.
use reach_core::{AgentId, FeaturePolicy, GridPos};

use crate::oracle::{Block, DoorKind};

/// Doors qualify when the asking agent could open them by hand: a hinged door
/// unless it is locked to someone else, a sliding door only if its variant is
/// hand-openable.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoorPolicy;

impl FeaturePolicy<Block> for DoorPolicy {
    fn is_category(&self, feature: &Block) -> bool {
        matches!(feature, Block::Door(_))
    }

    fn is_eligible(&self, agent: AgentId, feature: &Block, _position: GridPos) -> bool {
        let Some(door) = feature.as_door() else {
            return false;
        };
        match door.kind {
            DoorKind::Hinged { locked_to, .. } => locked_to.is_none_or(|owner| owner == agent),
            DoorKind::Sliding { hand_openable } => hand_openable,
        }
    }
}

#[cfg(test)]
mod tests {
    use reach_core::Facing;

    use super::*;
    use crate::oracle::Door;

    const OWNER: AgentId = AgentId(1);
    const STRANGER: AgentId = AgentId(2);

    #[test]
    fn only_doors_are_in_category() {
        assert!(DoorPolicy.is_category(&Block::Door(Door::sliding(false))));
        assert!(!DoorPolicy.is_category(&Block::Solid));
        assert!(!DoorPolicy.qualifies(OWNER, &Block::Solid, GridPos::ORIGIN));
    }

    #[test]
    fn locked_doors_open_for_their_owner_only() {
        let door = Block::Door(Door::locked(Facing::South, OWNER));
        assert!(DoorPolicy.qualifies(OWNER, &door, GridPos::ORIGIN));
        assert!(!DoorPolicy.qualifies(STRANGER, &door, GridPos::ORIGIN));

        let open_to_all = Block::Door(Door::hinged(Facing::South));
        assert!(DoorPolicy.qualifies(STRANGER, &open_to_all, GridPos::ORIGIN));
    }

    #[test]
    fn sliding_doors_follow_the_hand_openable_flag() {
        let manual = Block::Door(Door::sliding(true));
        let powered = Block::Door(Door::sliding(false));
        assert!(DoorPolicy.qualifies(OWNER, &manual, GridPos::ORIGIN));
        assert!(!DoorPolicy.qualifies(OWNER, &powered, GridPos::ORIGIN));
    }
}
