use glam::DVec3;

use super::GridPos;

/// Axis-aligned cuboid in cell-local coordinates (a unit cell spans `0..1`).
///
/// Features with irregular shapes expose one or more of these so that
/// distance is measured to the part of the cell the agent would actually
/// interact with rather than to the nominal cell center.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl SelectionBox {
    /// The whole unit cell.
    pub const FULL: Self = Self {
        min: DVec3::ZERO,
        max: DVec3::ONE,
    };

    pub const fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Center of this box placed in world space at `cell`.
    pub fn world_center(&self, cell: GridPos) -> DVec3 {
        cell.corner() + self.center()
    }
}

impl From<[f64; 6]> for SelectionBox {
    fn from(value: [f64; 6]) -> Self {
        let [min_x, min_y, min_z, max_x, max_y, max_z] = value;
        Self::new(
            DVec3::new(min_x, min_y, min_z),
            DVec3::new(max_x, max_y, max_z),
        )
    }
}
