use crate::state::{GridPos, SelectionBox};

use super::GridError;

/// Read access to whatever occupies the cells of the world grid.
///
/// The feature handle is owned by the implementation; the locator and the
/// authority only look at it and hand it back to the policy and the effect.
pub trait GridOracle: Send + Sync {
    type Feature: Clone + core::fmt::Debug;

    /// Returns the feature occupying `position`, or `None` for an empty cell.
    fn feature_at(&self, position: GridPos) -> Result<Option<Self::Feature>, GridError>;

    /// Selection volumes of `feature` at `position`, in cell-local coordinates.
    ///
    /// An empty list means "measure to the cell center".
    fn selection_boxes(
        &self,
        feature: &Self::Feature,
        position: GridPos,
    ) -> Result<Vec<SelectionBox>, GridError> {
        let _ = (feature, position);
        Ok(Vec::new())
    }
}
