//! Bounded-radius nearest-feature search.
//!
//! The locator walks the cube of half-width `ceil(max_radius)` around the
//! agent's cell in a fixed [`ScanOrder`], asks the grid what occupies each
//! cell, filters through the [`FeaturePolicy`], and keeps the closest
//! qualifying feature.
//!
//! Distance is measured from the agent's continuous position to the nearest
//! selection box center of the feature, falling back to the cell center when
//! the feature exposes no boxes. Equidistant features resolve to the one met
//! first in scan order.
mod scan;

use glam::DVec3;
use tracing::{debug, trace};

use crate::config::{ConfigError, ScanOrder, validate_radius};
use crate::env::{Env, FeaturePolicy, GridError, GridOracle};
use crate::error::{ErrorSeverity, ReachError};
use crate::state::{AgentId, GridPos, SelectionBox};

pub use scan::offsets;

/// Origins farther than this from zero on any axis cannot be scanned
/// without overflowing cell coordinates.
const MAX_ORIGIN_COORD: f64 = (i32::MAX / 2) as f64;

/// Best qualifying feature found by one search.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate<F> {
    pub position: GridPos,
    pub feature: F,
    pub distance: f64,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LocateError {
    #[error(transparent)]
    GridUnavailable(#[from] GridError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("search origin {0} is not a usable position")]
    InvalidOrigin(DVec3),
}

impl ReachError for LocateError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            LocateError::GridUnavailable(err) => err.severity(),
            LocateError::Config(err) => err.severity(),
            LocateError::InvalidOrigin(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            LocateError::GridUnavailable(err) => err.error_code(),
            LocateError::Config(err) => err.error_code(),
            LocateError::InvalidOrigin(_) => "LOCATE_INVALID_ORIGIN",
        }
    }
}

/// Distance from `origin` to the feature occupying `cell`.
pub fn feature_distance(origin: DVec3, cell: GridPos, boxes: &[SelectionBox]) -> f64 {
    boxes
        .iter()
        .map(|selection| origin.distance(selection.world_center(cell)))
        .reduce(f64::min)
        .unwrap_or_else(|| origin.distance(cell.center()))
}

/// Nearest-feature search with a fixed scan order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProximityLocator {
    order: ScanOrder,
}

impl ProximityLocator {
    pub const fn new(order: ScanOrder) -> Self {
        Self { order }
    }

    pub const fn order(&self) -> ScanOrder {
        self.order
    }

    /// Finds the closest feature `agent` may interact with from `origin`.
    ///
    /// Returns `Ok(None)` when nothing within `max_radius` qualifies.
    ///
    /// # Errors
    ///
    /// - `LocateError::GridUnavailable` if any cell in the cube cannot be read
    /// - `LocateError::Config` if `max_radius` is not a usable radius
    /// - `LocateError::InvalidOrigin` if `origin` is not finite or out of range
    pub fn locate<G, P>(
        &self,
        env: &Env<'_, G, P>,
        agent: AgentId,
        origin: DVec3,
        max_radius: f64,
    ) -> Result<Option<Candidate<G::Feature>>, LocateError>
    where
        G: GridOracle + ?Sized,
        P: FeaturePolicy<G::Feature> + ?Sized,
    {
        validate_radius(max_radius)?;
        if !origin.is_finite() || origin.abs().max_element() > MAX_ORIGIN_COORD {
            return Err(LocateError::InvalidOrigin(origin));
        }

        let center = GridPos::containing(origin);
        let half = max_radius.ceil() as i32;
        trace!(%agent, %center, half, order = %self.order, "scanning for nearest feature");

        let mut best: Option<Candidate<G::Feature>> = None;
        for (dx, dy, dz) in offsets(half, self.order) {
            let cell = center.offset(dx, dy, dz);
            let Some(feature) = env.grid().feature_at(cell)? else {
                continue;
            };
            if !env.policy().qualifies(agent, &feature, cell) {
                trace!(%cell, "feature does not qualify");
                continue;
            }

            let boxes = env.grid().selection_boxes(&feature, cell)?;
            let distance = feature_distance(origin, cell, &boxes);
            if distance > max_radius {
                continue;
            }
            if best.as_ref().is_some_and(|current| distance >= current.distance) {
                continue;
            }

            trace!(%cell, distance, "new nearest feature");
            best = Some(Candidate {
                position: cell,
                feature,
                distance,
            });
        }

        match &best {
            Some(candidate) => {
                debug!(%agent, position = %candidate.position, distance = candidate.distance, "nearest feature located")
            }
            None => debug!(%agent, %center, max_radius, "no qualifying feature in range"),
        }
        Ok(best)
    }
}

/// Searches with the default center-outward order.
///
/// # Errors
///
/// See [`ProximityLocator::locate`].
pub fn locate<G, P>(
    env: &Env<'_, G, P>,
    agent: AgentId,
    origin: DVec3,
    max_radius: f64,
) -> Result<Option<Candidate<G::Feature>>, LocateError>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
{
    ProximityLocator::default().locate(env, agent, origin, max_radius)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::env::PolicyFn;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) struct TestFeature {
        pub door: bool,
        pub openable: bool,
        pub boxes: Vec<SelectionBox>,
    }

    impl TestFeature {
        pub(crate) fn door() -> Self {
            Self {
                door: true,
                openable: true,
                boxes: Vec::new(),
            }
        }

        pub(crate) fn stuck_door() -> Self {
            Self {
                openable: false,
                ..Self::door()
            }
        }

        pub(crate) fn wall() -> Self {
            Self {
                door: false,
                ..Self::door()
            }
        }
    }

    #[derive(Default)]
    pub(crate) struct TestGrid {
        pub cells: HashMap<GridPos, TestFeature>,
        pub unloaded: Option<GridPos>,
    }

    impl TestGrid {
        pub(crate) fn with(mut self, position: GridPos, feature: TestFeature) -> Self {
            self.cells.insert(position, feature);
            self
        }
    }

    impl GridOracle for TestGrid {
        type Feature = TestFeature;

        fn feature_at(&self, position: GridPos) -> Result<Option<TestFeature>, GridError> {
            if self.unloaded == Some(position) {
                return Err(GridError::Unloaded(position));
            }
            Ok(self.cells.get(&position).cloned())
        }

        fn selection_boxes(
            &self,
            feature: &TestFeature,
            _position: GridPos,
        ) -> Result<Vec<SelectionBox>, GridError> {
            Ok(feature.boxes.clone())
        }
    }

    pub(crate) type TestPolicy =
        PolicyFn<fn(&TestFeature) -> bool, fn(AgentId, &TestFeature, GridPos) -> bool>;

    fn is_door(feature: &TestFeature) -> bool {
        feature.door
    }

    fn is_openable(_: AgentId, feature: &TestFeature, _: GridPos) -> bool {
        feature.openable
    }

    pub(crate) fn door_policy() -> TestPolicy {
        PolicyFn::new(
            is_door as fn(&TestFeature) -> bool,
            is_openable as fn(AgentId, &TestFeature, GridPos) -> bool,
        )
    }

    const AGENT: AgentId = AgentId(7);

    /// Continuous position at the center of cell `(0, 0, 0)`.
    fn origin() -> DVec3 {
        GridPos::ORIGIN.center()
    }

    #[test]
    fn empty_grid_finds_nothing() {
        let grid = TestGrid::default();
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        assert_eq!(locate(&env, AGENT, origin(), 4.0).unwrap(), None);
    }

    #[test]
    fn finds_door_at_exact_radius() {
        let grid = TestGrid::default().with(GridPos::new(3, 0, 0), TestFeature::door());
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        let candidate = locate(&env, AGENT, origin(), 4.0).unwrap().unwrap();
        assert_eq!(candidate.position, GridPos::new(3, 0, 0));
        assert_eq!(candidate.distance, 3.0);
        assert!(locate(&env, AGENT, origin(), 2.5).unwrap().is_none());
        assert!(locate(&env, AGENT, origin(), 3.0).unwrap().is_some());
    }

    #[test]
    fn picks_the_nearest_of_several() {
        let grid = TestGrid::default()
            .with(GridPos::new(-3, 0, 0), TestFeature::door())
            .with(GridPos::new(0, 2, 0), TestFeature::door())
            .with(GridPos::new(1, 1, 1), TestFeature::door());
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        let candidate = locate(&env, AGENT, origin(), 4.0).unwrap().unwrap();
        assert_eq!(candidate.position, GridPos::new(1, 1, 1));
        assert!((candidate.distance - 3f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn never_returns_a_candidate_beyond_the_radius() {
        // Corner cells of the cube lie inside ceil(r) on every axis but
        // outside the sphere of radius r.
        let grid = TestGrid::default()
            .with(GridPos::new(2, 2, 2), TestFeature::door())
            .with(GridPos::new(-2, 2, -2), TestFeature::door());
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        for radius in [0.0, 0.5, 1.0, 2.0, 3.0, 3.4, 3.5, 4.0] {
            let origins = [origin(), DVec3::new(0.9, 0.1, 0.4), DVec3::new(1.7, 1.2, 1.1)];
            for from in origins {
                if let Some(candidate) = locate(&env, AGENT, from, radius).unwrap() {
                    assert!(candidate.distance <= radius);
                    let actual = from.distance(candidate.position.center());
                    assert!((actual - candidate.distance).abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn equidistant_features_resolve_to_first_in_scan_order() {
        let left = GridPos::new(-2, 0, 0);
        let right = GridPos::new(2, 0, 0);
        let grid = TestGrid::default()
            .with(left, TestFeature::door())
            .with(right, TestFeature::door());
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        for order in [ScanOrder::CenterOut, ScanOrder::Linear] {
            let locator = ProximityLocator::new(order);
            let candidate = locator.locate(&env, AGENT, origin(), 4.0).unwrap().unwrap();
            assert_eq!(candidate.position, left, "{order}");
            assert_eq!(candidate.distance, 2.0);
        }
    }

    #[test]
    fn skips_nearer_feature_that_is_not_openable() {
        let grid = TestGrid::default()
            .with(GridPos::new(1, 0, 0), TestFeature::stuck_door())
            .with(GridPos::new(0, 0, 1), TestFeature::wall())
            .with(GridPos::new(0, 0, -3), TestFeature::door());
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        let candidate = locate(&env, AGENT, origin(), 4.0).unwrap().unwrap();
        assert_eq!(candidate.position, GridPos::new(0, 0, -3));
        assert!(candidate.feature.openable);
    }

    #[test]
    fn selection_boxes_override_cell_center() {
        // A thin slab hugging the far edge of a nearer cell ends up farther
        // away than a plain door in a cell that is nominally more distant.
        let far_edge = SelectionBox::from([0.0, 0.0, 0.9, 1.0, 1.0, 1.0]);
        let slab = TestFeature {
            boxes: vec![far_edge],
            ..TestFeature::door()
        };
        let grid = TestGrid::default()
            .with(GridPos::new(0, 0, 2), slab)
            .with(GridPos::new(2, 0, 1), TestFeature::door());
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        let candidate = locate(&env, AGENT, origin(), 4.0).unwrap().unwrap();
        assert_eq!(candidate.position, GridPos::new(2, 0, 1));
    }

    #[test]
    fn uses_the_closest_of_several_boxes() {
        let boxes = vec![
            SelectionBox::from([0.0, 0.0, 0.0, 1.0, 0.2, 1.0]),
            SelectionBox::from([0.0, 0.8, 0.0, 1.0, 1.0, 1.0]),
        ];
        let cell = GridPos::new(0, 3, 0);
        let from = origin();

        let distance = feature_distance(from, cell, &boxes);
        assert!((distance - 2.6).abs() < 1e-12);
        assert_eq!(feature_distance(from, cell, &[]), 3.0);
    }

    #[test]
    fn unloaded_cell_is_an_error_not_an_absence() {
        let grid = TestGrid {
            unloaded: Some(GridPos::new(0, -1, 0)),
            ..TestGrid::default()
        };
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        let err = locate(&env, AGENT, origin(), 4.0).unwrap_err();
        assert_eq!(
            err,
            LocateError::GridUnavailable(GridError::Unloaded(GridPos::new(0, -1, 0)))
        );
        assert_eq!(err.severity(), ErrorSeverity::Recoverable);
        assert!(err.severity().is_recoverable());
    }

    #[test]
    fn rejects_unusable_radius_and_origin() {
        let grid = TestGrid::default();
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        assert!(matches!(
            locate(&env, AGENT, origin(), -1.0),
            Err(LocateError::Config(ConfigError::InvalidRadius(_)))
        ));
        assert!(matches!(
            locate(&env, AGENT, DVec3::new(f64::NAN, 0.0, 0.0), 4.0),
            Err(LocateError::InvalidOrigin(_))
        ));
    }

    #[test]
    fn radius_zero_only_sees_own_cell_center() {
        let grid = TestGrid::default()
            .with(GridPos::ORIGIN, TestFeature::door())
            .with(GridPos::new(1, 0, 0), TestFeature::door());
        let policy = door_policy();
        let env = Env::new(&grid, &policy);

        let candidate = locate(&env, AGENT, origin(), 0.0).unwrap().unwrap();
        assert_eq!(candidate.position, GridPos::ORIGIN);
        assert!(locate(&env, AGENT, DVec3::new(0.1, 0.5, 0.5), 0.0).unwrap().is_none());
    }
}
