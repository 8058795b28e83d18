use crate::error::{ErrorSeverity, ReachError};

/// Order in which the locator visits the cells of its search cube.
///
/// Any order yields the same nearest distance; the order only decides which
/// of several equidistant features wins.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ScanOrder {
    /// Chebyshev rings outward from the agent's cell; lexicographic
    /// `(dx, dy, dz)` inside each ring.
    #[default]
    CenterOut,
    /// Lexicographic `(x, y, z)` over the whole cube.
    Linear,
}

/// Tunable parameters shared by both halves of the relay.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachConfig {
    /// Maximum distance between the agent and a feature it may interact with.
    pub max_radius: f64,
    pub scan_order: ScanOrder,
    /// Play the interaction locally right after sending, without waiting for
    /// the authoritative side.
    pub optimistic_local_effect: bool,
}

impl ReachConfig {
    // ===== protocol constants =====
    /// Name of the message channel relay messages travel on.
    pub const CHANNEL_ID: &'static str = "interactdoorskeybind";

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_RADIUS: f64 = 4.0;
    /// Upper bound on the radius; scan cost grows with its cube.
    pub const MAX_RADIUS_LIMIT: f64 = 32.0;

    pub fn new() -> Self {
        Self {
            max_radius: Self::DEFAULT_MAX_RADIUS,
            scan_order: ScanOrder::default(),
            optimistic_local_effect: true,
        }
    }

    #[must_use]
    pub fn with_max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = max_radius;
        self
    }

    #[must_use]
    pub fn with_scan_order(mut self, scan_order: ScanOrder) -> Self {
        self.scan_order = scan_order;
        self
    }

    #[must_use]
    pub fn with_optimistic_local_effect(mut self, enabled: bool) -> Self {
        self.optimistic_local_effect = enabled;
        self
    }

    /// Checks that the radius is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRadius` for NaN, infinite or negative radii
    /// and `ConfigError::RadiusTooLarge` above [`Self::MAX_RADIUS_LIMIT`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_radius(self.max_radius)
    }
}

impl Default for ReachConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_radius(radius: f64) -> Result<(), ConfigError> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(ConfigError::InvalidRadius(radius));
    }
    if radius > ReachConfig::MAX_RADIUS_LIMIT {
        return Err(ConfigError::RadiusTooLarge(radius));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigError {
    #[error("search radius must be finite and non-negative, got {0}")]
    InvalidRadius(f64),

    #[error("search radius {0} exceeds the limit of {limit}", limit = ReachConfig::MAX_RADIUS_LIMIT)]
    RadiusTooLarge(f64),
}

impl ReachError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::InvalidRadius(_) => "CONFIG_INVALID_RADIUS",
            ConfigError::RadiusTooLarge(_) => "CONFIG_RADIUS_TOO_LARGE",
        }
    }
}
