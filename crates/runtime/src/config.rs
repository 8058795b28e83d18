//! Runtime configuration structures and loaders.
use std::env;

use reach_core::{ReachConfig, ScanOrder};

use crate::api::{Result, RuntimeError};

/// Input binding the host registers for the "interact with nearest" trigger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerBinding {
    pub code: String,
    pub description: String,
    /// Key the binding starts out on; `None` leaves it for the player to assign.
    pub default_key: Option<String>,
}

impl TriggerBinding {
    pub const DEFAULT_CODE: &'static str = "interactdoors_interact";
    pub const DEFAULT_DESCRIPTION: &'static str = "Interact with nearest door";
}

impl Default for TriggerBinding {
    fn default() -> Self {
        Self {
            code: Self::DEFAULT_CODE.to_owned(),
            description: Self::DEFAULT_DESCRIPTION.to_owned(),
            default_key: None,
        }
    }
}

/// Runtime configuration shared by the client sessions and the authority worker.
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    pub reach: ReachConfig,
    /// Messages buffered per channel before sends start failing with `Full`.
    pub channel_capacity: usize,
    pub event_buffer_size: usize,
    pub binding: TriggerBinding,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            reach: ReachConfig::default(),
            channel_capacity: 32,
            event_buffer_size: 100,
            binding: TriggerBinding::default(),
        }
    }
}

impl RuntimeConfig {
    /// Largest relay queue a runtime will allocate.
    pub const MAX_CHANNEL_CAPACITY: usize = 1 << 16;
    /// Largest event backlog a runtime will allocate.
    pub const MAX_EVENT_BUFFER: usize = 1 << 16;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `REACH_MAX_RADIUS` - Maximum interaction distance (default: 4.0)
    /// - `REACH_SCAN_ORDER` - `center_out` or `linear` (default: center_out)
    /// - `REACH_OPTIMISTIC_EFFECT` - Play the local effect before confirmation (default: true)
    /// - `REACH_CHANNEL_CAPACITY` - Relay channel queue size, 1 to 65536 (default: 32)
    /// - `REACH_EVENT_BUFFER` - Event bus capacity, 1 to 65536 (default: 100)
    /// - `REACH_TRIGGER_KEY` - Default key for the trigger binding (default: unbound)
    ///
    /// Unparseable or out-of-range sizes are ignored and the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(radius) = read_var::<f64, _>(&lookup, "REACH_MAX_RADIUS") {
            config.reach.max_radius = radius;
        }

        if let Some(order) = read_var::<ScanOrder, _>(&lookup, "REACH_SCAN_ORDER") {
            config.reach.scan_order = order;
        }

        if let Some(enable) = read_var::<bool, _>(&lookup, "REACH_OPTIMISTIC_EFFECT") {
            config.reach.optimistic_local_effect = enable;
        }

        if let Some(capacity) = read_var::<usize, _>(&lookup, "REACH_CHANNEL_CAPACITY")
            .filter(|c| (1..=Self::MAX_CHANNEL_CAPACITY).contains(c))
        {
            config.channel_capacity = capacity;
        }

        if let Some(capacity) = read_var::<usize, _>(&lookup, "REACH_EVENT_BUFFER")
            .filter(|c| (1..=Self::MAX_EVENT_BUFFER).contains(c))
        {
            config.event_buffer_size = capacity;
        }

        config.binding.default_key = lookup("REACH_TRIGGER_KEY");

        config
    }

    /// Checks every field the runtime allocates or searches with.
    ///
    /// # Errors
    ///
    /// - `RuntimeError::Config` if the reach radius is unusable
    /// - `RuntimeError::InvalidCapacity` if a queue size is zero or above its limit
    pub fn validate(&self) -> Result<()> {
        self.reach.validate()?;
        check_capacity("channel_capacity", self.channel_capacity, Self::MAX_CHANNEL_CAPACITY)?;
        check_capacity("event_buffer_size", self.event_buffer_size, Self::MAX_EVENT_BUFFER)?;
        Ok(())
    }
}

fn check_capacity(field: &'static str, value: usize, max: usize) -> Result<()> {
    if value == 0 || value > max {
        return Err(RuntimeError::InvalidCapacity { field, value, max });
    }
    Ok(())
}

fn read_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)?.trim().parse().ok()
}
