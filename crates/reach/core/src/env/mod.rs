//! Traits describing the collaborators the core depends on.
//!
//! Oracles expose read-only grid and agent data; the policy decides what
//! counts as a feature; the effect and the channel are the two ways the core
//! reaches out. The [`Env`] aggregate bundles the read side so the locator
//! and the authority take one parameter instead of a loose set of globals.
mod agents;
mod channel;
mod effect;
mod error;
mod grid;
mod policy;

pub use agents::AgentOracle;
pub use channel::RelayChannel;
pub use effect::InteractionEffect;
pub use error::{ChannelError, GridError};
pub use grid::GridOracle;
pub use policy::{FeaturePolicy, PolicyFn};

/// Aggregates the grid view and the feature policy for one side.
pub struct Env<'a, G, P>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
{
    grid: &'a G,
    policy: &'a P,
}

impl<'a, G, P> Env<'a, G, P>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
{
    pub fn new(grid: &'a G, policy: &'a P) -> Self {
        Self { grid, policy }
    }

    pub fn grid(&self) -> &'a G {
        self.grid
    }

    pub fn policy(&self) -> &'a P {
        self.policy
    }
}

impl<G, P> Clone for Env<'_, G, P>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<G, P> Copy for Env<'_, G, P>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
{
}
