use glam::DVec3;
use tracing::debug;

use crate::config::ReachConfig;
use crate::env::{Env, FeaturePolicy, GridOracle, InteractionEffect, RelayChannel};
use crate::locator::ProximityLocator;
use crate::state::{AgentId, InteractionTarget};

use super::{RelayError, RelayMessage, TriggerOutcome};

/// Initiating half: turns a trigger into a relayed target.
pub struct Initiator<'a, G, P>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
{
    env: Env<'a, G, P>,
    config: &'a ReachConfig,
    locator: ProximityLocator,
}

impl<'a, G, P> Initiator<'a, G, P>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
{
    pub fn new(env: Env<'a, G, P>, config: &'a ReachConfig) -> Self {
        Self {
            env,
            config,
            locator: ProximityLocator::new(config.scan_order),
        }
    }

    /// Handles one trigger from `agent` standing at `origin`.
    ///
    /// On a hit the target is sent over `channel` first; the local effect
    /// only plays once the send went through, and only when the config asks
    /// for optimistic feedback. The authoritative side may still reject the
    /// request afterwards, in which case the local effect is not undone.
    ///
    /// # Errors
    ///
    /// - `RelayError::Locate` if the search itself failed
    /// - `RelayError::Channel` if the message could not be sent
    pub fn on_trigger<C, E>(
        &self,
        agent: AgentId,
        origin: DVec3,
        channel: &mut C,
        local_effect: &mut E,
    ) -> Result<TriggerOutcome<G::Feature>, RelayError>
    where
        C: RelayChannel + ?Sized,
        E: InteractionEffect<G::Feature> + ?Sized,
    {
        let Some(candidate) =
            self.locator
                .locate(&self.env, agent, origin, self.config.max_radius)?
        else {
            return Ok(TriggerOutcome::NotConsumed);
        };

        channel.send(&RelayMessage::new(candidate.position))?;
        debug!(%agent, position = %candidate.position, "relayed interaction target");

        if self.config.optimistic_local_effect {
            local_effect.perform(
                agent,
                &candidate.feature,
                InteractionTarget::relayed(candidate.position),
            );
        }

        Ok(TriggerOutcome::Consumed(candidate))
    }
}
