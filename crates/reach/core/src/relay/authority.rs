use tracing::debug;

use crate::config::ReachConfig;
use crate::env::{AgentOracle, Env, FeaturePolicy, GridOracle, InteractionEffect};
use crate::state::{AgentId, InteractionTarget};

use super::{RelayError, RelayMessage, Rejection, Verdict};

/// Authoritative half: re-validates a relayed target against trusted state.
///
/// Only the target cell is taken from the message. The requester's position
/// comes from the [`AgentOracle`] and the feature is looked up again in the
/// authoritative grid, so a stale or forged request can at worst be dropped.
pub struct Authority<'a, G, P, A>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
    A: AgentOracle + ?Sized,
{
    env: Env<'a, G, P>,
    agents: &'a A,
    config: &'a ReachConfig,
}

impl<'a, G, P, A> Authority<'a, G, P, A>
where
    G: GridOracle + ?Sized,
    P: FeaturePolicy<G::Feature> + ?Sized,
    A: AgentOracle + ?Sized,
{
    pub fn new(env: Env<'a, G, P>, agents: &'a A, config: &'a ReachConfig) -> Self {
        Self {
            env,
            agents,
            config,
        }
    }

    /// Checks `message` from `sender` and returns the feature to act on.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Grid` if the target cell cannot be read.
    pub fn validate(
        &self,
        sender: AgentId,
        message: &RelayMessage,
    ) -> Result<Result<G::Feature, Rejection>, RelayError> {
        let Some(sender_position) = self.agents.position(sender) else {
            return Ok(Err(Rejection::UnknownSender));
        };

        let target = message.position;
        let distance = sender_position.distance(target.center());
        // Written so that a NaN distance is rejected as well.
        if !(distance <= self.config.max_radius) {
            return Ok(Err(Rejection::OutOfRange {
                distance,
                max_radius: self.config.max_radius,
            }));
        }

        let Some(feature) = self.env.grid().feature_at(target)? else {
            return Ok(Err(Rejection::NoFeature));
        };
        if !self.env.policy().qualifies(sender, &feature, target) {
            return Ok(Err(Rejection::NotQualifying));
        }

        Ok(Ok(feature))
    }

    /// Validates `message` and, when it holds up, performs the interaction.
    ///
    /// The effect is invoked at most once per call. Rejections are returned
    /// as [`Verdict::Rejected`] for the caller to log; nothing is sent back
    /// to the sender.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Grid` if the target cell cannot be read.
    pub fn validate_and_apply<E>(
        &self,
        sender: AgentId,
        message: &RelayMessage,
        effect: &mut E,
    ) -> Result<Verdict, RelayError>
    where
        E: InteractionEffect<G::Feature> + ?Sized,
    {
        match self.validate(sender, message)? {
            Ok(feature) => {
                effect.perform(sender, &feature, InteractionTarget::relayed(message.position));
                debug!(%sender, position = %message.position, "relayed interaction applied");
                Ok(Verdict::Applied)
            }
            Err(rejection) => {
                debug!(%sender, position = %message.position, %rejection, "relayed interaction dropped");
                Ok(Verdict::Rejected(rejection))
            }
        }
    }
}
