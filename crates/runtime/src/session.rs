//! Client-side half of the relay: one session per connected agent.
use glam::DVec3;
use tracing::{debug, warn};

use reach_core::{AgentId, Env, Initiator, ReachConfig, TriggerOutcome};

use crate::api::Result;
use crate::config::TriggerBinding;
use crate::effect::ToggleDoor;
use crate::oracle::{Block, SharedGrid};
use crate::policy::DoorPolicy;
use crate::transport::ClientEndpoint;

/// State a client needs to answer its trigger hotkey.
///
/// `view` is the client's own copy of the world; it may lag behind the
/// authoritative grid, which is why the authority re-validates every request.
pub struct ClientSession {
    agent: AgentId,
    config: ReachConfig,
    binding: TriggerBinding,
    view: SharedGrid,
    policy: DoorPolicy,
    local_effect: ToggleDoor,
    endpoint: ClientEndpoint,
}

impl ClientSession {
    pub(crate) fn new(
        config: ReachConfig,
        binding: TriggerBinding,
        view: SharedGrid,
        endpoint: ClientEndpoint,
    ) -> Self {
        let local_effect = ToggleDoor::new(view.clone());
        Self {
            agent: endpoint.agent(),
            config,
            binding,
            view,
            policy: DoorPolicy,
            local_effect,
            endpoint,
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn binding(&self) -> &TriggerBinding {
        &self.binding
    }

    pub fn view(&self) -> &SharedGrid {
        &self.view
    }

    /// Effect played on the local view, sharing its counter.
    pub fn local_effect(&self) -> &ToggleDoor {
        &self.local_effect
    }

    /// Raw endpoint, for hosts that forward pre-encoded payloads.
    pub fn endpoint(&self) -> &ClientEndpoint {
        &self.endpoint
    }

    /// Resolves the nearest qualifying door around `origin` and relays it.
    ///
    /// `TriggerOutcome::NotConsumed` means nothing in range qualified and no
    /// message was sent.
    ///
    /// # Errors
    ///
    /// Propagates locator and channel failures as `RuntimeError::Relay`.
    pub fn trigger(&mut self, origin: DVec3) -> Result<TriggerOutcome<Block>> {
        let initiator = Initiator::new(Env::new(&self.view, &self.policy), &self.config);
        let outcome =
            initiator.on_trigger(self.agent, origin, &mut self.endpoint, &mut self.local_effect)?;
        Ok(outcome)
    }

    /// Hotkey callback: consumes the key press only when a door was relayed.
    ///
    /// Failures are logged and reported as not consumed so the host can let
    /// the key fall through to its own handlers.
    pub fn on_hotkey(&mut self, origin: DVec3) -> bool {
        match self.trigger(origin) {
            Ok(outcome) => {
                debug!(agent = %self.agent, hotkey = %self.binding.code, consumed = outcome.consumed(), "hotkey handled");
                outcome.consumed()
            }
            Err(err) => {
                warn!(agent = %self.agent, hotkey = %self.binding.code, error = %err, severity = err.severity().as_str(), "hotkey failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reach_core::{ChannelError, GridPos, RelayError};

    use super::*;
    use crate::api::RuntimeError;
    use crate::oracle::{BlockGrid, Door};
    use crate::transport::{ChannelHub, ServerInbox};

    fn session_with(view: BlockGrid, config: ReachConfig) -> (ClientSession, ServerInbox) {
        let mut hub = ChannelHub::new(4);
        let inbox = hub.register("doors").unwrap();
        let endpoint = hub.endpoint("doors", AgentId(3)).unwrap();
        let session = ClientSession::new(
            config,
            TriggerBinding::default(),
            SharedGrid::new(view),
            endpoint,
        );
        (session, inbox)
    }

    #[test]
    fn hotkey_relays_nearest_door_and_plays_local_effect() {
        let door = GridPos::new(2, 0, 0);
        let mut view = BlockGrid::new().with(door, Block::Door(Door::sliding(true)));
        view.load_around(GridPos::ORIGIN, 1);
        let (mut session, mut inbox) = session_with(view, ReachConfig::default());

        assert!(session.on_hotkey(DVec3::new(0.5, 0.5, 0.5)));

        let delivery = inbox.try_recv().unwrap();
        assert_eq!(delivery.sender, AgentId(3));
        assert_eq!(delivery.envelope.open().unwrap().position, door);
        assert_eq!(session.local_effect().applied(), 1);
        assert_eq!(session.view().block(door).unwrap().as_door().map(|d| d.open), Some(true));
    }

    #[test]
    fn nothing_in_range_falls_through() {
        let mut view = BlockGrid::new();
        view.load_around(GridPos::ORIGIN, 1);
        let (mut session, mut inbox) = session_with(view, ReachConfig::default());

        assert!(!session.on_hotkey(DVec3::ZERO));
        assert!(inbox.try_recv().is_none());
        assert_eq!(session.local_effect().applied(), 0);
    }

    #[test]
    fn local_effect_can_be_disabled() {
        let door = GridPos::new(0, 0, 1);
        let mut view = BlockGrid::new().with(door, Block::Door(Door::sliding(true)));
        view.load_around(GridPos::ORIGIN, 1);
        let config = ReachConfig::default().with_optimistic_local_effect(false);
        let (mut session, mut inbox) = session_with(view, config);

        assert!(session.on_hotkey(DVec3::splat(0.5)));
        assert!(inbox.try_recv().is_some());
        assert_eq!(session.local_effect().applied(), 0);
    }

    #[test]
    fn closed_channel_surfaces_as_error_without_local_effect() {
        let door = GridPos::new(1, 0, 0);
        let mut view = BlockGrid::new().with(door, Block::Door(Door::sliding(true)));
        view.load_around(GridPos::ORIGIN, 1);
        let (mut session, inbox) = session_with(view, ReachConfig::default());
        drop(inbox);

        let err = session.trigger(DVec3::splat(0.5)).unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::Relay(RelayError::Channel(ChannelError::Closed(_)))
        ));
        assert_eq!(session.local_effect().applied(), 0);
        assert!(!session.on_hotkey(DVec3::splat(0.5)));
    }
}
