//! Authority worker that owns the receiving end of the relay channel.
//!
//! Drains deliveries from a [`ServerInbox`], re-validates each one with
//! [`reach_core::Authority`] against the canonical grid and agent registry,
//! and publishes a [`RelayEvent`] per delivery. Nothing is ever sent back to
//! the client.

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use reach_core::{Authority, Env, ReachConfig, ReachError, Verdict};

use crate::effect::ToggleDoor;
use crate::events::{EventBus, RelayEvent};
use crate::oracle::{AgentRegistry, SharedGrid};
use crate::policy::DoorPolicy;
use crate::transport::{Delivery, ServerInbox};

/// Background task that validates and applies relayed interactions.
pub struct AuthorityWorker {
    inbox: ServerInbox,
    grid: SharedGrid,
    agents: Arc<AgentRegistry>,
    policy: DoorPolicy,
    effect: ToggleDoor,
    config: ReachConfig,
    events: EventBus,
    shutdown_rx: oneshot::Receiver<()>,
}

impl AuthorityWorker {
    pub fn new(
        inbox: ServerInbox,
        grid: SharedGrid,
        agents: Arc<AgentRegistry>,
        config: ReachConfig,
        events: EventBus,
        shutdown_rx: oneshot::Receiver<()>,
    ) -> Self {
        let effect = ToggleDoor::new(grid.clone());
        Self {
            inbox,
            grid,
            agents,
            policy: DoorPolicy,
            effect,
            config,
            events,
            shutdown_rx,
        }
    }

    /// Handle to the effect this worker applies, sharing its counter.
    pub fn effect(&self) -> ToggleDoor {
        self.effect.clone()
    }

    /// Main worker loop.
    ///
    /// Returns once shutdown is requested or every sender is gone.
    pub async fn run(mut self) {
        info!(channel = self.inbox.channel(), "authority worker started");
        loop {
            tokio::select! {
                biased;
                _ = &mut self.shutdown_rx => break,
                delivery = self.inbox.recv() => match delivery {
                    Some(delivery) => {
                        let event = self.handle_delivery(delivery);
                        self.events.publish(event);
                    }
                    None => break,
                },
            }
        }
        info!(channel = self.inbox.channel(), "authority worker stopped");
    }

    fn handle_delivery(&mut self, delivery: Delivery) -> RelayEvent {
        let Delivery { sender, envelope } = delivery;

        let message = match envelope.open() {
            Ok(message) => message,
            Err(err) => {
                warn!(%sender, error = %err, code = err.error_code(), "dropping malformed relay payload");
                return RelayEvent::Malformed {
                    sender,
                    reason: err.to_string(),
                };
            }
        };
        let position = message.position;

        let authority = Authority::new(
            Env::new(&self.grid, &self.policy),
            self.agents.as_ref(),
            &self.config,
        );
        match authority.validate_and_apply(sender, &message, &mut self.effect) {
            Ok(Verdict::Applied) => RelayEvent::Applied { sender, position },
            Ok(Verdict::Rejected(rejection)) => {
                debug!(%sender, %position, code = rejection.error_code(), "relay request rejected");
                RelayEvent::Rejected {
                    sender,
                    position,
                    rejection,
                }
            }
            Err(err) => {
                let severity = err.severity();
                if severity.is_recoverable() {
                    warn!(%sender, %position, error = %err, severity = severity.as_str(), "relay request failed");
                } else {
                    error!(%sender, %position, error = %err, severity = severity.as_str(), "relay request failed");
                }
                RelayEvent::Failed {
                    sender,
                    position,
                    error: err.to_string(),
                }
            }
        }
    }
}
