//! High-level runtime orchestrator.
//!
//! The runtime registers the relay channel, owns the authority worker and
//! hands out [`ClientSession`]s bound to the channel. Hosts build it through
//! [`RelayRuntimeBuilder`].

use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use reach_core::{AgentId, ReachConfig};

use crate::api::{Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::effect::ToggleDoor;
use crate::events::{EventBus, RelayEvent};
use crate::oracle::{AgentRegistry, SharedGrid};
use crate::session::ClientSession;
use crate::transport::ChannelHub;
use crate::workers::AuthorityWorker;

/// Authoritative side of the relay plus the channel clients connect to.
pub struct RelayRuntime {
    config: RuntimeConfig,
    hub: ChannelHub,
    events: EventBus,
    grid: SharedGrid,
    agents: Arc<AgentRegistry>,
    effect: ToggleDoor,

    shutdown_tx: oneshot::Sender<()>,
    worker_handle: JoinHandle<()>,
}

impl RelayRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RelayRuntimeBuilder {
        RelayRuntimeBuilder::new()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Canonical grid the authority validates against.
    pub fn grid(&self) -> &SharedGrid {
        &self.grid
    }

    pub fn agents(&self) -> &Arc<AgentRegistry> {
        &self.agents
    }

    /// Effect applied by the authority, sharing its counter.
    pub fn effect(&self) -> &ToggleDoor {
        &self.effect
    }

    /// Subscribe to authority outcomes
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.events.subscribe()
    }

    /// Opens a client session for `agent` looking at `view`.
    ///
    /// The session's endpoint stamps every message with `agent`; the
    /// authority never reads the sender from the payload.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Channel` if the relay channel is not registered.
    pub fn connect(&self, agent: AgentId, view: SharedGrid) -> Result<ClientSession> {
        let endpoint = self.hub.endpoint(ReachConfig::CHANNEL_ID, agent)?;
        info!(%agent, channel = ReachConfig::CHANNEL_ID, "client connected");
        Ok(ClientSession::new(
            self.config.reach.clone(),
            self.config.binding.clone(),
            view,
            endpoint,
        ))
    }

    /// Stops the authority worker and waits for it to exit.
    ///
    /// Deliveries still queued at this point are dropped.
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone if every sender dropped.
        let _ = self.shutdown_tx.send(());
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`RelayRuntime`].
pub struct RelayRuntimeBuilder {
    config: RuntimeConfig,
    grid: Option<SharedGrid>,
    agents: Option<Arc<AgentRegistry>>,
}

impl RelayRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            grid: None,
            agents: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Canonical grid; defaults to an empty world with nothing loaded.
    pub fn grid(mut self, grid: SharedGrid) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Agent registry; defaults to an empty one.
    pub fn agents(mut self, agents: Arc<AgentRegistry>) -> Self {
        self.agents = Some(agents);
        self
    }

    /// Build the runtime and spawn the authority worker.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::Config` or `RuntimeError::InvalidCapacity` if
    /// the configuration does not pass [`RuntimeConfig::validate`].
    pub fn build(self) -> Result<RelayRuntime> {
        self.config.validate()?;

        let grid = self.grid.unwrap_or_default();
        let agents = self.agents.unwrap_or_default();
        let events = EventBus::with_capacity(self.config.event_buffer_size);

        let mut hub = ChannelHub::new(self.config.channel_capacity);
        let inbox = hub.register(ReachConfig::CHANNEL_ID)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let worker = AuthorityWorker::new(
            inbox,
            grid.clone(),
            Arc::clone(&agents),
            self.config.reach.clone(),
            events.clone(),
            shutdown_rx,
        );
        let effect = worker.effect();

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(RelayRuntime {
            config: self.config,
            hub,
            events,
            grid,
            agents,
            effect,
            shutdown_tx,
            worker_handle,
        })
    }
}
