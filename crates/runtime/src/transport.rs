//! In-process message channels between clients and the authority.
//!
//! The hub mirrors a game engine's named network channels: a channel id is
//! registered once on the authoritative side, and every client obtains an
//! endpoint bound to its own agent identity. Delivery is at-most-once over a
//! bounded queue; a full queue drops the message and reports `Full` to the
//! sender rather than blocking the trigger thread.
use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::trace;

use reach_core::{AgentId, ChannelError, RelayChannel, RelayMessage};

use crate::api::{Result, RuntimeError};
use crate::codec::Envelope;
use crate::config::RuntimeConfig;

/// One message as received by the authority, with the sender stamped by the
/// endpoint it came through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub sender: AgentId,
    pub envelope: Envelope,
}

/// Registry of named channels.
pub struct ChannelHub {
    capacity: usize,
    channels: HashMap<String, mpsc::Sender<Delivery>>,
}

impl ChannelHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.clamp(1, RuntimeConfig::MAX_CHANNEL_CAPACITY),
            channels: HashMap::new(),
        }
    }

    /// Registers `channel_id` and returns the authority's receiving end.
    ///
    /// # Errors
    ///
    /// Returns `RuntimeError::ChannelAlreadyRegistered` on a second registration.
    pub fn register(&mut self, channel_id: &str) -> Result<ServerInbox> {
        if self.channels.contains_key(channel_id) {
            return Err(RuntimeError::ChannelAlreadyRegistered(channel_id.to_owned()));
        }
        let (tx, rx) = mpsc::channel(self.capacity);
        self.channels.insert(channel_id.to_owned(), tx);
        Ok(ServerInbox {
            channel: channel_id.to_owned(),
            rx,
        })
    }

    /// Opens an endpoint on `channel_id` that sends as `agent`.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::UnknownChannel` if the channel was never registered.
    pub fn endpoint(
        &self,
        channel_id: &str,
        agent: AgentId,
    ) -> std::result::Result<ClientEndpoint, ChannelError> {
        let tx = self
            .channels
            .get(channel_id)
            .ok_or_else(|| ChannelError::UnknownChannel(channel_id.to_owned()))?;
        Ok(ClientEndpoint {
            channel: channel_id.to_owned(),
            agent,
            tx: tx.clone(),
        })
    }
}

/// Sending end held by one client.
#[derive(Clone, Debug)]
pub struct ClientEndpoint {
    channel: String,
    agent: AgentId,
    tx: mpsc::Sender<Delivery>,
}

impl ClientEndpoint {
    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Sends an already encoded payload.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Full` or `ChannelError::Closed` when the
    /// message could not be queued.
    pub fn send_payload(&self, payload: Vec<u8>) -> std::result::Result<(), ChannelError> {
        let delivery = Delivery {
            sender: self.agent,
            envelope: Envelope::new(self.channel.clone(), payload),
        };
        self.tx.try_send(delivery).map_err(|err| match err {
            TrySendError::Full(_) => ChannelError::Full(self.channel.clone()),
            TrySendError::Closed(_) => ChannelError::Closed(self.channel.clone()),
        })?;
        trace!(agent = %self.agent, channel = %self.channel, "payload queued");
        Ok(())
    }
}

impl RelayChannel for ClientEndpoint {
    fn send(&mut self, message: &RelayMessage) -> std::result::Result<(), ChannelError> {
        let envelope = Envelope::seal(self.channel.clone(), message)?;
        self.send_payload(envelope.payload)
    }
}

/// Receiving end owned by the authority.
#[derive(Debug)]
pub struct ServerInbox {
    channel: String,
    rx: mpsc::Receiver<Delivery>,
}

impl ServerInbox {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Waits for the next delivery; `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Delivery> {
        self.rx.recv().await
    }

    /// Returns a queued delivery without waiting.
    pub fn try_recv(&mut self) -> Option<Delivery> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use reach_core::GridPos;

    use super::*;

    #[test]
    fn endpoint_stamps_its_own_agent() {
        let mut hub = ChannelHub::new(4);
        let mut inbox = hub.register("doors").unwrap();
        let mut endpoint = hub.endpoint("doors", AgentId(9)).unwrap();

        endpoint
            .send(&RelayMessage::new(GridPos::new(1, 2, 3)))
            .unwrap();

        let delivery = inbox.try_recv().unwrap();
        assert_eq!(delivery.sender, AgentId(9));
        assert_eq!(delivery.envelope.channel, "doors");
        assert_eq!(
            delivery.envelope.open().unwrap(),
            RelayMessage::new(GridPos::new(1, 2, 3))
        );
    }

    #[test]
    fn unknown_and_duplicate_channels_are_errors() {
        let mut hub = ChannelHub::new(4);
        assert_eq!(
            hub.endpoint("doors", AgentId(1)).unwrap_err(),
            ChannelError::UnknownChannel("doors".into())
        );

        let _inbox = hub.register("doors").unwrap();
        assert!(matches!(
            hub.register("doors"),
            Err(RuntimeError::ChannelAlreadyRegistered(id)) if id == "doors"
        ));
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let mut hub = ChannelHub::new(1);
        let _inbox = hub.register("doors").unwrap();
        let mut endpoint = hub.endpoint("doors", AgentId(1)).unwrap();
        let message = RelayMessage::new(GridPos::ORIGIN);

        endpoint.send(&message).unwrap();
        assert_eq!(
            endpoint.send(&message).unwrap_err(),
            ChannelError::Full("doors".into())
        );
    }

    #[test]
    fn dropped_inbox_closes_the_channel() {
        let mut hub = ChannelHub::new(4);
        let inbox = hub.register("doors").unwrap();
        let mut endpoint = hub.endpoint("doors", AgentId(1)).unwrap();
        drop(inbox);

        assert_eq!(
            endpoint.send(&RelayMessage::new(GridPos::ORIGIN)).unwrap_err(),
            ChannelError::Closed("doors".into())
        );
    }
}
