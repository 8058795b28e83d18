//! Wire format for relay messages.
//!
//! A message travels inside an [`Envelope`] naming its channel. The payload is
//! the bincode encoding of [`RelayMessage`] with fixed-width integers; trailing
//! bytes and oversized payloads are rejected on decode.
use bincode::Options;
use serde::{Deserialize, Serialize};

use reach_core::{ChannelError, RelayMessage};

/// Payloads larger than this are never a valid relay message.
const MAX_PAYLOAD_BYTES: u64 = 64;

/// Raw message as it crosses the channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub channel: String,
    pub payload: Vec<u8>,
}

impl Envelope {
    pub fn new(channel: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            channel: channel.into(),
            payload,
        }
    }

    /// Wraps an encoded `message` for `channel`.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Encode` if the message cannot be serialized.
    pub fn seal(channel: impl Into<String>, message: &RelayMessage) -> Result<Self, ChannelError> {
        Ok(Self::new(channel, encode(message)?))
    }

    /// Decodes the payload.
    ///
    /// # Errors
    ///
    /// Returns `ChannelError::Decode` for malformed payloads.
    pub fn open(&self) -> Result<RelayMessage, ChannelError> {
        decode(&self.payload)
    }
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_PAYLOAD_BYTES)
        .reject_trailing_bytes()
}

pub fn encode(message: &RelayMessage) -> Result<Vec<u8>, ChannelError> {
    options()
        .serialize(message)
        .map_err(|e| ChannelError::Encode(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<RelayMessage, ChannelError> {
    options()
        .deserialize(bytes)
        .map_err(|e| ChannelError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use reach_core::GridPos;

    use super::*;

    #[test]
    fn message_is_three_little_endian_i32s() {
        let bytes = encode(&RelayMessage::new(GridPos::new(1, -2, 3))).unwrap();
        assert_eq!(
            bytes,
            vec![1, 0, 0, 0, 0xfe, 0xff, 0xff, 0xff, 3, 0, 0, 0]
        );
        assert_eq!(decode(&bytes).unwrap().position, GridPos::new(1, -2, 3));
    }

    #[test]
    fn rejects_truncated_and_padded_payloads() {
        let bytes = encode(&RelayMessage::new(GridPos::new(4, 5, 6))).unwrap();

        assert!(matches!(decode(&bytes[..7]), Err(ChannelError::Decode(_))));

        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(decode(&padded), Err(ChannelError::Decode(_))));
    }

    #[test]
    fn envelope_opens_what_it_sealed() {
        let message = RelayMessage::new(GridPos::new(-7, 0, 12));
        let envelope = Envelope::seal("doors", &message).unwrap();
        assert_eq!(envelope.channel, "doors");
        assert_eq!(envelope.open().unwrap(), message);
    }
}
