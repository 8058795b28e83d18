use crate::relay::RelayMessage;

use super::ChannelError;

/// Outbound half of the relay channel on the initiating side.
///
/// Delivery is at-most-once with no acknowledgement. The sender identity is
/// attached by the implementation, never by the caller.
pub trait RelayChannel {
    fn send(&mut self, message: &RelayMessage) -> Result<(), ChannelError>;
}
