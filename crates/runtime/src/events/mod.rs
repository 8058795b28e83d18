//! Observable outcomes of relayed requests.
//!
//! Rejections are never answered over the channel, so the bus is the only
//! place a host or a test can see why a request was dropped.
mod bus;
mod types;

pub use bus::EventBus;
pub use types::RelayEvent;
