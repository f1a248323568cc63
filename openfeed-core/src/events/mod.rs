//! Notifications pushed from the transfer monitor to connected subscribers.
//!
//! The monitor is the only producer. Every WebSocket connection holds its
//! own broadcast receiver, so a slow client can lag and recover without
//! affecting anyone else.

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, TransferBroadcastReceiver, TransferBroadcastSender,
    transfer_broadcast_channel,
};
pub use types::TransferNotification;
