//! Notification channel factory and handles.

use super::types::TransferNotification;
use tokio::sync::broadcast;

/// Default buffer size for the notification channel.
///
/// Enough to absorb a full page of new rows in one cycle while keeping
/// memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for outgoing transfer notifications.
pub type TransferBroadcastSender = broadcast::Sender<TransferNotification>;
/// Receiver handle for outgoing transfer notifications.
pub type TransferBroadcastReceiver = broadcast::Receiver<TransferNotification>;

/// Create the transfer notification channel.
///
/// The sender fans out to every subscribed receiver. A receiver that falls
/// more than the buffer behind skips the overrun and keeps going; one that
/// is dropped simply stops counting as a subscriber.
pub fn transfer_broadcast_channel() -> (TransferBroadcastSender, TransferBroadcastReceiver) {
    broadcast::channel(DEFAULT_CHANNEL_BUFFER)
}
