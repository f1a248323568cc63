//! Application state shared across all request handlers.

use crate::config::file::MonitorSection;
use openfeed_core::events::TransferBroadcastSender;
use openfeed_core::rpc::CirclesRpcClient;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around. Configuration is load-once,
/// so it is stored by value rather than behind a lock.
#[derive(Clone)]
pub struct AppState {
    /// Client for on-demand `circles_query` calls (manual check, memberships).
    pub rpc: CirclesRpcClient,
    /// Monitor section of the loaded configuration.
    pub monitor: MonitorSection,
    /// Sender side of the transfer notification channel; each WebSocket
    /// connection subscribes its own receiver from this.
    pub transfer_tx: TransferBroadcastSender,
}

impl AppState {
    /// Create a new AppState.
    pub fn new(
        rpc: CirclesRpcClient,
        monitor: MonitorSection,
        transfer_tx: TransferBroadcastSender,
    ) -> Self {
        Self {
            rpc,
            monitor,
            transfer_tx,
        }
    }
}
