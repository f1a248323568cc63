//! TOML file configuration structures.
//!
//! These structs directly map to the `openfeed-config.toml` file format.
//! Every field has a default, so an empty file is a valid configuration.

use openfeed_core::processors::MonitorConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: ServerConfig,
    pub monitor: MonitorSection,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:3000").
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    "0.0.0.0:3000".parse().expect("valid default address")
}

/// Transfer monitor configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
    /// JSON-RPC endpoint serving `circles_query`.
    pub rpc_url: Url,
    /// Milliseconds between poll cycles.
    pub poll_interval_ms: u64,
    /// Rows requested per poll cycle.
    pub page_size: u32,
    /// Query namespace of the transfer table.
    pub namespace: String,
    /// Transfer table inside the namespace.
    pub table: String,
    /// Rows returned by the manual check endpoint.
    pub manual_check_limit: u32,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            poll_interval_ms: 5000,
            page_size: 200,
            namespace: "CrcV2_OIC".to_string(),
            table: "OpenMiddlewareTransfer".to_string(),
            manual_check_limit: 5,
        }
    }
}

fn default_rpc_url() -> Url {
    "https://rpc.circlesubi.network/"
        .parse()
        .expect("valid default RPC URL")
}

impl MonitorSection {
    /// Settings for the core transfer monitor.
    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            namespace: self.namespace.clone(),
            table: self.table.clone(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            page_size: self.page_size,
        }
    }

    /// Feed label carried on every outgoing notification.
    pub fn table_label(&self) -> String {
        format!("{}_{}", self.namespace, self.table)
    }
}
