//! Long-running tasks that drive the ingestion pipeline.
//!
//! There is exactly one processor: the `TransferMonitor`, which polls the
//! query endpoint, drops rows it has already consumed, and broadcasts the
//! rest to connected subscribers.

pub mod transfer_monitor;

pub use transfer_monitor::{MonitorConfig, TransferMonitor, TransferSource};
