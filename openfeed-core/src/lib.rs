#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod events;
pub mod ordering;
pub mod processors;
pub mod rpc;
pub mod utils;
