//! Client and wire types for the Circles `circles_query` JSON-RPC interface.
//!
//! The node exposes indexed tables through a single query method. Requests
//! name a namespace, a table, the columns wanted, a sort order, and a filter
//! list; results come back column-major as a `columns` array plus row arrays.

pub mod client;
pub mod query;
pub mod rows;

pub use client::{CirclesRpcClient, RpcError};
pub use query::{FilterPredicate, OrderBy, QueryParams, SortOrder};
pub use rows::{Record, RowSet, TransferEvent, decode_data_field};
