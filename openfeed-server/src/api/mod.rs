//! HTTP and WebSocket API handlers.
//!
//! # Endpoints
//!
//! - `GET  /api/transfers/ws`         – live transfer feed (WebSocket)
//! - `POST /api/manual-check`         – one ad hoc query, bypassing the watermark
//! - `GET  /api/memberships/{member}` – newest group memberships for an address

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

mod feed;
mod manual_check;
mod memberships;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transfers/ws", get(feed::transfer_feed_ws))
        .route("/manual-check", post(manual_check::manual_check))
        .route("/memberships/{member}", get(memberships::get_memberships))
}
