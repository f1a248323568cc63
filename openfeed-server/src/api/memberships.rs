//! Group membership lookup endpoint.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use openfeed_core::rpc::{Record, RpcError};
use serde::Deserialize;

use crate::state::AppState;

/// Rows returned per lookup; memberships change rarely and callers only
/// need the latest state.
const MEMBERSHIP_LIMIT: u32 = 5;

/// Query string parameters for the membership lookup.
#[derive(Debug, Deserialize)]
pub(super) struct MembershipQuery {
    group: Option<String>,
}

/// `GET /memberships/{member}` — newest group membership rows for one
/// address, optionally narrowed to a single group via `?group=0x…`.
pub(super) async fn get_memberships(
    state: State<AppState>,
    Path(member): Path<String>,
    Query(query): Query<MembershipQuery>,
) -> Result<Json<Vec<Record>>, MembershipError> {
    let records = state
        .rpc
        .fetch_group_memberships(&member, query.group.as_deref(), MEMBERSHIP_LIMIT)
        .await?;
    Ok(Json(records))
}

/// Error surfaced when the membership query fails.
#[derive(Debug)]
pub(super) struct MembershipError(RpcError);

impl From<RpcError> for MembershipError {
    fn from(error: RpcError) -> Self {
        Self(error)
    }
}

impl IntoResponse for MembershipError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = %self.0, "Membership lookup failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "membership lookup failed",
                "details": self.0.to_string(),
            })),
        )
            .into_response()
    }
}
