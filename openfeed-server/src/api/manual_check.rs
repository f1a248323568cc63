//! Manual RPC check endpoint.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use openfeed_core::rpc::rows::{TransferEvent, decode_data_field};
use openfeed_core::rpc::{QueryParams, RpcError, SortOrder};
use openfeed_core::utils::timestamp;
use serde::Serialize;

use crate::state::AppState;

/// One row of the manual check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckedTransaction {
    block_number: i64,
    timestamp: i64,
    timestamp_iso: Option<String>,
    transaction_hash: String,
    on_behalf: String,
    sender: String,
    recipient: String,
    amount: String,
    inflationary_amount: Option<String>,
    data: Option<String>,
    raw_data: Option<String>,
}

impl CheckedTransaction {
    fn from_event(event: TransferEvent) -> Self {
        Self {
            block_number: event.block_number,
            timestamp: event.timestamp,
            timestamp_iso: timestamp::iso_timestamp(event.timestamp),
            transaction_hash: event.transaction_hash,
            on_behalf: event.on_behalf,
            sender: event.sender,
            recipient: event.recipient,
            amount: event.amount,
            inflationary_amount: event.inflationary_amount,
            data: event.data.as_deref().and_then(decode_data_field),
            raw_data: event.data,
        }
    }
}

/// Successful manual check response.
#[derive(Debug, Serialize)]
struct CheckResponse {
    success: bool,
    count: usize,
    transactions: Vec<CheckedTransaction>,
    message: &'static str,
}

/// `POST /manual-check` — run one ad hoc query against the endpoint.
///
/// Fetches the most recent rows, newest first, bypassing the watermark and
/// the broadcast channel entirely. Diagnostics only: this is the one place
/// an RPC failure surfaces to a caller instead of being retried silently.
pub(super) async fn manual_check(
    state: State<AppState>,
) -> Result<impl IntoResponse, ManualCheckError> {
    tracing::info!("Manual RPC check triggered");

    let params = QueryParams::transfers(
        &state.monitor.namespace,
        &state.monitor.table,
        state.monitor.manual_check_limit,
        SortOrder::Descending,
        vec![],
    );
    let page = state.rpc.query(&params).await?;

    let transactions: Vec<CheckedTransaction> = page
        .records()
        .iter()
        .map(TransferEvent::from_record)
        .map(CheckedTransaction::from_event)
        .collect();

    tracing::info!(count = transactions.len(), "Manual RPC check completed");

    Ok(Json(CheckResponse {
        success: true,
        count: transactions.len(),
        transactions,
        message: "Manual RPC check completed",
    }))
}

/// Error surfaced when the ad hoc query fails.
#[derive(Debug)]
pub(super) struct ManualCheckError(RpcError);

impl From<RpcError> for ManualCheckError {
    fn from(error: RpcError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ManualCheckError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = %self.0, "Manual RPC check failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "RPC check failed",
                "details": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_wire_shape() {
        let event = TransferEvent {
            block_number: 41,
            timestamp: 1_700_000_000,
            transaction_index: 2,
            log_index: 5,
            transaction_hash: "0xabc".to_string(),
            on_behalf: "0xbehalf".to_string(),
            sender: "0xsender".to_string(),
            recipient: "0xrecipient".to_string(),
            amount: "250000000000000000000".to_string(),
            inflationary_amount: None,
            data: Some("0x68656c6c6f".to_string()),
        };
        let response = CheckResponse {
            success: true,
            count: 1,
            transactions: vec![CheckedTransaction::from_event(event)],
            message: "Manual RPC check completed",
        };

        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["success"], json!(true));
        assert_eq!(encoded["count"], json!(1));
        assert_eq!(encoded["message"], json!("Manual RPC check completed"));

        let tx = &encoded["transactions"][0];
        assert_eq!(tx["blockNumber"], json!(41));
        assert_eq!(tx["timestampIso"], json!("2023-11-14T22:13:20Z"));
        assert_eq!(tx["data"], json!("hello"));
        assert_eq!(tx["rawData"], json!("0x68656c6c6f"));
        assert_eq!(tx["inflationaryAmount"], json!(null));
    }

    #[test]
    fn test_zero_timestamp_has_no_iso_form() {
        let event = TransferEvent {
            block_number: 1,
            timestamp: 0,
            transaction_index: 0,
            log_index: 0,
            transaction_hash: String::new(),
            on_behalf: String::new(),
            sender: String::new(),
            recipient: String::new(),
            amount: "0".to_string(),
            inflationary_amount: None,
            data: None,
        };
        let checked = CheckedTransaction::from_event(event);
        assert_eq!(checked.timestamp_iso, None);
        assert_eq!(checked.data, None);
        assert_eq!(checked.raw_data, None);
    }
}
