//! JSON-RPC client for a `circles_query` endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::query::QueryParams;
use super::rows::{Record, RowSet};

/// Errors a `circles_query` call can produce.
#[derive(Debug, Error)]
pub enum RpcError {
    /// Transport-level failure (connect, send, or body read).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("circles_query failed: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The endpoint answered 200 but carried an RPC error object.
    #[error("{message}")]
    Rpc { message: String },
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: [&'a QueryParams; 1],
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Request ids only have to look distinct in the endpoint's logs; the
/// response is correlated by the HTTP exchange, not the id.
fn request_id() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Typed client for one `circles_query` endpoint.
///
/// Calls have no client-side timeout; the poll loop tolerates a slow cycle
/// and skips the ticks that land while one is still running.
#[derive(Debug, Clone)]
pub struct CirclesRpcClient {
    http: Client,
    url: Url,
}

impl CirclesRpcClient {
    pub fn new(url: Url) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }

    /// Execute one `circles_query` call and return the raw result page.
    pub async fn query(&self, params: &QueryParams) -> Result<RowSet, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: request_id(),
            method: "circles_query",
            params: [params],
        };

        let resp = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RpcError::Api { status, body });
        }

        let payload: RpcResponse = resp.json().await?;
        if let Some(error) = payload.error {
            return Err(RpcError::Rpc {
                message: error
                    .message
                    .unwrap_or_else(|| "circles_query returned an error".to_string()),
            });
        }

        // A missing or oddly shaped result is an empty page, not an error.
        let result = payload.result.unwrap_or(Value::Null);
        Ok(serde_json::from_value(result).unwrap_or_default())
    }

    /// Fetch the newest group membership rows for one member address.
    pub async fn fetch_group_memberships(
        &self,
        member: &str,
        group: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Record>, RpcError> {
        let params = QueryParams::group_memberships(member, group, limit);
        let page = self.query(&params).await?;
        Ok(page.records())
    }
}
