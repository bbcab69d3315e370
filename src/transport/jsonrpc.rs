// JSON-RPC transport layer implementation
// This file implements the JSON-RPC 2.0 client used for gas price lookups
// and batched quoter calls over HTTP
//
// Numan Thabit 2025 Nov

use crate::errors::RouterError;
use crate::metrics::{REQ_ERRORS, REQ_LATENCY};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct JsonRpc {
    http: Client,
    url: String,
}

/// JSON-RPC error object returned for a single call.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    id: Option<Value>,
    result: Option<Value>,
    error: Option<RpcError>,
}

impl JsonRpc {
    pub fn new(url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    async fn post(&self, payload: &Value, method: &str) -> Result<Value, RouterError> {
        let _timer = REQ_LATENCY
            .with_label_values(&["jsonrpc", method])
            .start_timer();

        let resp = self
            .http
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                REQ_ERRORS.with_label_values(&["jsonrpc", method]).inc();
                RouterError::Transport(format!("jsonrpc send: {e}"))
            })?;
        if !resp.status().is_success() {
            REQ_ERRORS.with_label_values(&["jsonrpc", method]).inc();
            return Err(RouterError::Provider(format!("http {}", resp.status())));
        }
        resp.json()
            .await
            .map_err(|e| RouterError::Transport(format!("json parse: {e}")))
    }

    /// Single call; a JSON-RPC error object is a provider error.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RouterError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let body = self.post(&payload, method).await?;
        if let Some(err) = body.get("error") {
            REQ_ERRORS.with_label_values(&["jsonrpc", method]).inc();
            return Err(RouterError::Provider(err.to_string()));
        }
        serde_json::from_value(body["result"].clone())
            .map_err(|e| RouterError::Provider(format!("decode result: {e}")))
    }

    /// Batched calls of one method. Results come back in `params` order;
    /// a per-call error stays per-call.
    pub async fn batch(
        &self,
        method: &str,
        params: &[Value],
    ) -> Result<Vec<Result<Value, RpcError>>, RouterError> {
        if params.is_empty() {
            return Ok(Vec::new());
        }
        let payload: Vec<Value> = params
            .iter()
            .enumerate()
            .map(|(id, p)| {
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "method": method,
                    "params": p,
                })
            })
            .collect();
        let body = self.post(&Value::Array(payload), method).await?;

        let responses: Vec<RpcResponse> = serde_json::from_value(body)
            .map_err(|e| RouterError::Provider(format!("decode batch: {e}")))?;

        place_by_id(responses, params.len())
            .into_iter()
            .enumerate()
            .map(|(id, slot)| {
                slot.ok_or_else(|| {
                    REQ_ERRORS.with_label_values(&["jsonrpc", method]).inc();
                    RouterError::Provider(format!("batch response missing id {id}"))
                })
            })
            .collect()
    }
}

/// Slot batch responses by their numeric id. Ids that are missing, not
/// numeric or out of range leave their slot empty.
fn place_by_id(responses: Vec<RpcResponse>, len: usize) -> Vec<Option<Result<Value, RpcError>>> {
    let mut ordered: Vec<Option<Result<Value, RpcError>>> = vec![None; len];
    for response in responses {
        let Some(id) = response.id.as_ref().and_then(Value::as_u64) else {
            continue;
        };
        let Some(slot) = usize::try_from(id).ok().and_then(|id| ordered.get_mut(id)) else {
            continue;
        };
        *slot = Some(match (response.result, response.error) {
            (_, Some(err)) => Err(err),
            (Some(result), None) => Ok(result),
            (None, None) => Ok(Value::Null),
        });
    }
    ordered
}
