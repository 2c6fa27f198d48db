//! EVM JSON-RPC client — `eth_call` against the latest block.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the transport fails, the node
//!   rate-limits us, a gateway answers 5xx or the body is not JSON-RPC, up to
//!   [`MAX_BACKOFF_SECS`] seconds between attempts.
//! * Soft JSON-RPC errors (node overloaded, upstream timeouts) are retried the
//!   same way; malformed requests and execution reverts fail immediately.
//! * After `max_attempts` tries the call fails with
//!   [`TrackerError::Communication`].

use std::time::Duration;

use alloy_primitives::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{Result, TrackerError};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// Invalid request / method not found / invalid params / execution reverted.
const HARD_ERROR_CODES: [i64; 4] = [-32600, -32601, -32602, 3];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<String>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Execute a read-only call and return the raw ABI-encoded return data.
pub async fn eth_call(
    client: &Client,
    rpc_url: &str,
    to: Address,
    calldata: &[u8],
    max_attempts: u32,
) -> Result<Vec<u8>> {
    let request = build_request(to, calldata);
    let mut backoff = INITIAL_BACKOFF_SECS;
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        let retry_reason = match client.post(rpc_url).json(&request).send().await {
            Err(e) => format!("RPC request failed: {e}"),
            Ok(resp)
                if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || resp.status().is_server_error() =>
            {
                format!("RPC returned HTTP {}", resp.status())
            }
            Ok(resp) => match resp.text().await {
                Err(e) => format!("RPC response unreadable: {e}"),
                Ok(text) => match serde_json::from_str::<RpcResponse>(&text) {
                    Err(e) => format!("RPC response is not JSON-RPC: {e}"),
                    Ok(body) => {
                        if let Some(err) = body.error {
                            if HARD_ERROR_CODES.contains(&err.code) {
                                return Err(TrackerError::Communication(format!(
                                    "RPC hard error {}: {}",
                                    err.code, err.message
                                )));
                            }
                            format!("RPC soft error {}: {}", err.code, err.message)
                        } else {
                            let result = body.result.ok_or_else(|| {
                                TrackerError::Communication(
                                    "Empty result from eth_call".to_string(),
                                )
                            })?;
                            let bytes = decode_hex_result(&result)?;
                            debug!("eth_call to {to} returned {} bytes", bytes.len());
                            return Ok(bytes);
                        }
                    }
                },
            },
        };

        if attempt >= max_attempts {
            return Err(TrackerError::Communication(format!(
                "{retry_reason} (gave up after {attempt} attempts)"
            )));
        }

        warn!("{retry_reason} (will retry in {backoff}s)");
        tokio::time::sleep(Duration::from_secs(backoff)).await;
        backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
    }
}

fn build_request(to: Address, calldata: &[u8]) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "eth_call",
        "params": [
            {
                "to": format!("{to:#x}"),
                "data": format!("0x{}", hex::encode(calldata)),
            },
            "latest"
        ],
    })
}

fn decode_hex_result(raw: &str) -> Result<Vec<u8>> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    hex::decode(digits)
        .map_err(|e| TrackerError::Communication(format!("Malformed eth_call result {raw}: {e}")))
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
