//! JSON-RPC implementation of the ledger read port.
//!
//! Speaks the node's `getAccountInfo` method: the account address goes out
//! hex-encoded, the payload comes back base64-encoded inside the standard
//! `{"result": {"value": ...}}` envelope. A `null` value means no account
//! exists at that address.

use crate::error::LedgerError;
use crate::ledger::LedgerClient;
use crate::types::Address;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<RpcResult>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcResult {
    value: Option<AccountValue>,
}

#[derive(Debug, Deserialize)]
struct AccountValue {
    /// `[payload, encoding]` pair; only "base64" is requested
    data: (String, String),
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Decode a `getAccountInfo` response body into raw account bytes.
///
/// Split out of the client so the wire handling is testable without a
/// network.
pub fn decode_account_response(address: &Address, body: &[u8]) -> Result<Vec<u8>, LedgerError> {
    let envelope: RpcEnvelope = serde_json::from_slice(body)
        .map_err(|e| LedgerError::Transport(format!("malformed RPC response: {}", e)))?;

    if let Some(err) = envelope.error {
        return Err(LedgerError::Transport(format!(
            "RPC error {}: {}",
            err.code, err.message
        )));
    }

    let value = envelope
        .result
        .ok_or_else(|| LedgerError::Transport("RPC response missing result".to_string()))?
        .value
        .ok_or_else(|| LedgerError::NotFound(address.to_hex()))?;

    if value.data.1 != "base64" {
        return Err(LedgerError::Transport(format!(
            "unexpected account encoding: {}",
            value.data.1
        )));
    }

    BASE64
        .decode(value.data.0.as_bytes())
        .map_err(|e| LedgerError::Transport(format!("account payload not base64: {}", e)))
}

/// HTTP JSON-RPC ledger client
pub struct RpcLedgerClient {
    http: reqwest::Client,
    endpoint: String,
}

impl RpcLedgerClient {
    /// Create a client against `endpoint` with the default request timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LedgerError> {
        Self::with_timeout(endpoint, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn read_account(&self, address: &Address) -> Result<Vec<u8>, LedgerError> {
        debug!(address = %address, endpoint = %self.endpoint, "reading account");

        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getAccountInfo",
            "params": [address.to_hex(), {"encoding": "base64"}],
        });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::Transport(format!(
                "RPC endpoint returned status {}",
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LedgerError::Transport(e.to_string()))?;

        decode_account_response(address, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr() -> Address {
        Address([9u8; 32])
    }

    #[test]
    fn test_decode_account_payload() {
        let body = format!(
            r#"{{"jsonrpc":"2.0","id":1,"result":{{"context":{{"slot":1}},"value":{{"data":["{}","base64"],"lamports":1000}}}}}}"#,
            BASE64.encode(b"hello")
        );
        let bytes = decode_account_response(&addr(), body.as_bytes()).unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn test_null_value_is_not_found() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":{"context":{"slot":1},"value":null}}"#;
        let err = decode_account_response(&addr(), body).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn test_rpc_error_is_transport() {
        let body = br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32005,"message":"node is behind"}}"#;
        let err = decode_account_response(&addr(), body).unwrap_err();
        match err {
            LedgerError::Transport(msg) => assert!(msg.contains("node is behind")),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_encoding_rejected() {
        let body = br#"{"jsonrpc":"2.0","id":1,"result":{"value":{"data":["00","base58"]}}}"#;
        let err = decode_account_response(&addr(), body).unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }

    #[test]
    fn test_malformed_body_is_transport() {
        let err = decode_account_response(&addr(), b"not json").unwrap_err();
        assert!(matches!(err, LedgerError::Transport(_)));
    }
}
