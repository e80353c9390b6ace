//! JSON-RPC chain client
//!
//! Speaks JSON-RPC 2.0 to a ledger node over HTTPS. Numeric quantities
//! travel as 0x-prefixed hex strings. Transport failures map to
//! [`NotaryError::RetryableNetwork`]; error objects returned by the node
//! map to [`NotaryError::InvalidTransaction`] on broadcast (permanent
//! rejection) and to [`NotaryError::Internal`] on queries.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::units::{parse_hex_qty, to_hex_qty};
use super::{ChainClient, ChainTransaction, TxDraft};
use crate::types::{NotaryError, Result};

/// HTTP JSON-RPC implementation of [`ChainClient`]
pub struct HttpChainClient {
    http: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Distinguishes transport failures from node-level rejections so callers
/// can map them onto the right taxonomy variant.
enum CallError {
    Transport(String),
    Node(String),
}

impl HttpChainClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, method: &str, params: Value) -> std::result::Result<Value, CallError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        debug!(method, id, "rpc call");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| CallError::Transport(e.to_string()))?;

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| CallError::Transport(format!("malformed rpc response: {}", e)))?;

        if let Some(err) = parsed.error {
            return Err(CallError::Node(format!("{} (code {})", err.message, err.code)));
        }

        parsed
            .result
            .ok_or_else(|| CallError::Transport("rpc response missing result".to_string()))
    }

    /// Map a query failure: node errors on reads are not transaction
    /// rejections.
    fn query_err(method: &str) -> impl Fn(CallError) -> NotaryError + '_ {
        move |e| match e {
            CallError::Transport(m) => NotaryError::RetryableNetwork(m),
            CallError::Node(m) => NotaryError::Internal(format!("{} failed: {}", method, m)),
        }
    }

    fn qty(value: &Value) -> Result<u128> {
        let text = value
            .as_str()
            .ok_or_else(|| NotaryError::Format(format!("expected hex quantity, got {}", value)))?;
        parse_hex_qty(text)
    }

    fn draft_params(draft: &TxDraft) -> Value {
        json!({
            "from": draft.from,
            "to": draft.to,
            "value": to_hex_qty(draft.value),
            "data": draft.data,
        })
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn get_balance(&self, address: &str) -> Result<u128> {
        let result = self
            .call("ledger_getBalance", json!([address]))
            .await
            .map_err(Self::query_err("ledger_getBalance"))?;
        Self::qty(&result)
    }

    async fn get_nonce(&self, address: &str) -> Result<u64> {
        let result = self
            .call("ledger_getNonce", json!([address]))
            .await
            .map_err(Self::query_err("ledger_getNonce"))?;
        let qty = Self::qty(&result)?;
        u64::try_from(qty)
            .map_err(|_| NotaryError::Format(format!("nonce out of range: {}", qty)))
    }

    async fn estimate_gas(&self, draft: &TxDraft) -> Result<u64> {
        let result = self
            .call("ledger_estimateGas", json!([Self::draft_params(draft)]))
            .await
            .map_err(Self::query_err("ledger_estimateGas"))?;
        let qty = Self::qty(&result)?;
        u64::try_from(qty)
            .map_err(|_| NotaryError::Format(format!("gas estimate out of range: {}", qty)))
    }

    async fn gas_price(&self) -> Result<u128> {
        let result = self
            .call("ledger_gasPrice", json!([]))
            .await
            .map_err(Self::query_err("ledger_gasPrice"))?;
        Self::qty(&result)
    }

    async fn broadcast(&self, raw: &str) -> Result<String> {
        let result = self
            .call("ledger_broadcast", json!([raw]))
            .await
            .map_err(|e| match e {
                CallError::Transport(m) => NotaryError::RetryableNetwork(m),
                // The node examined and refused the transaction; retrying
                // the same bytes cannot succeed.
                CallError::Node(m) => NotaryError::InvalidTransaction(m),
            })?;

        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| NotaryError::Format(format!("expected tx hash, got {}", result)))
    }

    async fn get_transaction(&self, hash: &str) -> Result<Option<ChainTransaction>> {
        let result = self
            .call("ledger_getTransaction", json!([hash]))
            .await
            .map_err(Self::query_err("ledger_getTransaction"))?;

        if result.is_null() {
            return Ok(None);
        }

        let block_number = match result.get("blockNumber") {
            Some(v) if !v.is_null() => Some(
                u64::try_from(Self::qty(v)?)
                    .map_err(|_| NotaryError::Format("block number out of range".to_string()))?,
            ),
            _ => None,
        };
        let gas_used = match result.get("gasUsed") {
            Some(v) if !v.is_null() => Some(
                u64::try_from(Self::qty(v)?)
                    .map_err(|_| NotaryError::Format("gas used out of range".to_string()))?,
            ),
            _ => None,
        };

        let tx_hash = result
            .get("hash")
            .and_then(Value::as_str)
            .unwrap_or(hash)
            .to_string();
        let data = result
            .get("data")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Some(ChainTransaction {
            hash: tx_hash,
            block_number,
            gas_used,
            data,
        }))
    }
}
