//! Chain access layer
//!
//! Everything that touches the notarization ledger network lives here: the
//! [`ChainClient`] capability trait, the fee estimator, the account signer,
//! the confirmation waiter, and the JSON-RPC client implementation.
//!
//! The trait seam exists so alternate ledgers with different fee markets can
//! be substituted without touching the transaction builder or the service
//! pipeline, and so tests can run against an in-process chain.

pub mod fees;
pub mod rpc;
pub mod signer;
pub mod units;
pub mod waiter;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Result;

/// Unsigned transaction draft assembled by the builder.
///
/// Marker transactions are self-addressed and carry the encoded claim
/// payload in `data`; `value` stays zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxDraft {
    pub from: String,
    pub to: String,
    /// Transferred amount in base units
    pub value: u128,
    /// Encoded payload, 0x-prefixed hex
    pub data: String,
    /// Gas limit; zero until the fee estimator sizes the draft
    pub gas_limit: u64,
    /// Gas price in base units; zero until the fee estimator sizes the draft
    pub gas_price: u128,
}

impl TxDraft {
    /// A self-addressed marker transaction carrying `payload`
    pub fn marker(address: &str, payload: String) -> Self {
        Self {
            from: address.to_string(),
            to: address.to_string(),
            value: 0,
            data: payload,
            gas_limit: 0,
            gas_price: 0,
        }
    }
}

/// A signed, wire-ready transaction
#[derive(Debug, Clone)]
pub struct SignedTx {
    /// Raw transaction bytes, 0x-prefixed hex
    pub raw: String,
    /// Transaction hash, known before broadcast
    pub hash: String,
}

/// Handle to an in-flight broadcast. Holding one does NOT mean the
/// transaction is included; pass it to the confirmation waiter.
#[derive(Debug, Clone)]
pub struct PendingTx {
    pub hash: String,
}

/// Transaction state as reported by a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainTransaction {
    pub hash: String,
    /// None while the transaction is still pending
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    pub data: String,
}

/// A confirmed transaction with its final accounting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub to: String,
    pub value: u128,
    pub data: String,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub hash: String,
    pub block_number: u64,
    pub gas_used: u64,
    /// Actual cost in base units: `gas_used * gas_price`
    pub cost: u128,
}

/// Capability interface over the notarization ledger network.
///
/// Implementations: [`rpc::HttpChainClient`] for real nodes; tests provide
/// in-process fakes.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current balance of `address` in base units
    async fn get_balance(&self, address: &str) -> Result<u128>;

    /// Next transaction nonce for `address`
    async fn get_nonce(&self, address: &str) -> Result<u64>;

    /// Simulate `draft` against the node and return a base gas estimate
    async fn estimate_gas(&self, draft: &TxDraft) -> Result<u64>;

    /// Current network gas price in base units
    async fn gas_price(&self) -> Result<u128>;

    /// Broadcast a raw transaction; returns the transaction hash
    async fn broadcast(&self, raw: &str) -> Result<String>;

    /// Fetch a transaction by hash; `None` if the node has never seen it
    async fn get_transaction(&self, hash: &str) -> Result<Option<ChainTransaction>>;
}
