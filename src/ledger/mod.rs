//! Claim ledger - durable, keyed, append-only store of completed claims
//!
//! Claims are written exactly once, after the notarizing transaction has
//! confirmed, and are never mutated or deleted here. The store is modeled
//! as an abstract keyed interface so a real database, a log file, or an
//! in-memory map can back it without touching calling code.

pub mod memory;
pub mod sqlite;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Result;

pub use memory::MemoryClaimLedger;
pub use sqlite::SqliteClaimLedger;

/// A completed, notarized claim. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    /// SHA-256 hex of the claimed identity key; raw identity numbers are
    /// never persisted
    pub user_hash: String,
    pub user_name: String,
    pub scheme: String,
    pub timestamp: DateTime<Utc>,
    pub token_code: String,
    pub is_eligible: bool,
    /// Confirmed transaction hash; set if and only if the notarizing
    /// submission confirmed
    pub blockchain_hash: String,
}

/// Append-only keyed claim storage.
///
/// `put` is atomic from the caller's view: either the complete record is
/// stored or nothing is. Reads are safe for concurrent use; writes are
/// serialized by the service submission lock.
pub trait ClaimStore: Send + Sync {
    /// Append a claim. Fails without side effects if the token code is
    /// already taken.
    fn put(&self, claim: &Claim) -> Result<()>;

    /// Look up a claim by token code. Pure read.
    fn get(&self, token_code: &str) -> Result<Option<Claim>>;

    /// Look up a claim by confirmed transaction hash. Used to make ledger
    /// retries idempotent: a confirmed transaction must never be
    /// re-submitted just because the first append attempt failed.
    fn find_by_tx_hash(&self, hash: &str) -> Result<Option<Claim>>;

    /// All claims, oldest first.
    fn scan(&self) -> Result<Vec<Claim>>;
}

#[cfg(test)]
pub(crate) fn sample_claim(token_code: &str, tx_hash: &str) -> Claim {
    Claim {
        id: "claim-0001".to_string(),
        user_hash: "aa".repeat(32),
        user_name: "Ramesh Kumar".to_string(),
        scheme: "food-subsidy".to_string(),
        timestamp: "2026-08-01T10:30:00Z".parse().unwrap(),
        token_code: token_code.to_string(),
        is_eligible: true,
        blockchain_hash: tx_hash.to_string(),
    }
}
