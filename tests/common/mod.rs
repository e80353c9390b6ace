//! Shared test fixtures: an in-process chain and canned identity data

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use equichain_notary::chain::signer::AccountSigner;
use equichain_notary::chain::{ChainClient, ChainTransaction, TxDraft};
use equichain_notary::extract::{
    ExtractedFields, FinancialFields, IdentityDocumentFields, PersonalFields, SecondaryIdFields,
};
use equichain_notary::ledger::SqliteClaimLedger;
use equichain_notary::scorer::records::{
    DocumentRecord, FinancialRecord, PersonalRecord, TrustedIdentityRecord,
};
use equichain_notary::scorer::TrustedRecordTable;
use equichain_notary::types::{NotaryError, Result};
use equichain_notary::{ClaimDraft, NotaryService, PipelineConfig};

pub const TEST_KEY: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

/// One native unit in base units
pub const ONE: u128 = 1_000_000_000_000_000_000;

struct TxState {
    data: String,
    polls: usize,
}

/// In-process chain fake. Broadcast transactions confirm after a
/// configurable number of polls.
pub struct MockChain {
    pub balance: u128,
    pub gas_estimate: u64,
    pub gas_price: u128,
    /// How many polls a transaction stays pending before inclusion
    pub confirm_after_polls: usize,
    /// When set, broadcast is rejected with this message
    pub reject_broadcast: Option<String>,

    nonce: AtomicU64,
    estimate_calls: AtomicUsize,
    broadcast_calls: AtomicUsize,
    txs: Mutex<HashMap<String, TxState>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            balance: ONE, // 1 native unit
            gas_estimate: 100_000,
            gas_price: 2_000_000_000,
            confirm_after_polls: 1,
            reject_broadcast: None,
            nonce: AtomicU64::new(0),
            estimate_calls: AtomicUsize::new(0),
            broadcast_calls: AtomicUsize::new(0),
            txs: Mutex::new(HashMap::new()),
        }
    }

    pub fn estimate_calls(&self) -> usize {
        self.estimate_calls.load(Ordering::SeqCst)
    }

    pub fn broadcast_calls(&self) -> usize {
        self.broadcast_calls.load(Ordering::SeqCst)
    }

    /// Payload data of a broadcast transaction, as the chain stored it
    pub fn tx_data(&self, hash: &str) -> Option<String> {
        self.txs.lock().unwrap().get(hash).map(|t| t.data.clone())
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn get_balance(&self, _address: &str) -> Result<u128> {
        Ok(self.balance)
    }

    async fn get_nonce(&self, _address: &str) -> Result<u64> {
        Ok(self.nonce.fetch_add(1, Ordering::SeqCst))
    }

    async fn estimate_gas(&self, _draft: &TxDraft) -> Result<u64> {
        self.estimate_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.gas_estimate)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(self.gas_price)
    }

    async fn broadcast(&self, raw: &str) -> Result<String> {
        self.broadcast_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ref msg) = self.reject_broadcast {
            return Err(NotaryError::InvalidTransaction(msg.clone()));
        }

        // Recover the payload the way a real node would: decode the
        // envelope and keep the draft's data field
        let envelope_hex = raw.strip_prefix("0x").unwrap_or(raw);
        let envelope_bytes = hex::decode(envelope_hex)
            .map_err(|e| NotaryError::InvalidTransaction(format!("bad raw tx: {}", e)))?;
        let envelope: serde_json::Value = serde_json::from_slice(&envelope_bytes)
            .map_err(|e| NotaryError::InvalidTransaction(format!("bad envelope: {}", e)))?;
        let data = envelope["draft"]["data"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        let hash = format!(
            "0x{}",
            hex::encode(<sha2::Sha256 as sha2::Digest>::digest(&envelope_bytes))
        );
        self.txs
            .lock()
            .unwrap()
            .insert(hash.clone(), TxState { data, polls: 0 });
        Ok(hash)
    }

    async fn get_transaction(&self, hash: &str) -> Result<Option<ChainTransaction>> {
        let mut txs = self.txs.lock().unwrap();
        let Some(tx) = txs.get_mut(hash) else {
            return Ok(None);
        };
        tx.polls += 1;

        if tx.polls > self.confirm_after_polls {
            Ok(Some(ChainTransaction {
                hash: hash.to_string(),
                block_number: Some(4321),
                gas_used: Some(self.gas_estimate),
                data: tx.data.clone(),
            }))
        } else {
            Ok(Some(ChainTransaction {
                hash: hash.to_string(),
                block_number: None,
                gas_used: None,
                data: tx.data.clone(),
            }))
        }
    }
}

pub fn trusted_table() -> TrustedRecordTable {
    TrustedRecordTable::from_records(vec![
        TrustedIdentityRecord {
            identity_key: "1234 5678 9012".to_string(),
            personal: PersonalRecord {
                full_name: "Ramesh Kumar".to_string(),
                date_of_birth: "1958-04-12".to_string(),
                gender: "Male".to_string(),
                guardian_name: "Mohan Kumar".to_string(),
                mobile_number: "9876543210".to_string(),
            },
            document: DocumentRecord {
                secondary_id_number: "ABCPK1234F".to_string(),
                address: "123, Some Street, City, State".to_string(),
                issue_date: "2015-06-01".to_string(),
            },
            financial: FinancialRecord { annual_income: 75_000 },
        },
        TrustedIdentityRecord {
            identity_key: "9876 5432 1098".to_string(),
            personal: PersonalRecord {
                full_name: "Priya Singh".to_string(),
                date_of_birth: "1993-11-02".to_string(),
                gender: "Female".to_string(),
                guardian_name: "Rajendra Singh".to_string(),
                mobile_number: "9811122233".to_string(),
            },
            document: DocumentRecord {
                secondary_id_number: "DEFPS5678G".to_string(),
                address: "456, Some Street, City, State".to_string(),
                issue_date: "2017-02-18".to_string(),
            },
            financial: FinancialRecord { annual_income: 180_000 },
        },
    ])
}

/// Draft whose extraction matches the Ramesh Kumar trusted record exactly
pub fn matching_draft(scheme_id: &str) -> ClaimDraft {
    ClaimDraft {
        user_name: "Ramesh Kumar".to_string(),
        claimed_identity_key: "1234 5678 9012".to_string(),
        scheme_id: scheme_id.to_string(),
        extracted: ExtractedFields {
            personal: PersonalFields {
                full_name: Some("Ramesh Kumar".to_string()),
                date_of_birth: Some("1958-04-12".to_string()),
                gender: Some("Male".to_string()),
                guardian_name: Some("Mohan Kumar".to_string()),
                mobile_number: Some("9876543210".to_string()),
            },
            identity_document: IdentityDocumentFields {
                document_number: Some("1234 5678 9012".to_string()),
                address: Some("123, Some Street, City, State".to_string()),
                issue_date: Some("2015-06-01".to_string()),
            },
            secondary_id: SecondaryIdFields {
                id_number: Some("ABCPK1234F".to_string()),
            },
            financial: FinancialFields { annual_income: Some(75_000) },
        },
    }
}

pub fn pipeline_config() -> PipelineConfig {
    PipelineConfig {
        funds_floor: ONE / 100, // 0.01 native units
        confirm_timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(10),
    }
}

/// Service wired to the given mock chain with an in-memory sqlite ledger
pub fn service_with(chain: Arc<MockChain>) -> NotaryService {
    NotaryService::new(
        chain,
        AccountSigner::from_hex_key(TEST_KEY).unwrap(),
        Arc::new(SqliteClaimLedger::open_in_memory().unwrap()),
        trusted_table(),
        pipeline_config(),
    )
}
