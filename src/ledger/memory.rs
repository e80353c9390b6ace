//! In-memory claim ledger for tests and ephemeral deployments

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{Claim, ClaimStore};
use crate::types::{NotaryError, Result};

/// Claim ledger backed by a concurrent map. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryClaimLedger {
    by_token: DashMap<String, Claim>,
}

impl MemoryClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimStore for MemoryClaimLedger {
    fn put(&self, claim: &Claim) -> Result<()> {
        match self.by_token.entry(claim.token_code.clone()) {
            Entry::Occupied(_) => Err(NotaryError::Ledger(format!(
                "token code {} already taken",
                claim.token_code
            ))),
            Entry::Vacant(slot) => {
                slot.insert(claim.clone());
                Ok(())
            }
        }
    }

    fn get(&self, token_code: &str) -> Result<Option<Claim>> {
        Ok(self.by_token.get(token_code).map(|c| c.clone()))
    }

    fn find_by_tx_hash(&self, hash: &str) -> Result<Option<Claim>> {
        Ok(self
            .by_token
            .iter()
            .find(|entry| entry.blockchain_hash == hash)
            .map(|entry| entry.clone()))
    }

    fn scan(&self) -> Result<Vec<Claim>> {
        let mut claims: Vec<Claim> = self.by_token.iter().map(|e| e.clone()).collect();
        claims.sort_by_key(|c| c.timestamp);
        Ok(claims)
    }
}
