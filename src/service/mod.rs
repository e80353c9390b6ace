//! Notary service - the claim submission pipeline
//!
//! Orchestrates the full flow: identity scoring, token generation, payload
//! encoding, fee sizing, signing, broadcast, confirmation, and the ledger
//! append. The signing account is process-wide shared state and each
//! submission consumes exactly one nonce, so the whole
//! sign-broadcast-confirm-append sequence runs under a single submission
//! lock.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chain::signer::AccountSigner;
use crate::chain::{fees, waiter, ChainClient, TxDraft};
use crate::codec;
use crate::extract::ExtractedFields;
use crate::ledger::{Claim, ClaimStore};
use crate::schemes;
use crate::scorer::{self, MatchResult, TrustedRecordTable};
use crate::token::generate_token;
use crate::types::{NotaryError, Result};

/// Give up after this many token collisions in a row; the keyspace is 36^10
/// so hitting this means the ledger or RNG is broken
const MAX_TOKEN_ATTEMPTS: usize = 5;

/// Everything needed to decide and notarize one claim
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimDraft {
    pub user_name: String,
    pub claimed_identity_key: String,
    pub scheme_id: String,
    pub extracted: ExtractedFields,
}

/// Combined identity + scheme eligibility decision
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityVerdict {
    pub eligible: bool,
    pub fraud_score: u8,
    pub reason: String,
    /// False when the claimed identity key is absent from the trusted table
    pub record_found: bool,
    /// Per-field identity match detail
    pub match_result: MatchResult,
}

/// What a successful submission hands back to the claimant
#[derive(Debug, Clone, Serialize)]
pub struct ClaimReceipt {
    pub token_code: String,
    pub blockchain_hash: String,
    pub block_number: u64,
    /// Actual cost in base units
    pub cost: u128,
    /// Actual cost formatted in native units
    pub cost_native: String,
}

/// The message notarized on chain, recoverable by anyone via the codec
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimAttestation {
    pub token_code: String,
    pub scheme: String,
    pub user_hash: String,
    pub fraud_score: u8,
    pub timestamp: String,
}

/// Pipeline tunables
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum balance in base units required before estimating fees
    pub funds_floor: u128,
    /// How long to wait for confirmation before giving up
    pub confirm_timeout: Duration,
    /// Delay between confirmation polls
    pub poll_interval: Duration,
}

/// The notarization engine. Cheap to share behind an [`Arc`].
pub struct NotaryService {
    chain: Arc<dyn ChainClient>,
    signer: AccountSigner,
    ledger: Arc<dyn ClaimStore>,
    trusted: TrustedRecordTable,
    config: PipelineConfig,
    /// Single-writer discipline for the signing account and ledger append
    submission_lock: Mutex<()>,
}

/// Decide eligibility for a draft against a trusted table, as of a given
/// date. Pure and deterministic.
pub fn evaluate_at(
    draft: &ClaimDraft,
    trusted: &TrustedRecordTable,
    as_of: NaiveDate,
) -> EligibilityVerdict {
    let match_result = scorer::score(&draft.extracted, &draft.claimed_identity_key, trusted);
    let record = trusted.get(&draft.claimed_identity_key);
    let record_found = record.is_some();

    let scheme = match schemes::get_scheme(&draft.scheme_id) {
        Some(s) => s,
        None => {
            return EligibilityVerdict {
                eligible: false,
                fraud_score: match_result.fraud_score,
                reason: "Unknown scheme or invalid data".to_string(),
                record_found,
                match_result,
            }
        }
    };

    let record = match record {
        Some(r) => r,
        None => {
            return EligibilityVerdict {
                eligible: false,
                fraud_score: match_result.fraud_score,
                reason: match_result.reason.clone(),
                record_found: false,
                match_result,
            }
        }
    };

    if !match_result.eligible {
        return EligibilityVerdict {
            eligible: false,
            fraud_score: match_result.fraud_score,
            reason: match_result.reason.clone(),
            record_found,
            match_result,
        };
    }

    // Identity checks out; apply the scheme's declared criteria against the
    // trusted record (ground truth), not the extraction
    let outcome = schemes::check_criteria(scheme, record, as_of);

    EligibilityVerdict {
        eligible: outcome.met,
        fraud_score: match_result.fraud_score,
        reason: outcome.reason,
        record_found,
        match_result,
    }
}

impl NotaryService {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        signer: AccountSigner,
        ledger: Arc<dyn ClaimStore>,
        trusted: TrustedRecordTable,
        config: PipelineConfig,
    ) -> Self {
        Self {
            chain,
            signer,
            ledger,
            trusted,
            config,
            submission_lock: Mutex::new(()),
        }
    }

    /// Address of the notarization account
    pub fn address(&self) -> &str {
        self.signer.address()
    }

    /// Current account balance in base units
    pub async fn balance(&self) -> Result<u128> {
        self.chain.get_balance(self.signer.address()).await
    }

    /// Decide eligibility without touching the network or the ledger.
    pub fn evaluate(&self, draft: &ClaimDraft) -> EligibilityVerdict {
        evaluate_at(draft, &self.trusted, Utc::now().date_naive())
    }

    /// Run the full notarization pipeline for a draft.
    ///
    /// Fails with [`NotaryError::NoMatchingRecord`] /
    /// [`NotaryError::NotEligible`] before any network call when the
    /// claimant does not qualify. The token code is only handed out after
    /// the transaction signed, broadcast and confirmed, and the ledger
    /// entry carries the confirmed hash.
    pub async fn submit_claim(&self, draft: &ClaimDraft) -> Result<ClaimReceipt> {
        info!(
            scheme = %draft.scheme_id,
            user = %draft.user_name,
            "claim submission started"
        );

        let verdict = self.evaluate(draft);
        if !verdict.record_found {
            return Err(NotaryError::NoMatchingRecord);
        }
        if !verdict.eligible {
            return Err(NotaryError::NotEligible {
                fraud_score: verdict.fraud_score,
                reason: verdict.reason,
            });
        }

        let user_hash = hash_identity(&draft.claimed_identity_key);

        // One submission at a time: the account nonce and the ledger's
        // token uniqueness both depend on it
        let _guard = self.submission_lock.lock().await;

        let token_code = self.fresh_token()?;
        let timestamp = Utc::now();

        let attestation = ClaimAttestation {
            token_code: token_code.clone(),
            scheme: draft.scheme_id.clone(),
            user_hash: user_hash.clone(),
            fraud_score: verdict.fraud_score,
            timestamp: timestamp.to_rfc3339(),
        };
        let payload = codec::encode(&serde_json::to_string(&attestation)?);

        let marker = TxDraft::marker(self.signer.address(), payload);
        let estimate = fees::prepare(self.chain.as_ref(), marker, self.config.funds_floor).await?;

        let nonce = self.chain.get_nonce(self.signer.address()).await?;
        let signed = self.signer.sign(&estimate.draft, nonce)?;
        let pending = self.signer.submit(self.chain.as_ref(), &signed).await?;

        let record = waiter::await_confirmation(
            self.chain.as_ref(),
            &estimate.draft,
            &pending,
            self.config.confirm_timeout,
            self.config.poll_interval,
        )
        .await?;

        let claim = Claim {
            id: Uuid::new_v4().to_string(),
            user_hash,
            user_name: draft.user_name.clone(),
            scheme: draft.scheme_id.clone(),
            timestamp,
            token_code,
            is_eligible: true,
            blockchain_hash: record.hash.clone(),
        };
        let claim = self.append_idempotent(claim)?;

        info!(
            token = %claim.token_code,
            hash = %claim.blockchain_hash,
            block = record.block_number,
            "claim notarized"
        );

        Ok(ClaimReceipt {
            token_code: claim.token_code,
            blockchain_hash: claim.blockchain_hash,
            block_number: record.block_number,
            cost: record.cost,
            cost_native: crate::chain::units::format_native(record.cost),
        })
    }

    /// Look up a claim by its public token code. Pure read.
    pub fn verify_token(&self, token_code: &str) -> Result<Option<Claim>> {
        self.ledger.get(token_code.trim())
    }

    /// All notarized claims, oldest first
    pub fn claims(&self) -> Result<Vec<Claim>> {
        self.ledger.scan()
    }

    /// Draw a token code not yet present in the ledger. Called under the
    /// submission lock.
    fn fresh_token(&self) -> Result<String> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = generate_token();
            if self.ledger.get(&token)?.is_none() {
                return Ok(token);
            }
            warn!("token collision, regenerating");
        }
        Err(NotaryError::Ledger(format!(
            "could not find a free token code in {} attempts",
            MAX_TOKEN_ATTEMPTS
        )))
    }

    /// Append a claim, idempotently keyed by the confirmed transaction
    /// hash. If the transaction was already recorded (an earlier append
    /// retried, or another writer won), the stored claim wins and no new
    /// transaction is ever submitted for it.
    fn append_idempotent(&self, mut claim: Claim) -> Result<Claim> {
        if let Some(existing) = self.ledger.find_by_tx_hash(&claim.blockchain_hash)? {
            info!(
                token = %existing.token_code,
                hash = %existing.blockchain_hash,
                "transaction already ledgered; reusing stored claim"
            );
            return Ok(existing);
        }

        for _ in 0..MAX_TOKEN_ATTEMPTS {
            match self.ledger.put(&claim) {
                Ok(()) => return Ok(claim),
                Err(e) => {
                    // A concurrent writer may have ledgered this hash, or
                    // taken our token out from under us
                    if let Some(existing) = self.ledger.find_by_tx_hash(&claim.blockchain_hash)? {
                        return Ok(existing);
                    }
                    if self.ledger.get(&claim.token_code)?.is_some() {
                        warn!("token collision at append, regenerating");
                        claim.token_code = generate_token();
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(NotaryError::Ledger(
            "claim append kept colliding; giving up".to_string(),
        ))
    }
}

/// SHA-256 hex digest of the normalized identity key. Claims never store
/// the raw key.
pub fn hash_identity(identity_key: &str) -> String {
    let normalized = scorer::records::normalize_key(identity_key);
    hex::encode(Sha256::digest(normalized.as_bytes()))
}
