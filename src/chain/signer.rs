//! Account signing and submission
//!
//! The signer owns the Ed25519 key material for the notarization account.
//! The key is parsed once from configuration into process memory and never
//! leaves this module; only [`AccountSigner::sign`] touches it. Concurrent
//! submissions from the same account consume nonces, so callers serialize
//! sign+broadcast behind the service submission lock.

use ed25519_dalek::{Signer, SigningKey};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::Zeroizing;

use super::{ChainClient, PendingTx, SignedTx, TxDraft};
use crate::types::{NotaryError, Result};

/// Ed25519 private key length in bytes
const PRIVATE_KEY_LEN: usize = 32;

/// Holds the notarization account's signing key and derived address
pub struct AccountSigner {
    signing_key: SigningKey,
    address: String,
}

/// Exact bytes covered by the transaction signature
#[derive(Serialize)]
struct SigningPayload<'a> {
    draft: &'a TxDraft,
    nonce: u64,
}

/// Wire envelope for a signed transaction
#[derive(Serialize)]
struct TxEnvelope<'a> {
    draft: &'a TxDraft,
    nonce: u64,
    public_key: String,
    signature: String,
}

impl AccountSigner {
    /// Build a signer from a hex-encoded private key (with or without the
    /// `0x` prefix, as key exports commonly vary).
    ///
    /// Fails with [`NotaryError::Config`] on missing or malformed key
    /// material. The intermediate decode buffer is zeroized.
    pub fn from_hex_key(secret: &str) -> Result<Self> {
        let stripped = secret.trim();
        let stripped = stripped.strip_prefix("0x").unwrap_or(stripped);

        if stripped.is_empty() {
            return Err(NotaryError::Config("signing key is empty".to_string()));
        }

        let decoded = Zeroizing::new(
            hex::decode(stripped)
                .map_err(|e| NotaryError::Config(format!("signing key is not valid hex: {}", e)))?,
        );

        if decoded.len() != PRIVATE_KEY_LEN {
            return Err(NotaryError::Config(format!(
                "signing key must be {} bytes, got {}",
                PRIVATE_KEY_LEN,
                decoded.len()
            )));
        }

        let mut key_bytes = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
        key_bytes.copy_from_slice(&decoded);

        let signing_key = SigningKey::from_bytes(&key_bytes);
        let address = format!("0x{}", hex::encode(signing_key.verifying_key().to_bytes()));

        Ok(Self {
            signing_key,
            address,
        })
    }

    /// The account address derived from the verifying key
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Sign a sized draft at the given account nonce.
    ///
    /// Deterministic: the same draft and nonce always produce the same raw
    /// transaction and hash.
    pub fn sign(&self, draft: &TxDraft, nonce: u64) -> Result<SignedTx> {
        if draft.gas_limit == 0 {
            return Err(NotaryError::InvalidTransaction(
                "draft has no gas limit; run fee estimation first".to_string(),
            ));
        }

        let signing_bytes = serde_json::to_vec(&SigningPayload { draft, nonce })?;
        let signature = self.signing_key.sign(&signing_bytes);

        let envelope = TxEnvelope {
            draft,
            nonce,
            public_key: hex::encode(self.signing_key.verifying_key().to_bytes()),
            signature: hex::encode(signature.to_bytes()),
        };
        let envelope_bytes = serde_json::to_vec(&envelope)?;

        let hash = format!("0x{}", hex::encode(Sha256::digest(&envelope_bytes)));
        let raw = format!("0x{}", hex::encode(&envelope_bytes));

        debug!(nonce, hash = %hash, "signed marker transaction");
        Ok(SignedTx { raw, hash })
    }

    /// Broadcast a signed transaction. Blocking network call; permanent
    /// node rejections surface as [`NotaryError::InvalidTransaction`],
    /// transient failures as [`NotaryError::RetryableNetwork`]. No retry
    /// happens here.
    pub async fn submit(&self, client: &dyn ChainClient, signed: &SignedTx) -> Result<PendingTx> {
        let hash = client.broadcast(&signed.raw).await?;

        // A node echoing back a different hash means it rebuilt the
        // transaction; treat the echo as authoritative.
        if hash != signed.hash {
            debug!(local = %signed.hash, node = %hash, "node reported different tx hash");
        }

        Ok(PendingTx { hash })
    }
}
