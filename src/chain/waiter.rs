//! Confirmation waiting
//!
//! Polls the node until a broadcast transaction is included in a block.
//! A timeout does NOT cancel the underlying broadcast; the transaction may
//! still confirm later. Callers must treat a timeout as "unknown", not
//! "failed", and re-check by hash before resubmitting.

use std::time::Duration;

use tracing::{debug, info};

use super::{ChainClient, PendingTx, TransactionRecord, TxDraft};
use crate::types::{NotaryError, Result};

/// Wait for inclusion of `pending`, polling every `poll_interval`, for at
/// most `timeout`.
///
/// On inclusion the final record is assembled from the sized draft and the
/// node-reported receipt, with actual cost `gas_used * gas_price`.
pub async fn await_confirmation(
    client: &dyn ChainClient,
    draft: &TxDraft,
    pending: &PendingTx,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<TransactionRecord> {
    let poll = async {
        loop {
            if let Some(tx) = client.get_transaction(&pending.hash).await? {
                if let (Some(block_number), Some(gas_used)) = (tx.block_number, tx.gas_used) {
                    return Ok::<_, NotaryError>((block_number, gas_used));
                }
                debug!(hash = %pending.hash, "transaction seen, not yet included");
            } else {
                debug!(hash = %pending.hash, "transaction not yet visible to node");
            }
            tokio::time::sleep(poll_interval).await;
        }
    };

    let (block_number, gas_used) = tokio::time::timeout(timeout, poll)
        .await
        .map_err(|_| NotaryError::Timeout {
            hash: pending.hash.clone(),
            timeout_secs: timeout.as_secs(),
        })??;

    let cost = u128::from(gas_used)
        .checked_mul(draft.gas_price)
        .ok_or_else(|| NotaryError::Internal("confirmed cost overflows u128".to_string()))?;

    info!(
        hash = %pending.hash,
        block_number,
        gas_used,
        "transaction confirmed"
    );

    Ok(TransactionRecord {
        to: draft.to.clone(),
        value: draft.value,
        data: draft.data.clone(),
        gas_limit: draft.gas_limit,
        gas_price: draft.gas_price,
        hash: pending.hash.clone(),
        block_number,
        gas_used,
        cost,
    })
}
