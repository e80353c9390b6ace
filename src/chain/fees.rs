//! Fee estimation and transaction sizing
//!
//! Builds the unsigned marker transaction and projects its cost before
//! anything is signed. Order matters: the balance floor is checked first
//! and a failure there makes no further network calls.

use tracing::{debug, info};

use super::units::format_native;
use super::{ChainClient, TxDraft};
use crate::types::{NotaryError, Result};

/// Gas safety buffer: estimates are scaled by 5/4 (25%), rounded up
const GAS_BUFFER_NUM: u128 = 5;
const GAS_BUFFER_DEN: u128 = 4;

/// A sized transaction draft plus its projected cost
#[derive(Debug, Clone)]
pub struct TxEstimate {
    /// Draft with `gas_limit` and `gas_price` filled in
    pub draft: TxDraft,
    /// Unbuffered gas estimate from the node
    pub base_gas: u64,
    /// `buffered_gas * gas_price` in base units
    pub projected_cost: u128,
}

/// Apply the 25% safety buffer to a gas estimate, rounding up.
pub fn buffered_gas(estimate: u64) -> u64 {
    let buffered = (u128::from(estimate) * GAS_BUFFER_NUM).div_ceil(GAS_BUFFER_DEN);
    // Gas limits fit u64 on every ledger this targets; saturate rather
    // than wrap if an implementation reports something absurd.
    u64::try_from(buffered).unwrap_or(u64::MAX)
}

/// Check funds, simulate the draft, and size it for submission.
///
/// Fails with [`NotaryError::InsufficientFunds`] before touching the fee
/// endpoints when the balance is below `funds_floor`.
pub async fn prepare(
    client: &dyn ChainClient,
    mut draft: TxDraft,
    funds_floor: u128,
) -> Result<TxEstimate> {
    let balance = client.get_balance(&draft.from).await?;
    if balance < funds_floor {
        return Err(NotaryError::InsufficientFunds {
            balance: format_native(balance),
            floor: format_native(funds_floor),
        });
    }

    let base_gas = client.estimate_gas(&draft).await?;
    let gas_price = client.gas_price().await?;

    let gas_limit = buffered_gas(base_gas);
    let projected_cost = u128::from(gas_limit)
        .checked_mul(gas_price)
        .ok_or_else(|| NotaryError::Internal("projected cost overflows u128".to_string()))?;

    debug!(
        base_gas,
        gas_limit, gas_price, "sized marker transaction"
    );
    info!(
        "Projected notarization cost: ~{} native units",
        format_native(projected_cost)
    );

    draft.gas_limit = gas_limit;
    draft.gas_price = gas_price;

    Ok(TxEstimate {
        draft,
        base_gas,
        projected_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_adds_quarter() {
        assert_eq!(buffered_gas(100_000), 125_000);
        assert_eq!(buffered_gas(4), 5);
        assert_eq!(buffered_gas(0), 0);
    }

    #[test]
    fn test_buffer_rounds_up() {
        // ceil(1 * 5/4) = 2
        assert_eq!(buffered_gas(1), 2);
        assert_eq!(buffered_gas(2), 3);
        assert_eq!(buffered_gas(3), 4);
    }

    #[test]
    fn test_buffer_saturates() {
        assert_eq!(buffered_gas(u64::MAX), u64::MAX);
    }
}
