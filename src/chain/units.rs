//! Base-unit arithmetic for the native currency
//!
//! All balances, prices and costs are carried as `u128` base units;
//! 1 native unit = 10^18 base units. Formatting and parsing are pure
//! integer/string operations so no precision is lost anywhere in the fee
//! path.

use crate::types::{NotaryError, Result};

/// Decimal places of the native unit
pub const NATIVE_DECIMALS: u32 = 18;

/// Base units per native unit
pub const BASE_PER_NATIVE: u128 = 10u128.pow(NATIVE_DECIMALS);

/// Format base units as a decimal native-unit string, trailing zeros
/// trimmed ("10000000000000000" -> "0.01").
pub fn format_native(base: u128) -> String {
    let whole = base / BASE_PER_NATIVE;
    let frac = base % BASE_PER_NATIVE;

    if frac == 0 {
        return whole.to_string();
    }

    let frac_str = format!("{:018}", frac);
    let trimmed = frac_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

/// Parse a decimal native-unit string ("0.01", "2", "1.5") into base units.
pub fn parse_native(text: &str) -> Result<u128> {
    let text = text.trim();
    let (whole_str, frac_str) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };

    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(NotaryError::Format(format!("empty amount: {:?}", text)));
    }
    if frac_str.len() as u32 > NATIVE_DECIMALS {
        return Err(NotaryError::Format(format!(
            "amount {:?} has more than {} decimal places",
            text, NATIVE_DECIMALS
        )));
    }

    let whole: u128 = if whole_str.is_empty() {
        0
    } else {
        whole_str
            .parse()
            .map_err(|_| NotaryError::Format(format!("invalid amount: {:?}", text)))?
    };

    let frac: u128 = if frac_str.is_empty() {
        0
    } else {
        let padded = format!("{:0<18}", frac_str);
        padded
            .parse()
            .map_err(|_| NotaryError::Format(format!("invalid amount: {:?}", text)))?
    };

    whole
        .checked_mul(BASE_PER_NATIVE)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| NotaryError::Format(format!("amount out of range: {:?}", text)))
}

/// Encode an unsigned quantity as a 0x-prefixed hex string for the wire.
pub fn to_hex_qty(value: u128) -> String {
    format!("{:#x}", value)
}

/// Parse a 0x-prefixed hex quantity from the wire.
pub fn parse_hex_qty(text: &str) -> Result<u128> {
    let stripped = text.strip_prefix("0x").unwrap_or(text);
    u128::from_str_radix(stripped, 16)
        .map_err(|e| NotaryError::Format(format!("invalid hex quantity {:?}: {}", text, e)))
}
