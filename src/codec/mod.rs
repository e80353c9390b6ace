//! Reversible text-to-hex payload codec
//!
//! Claim attestations travel in the data field of a marker transaction as
//! `0x`-prefixed hex over the UTF-8 bytes of the message. The transformation
//! is byte-exact and reversible so a verifier can recover the original
//! attestation from the transaction alone.

use crate::types::{NotaryError, Result};

/// Encode a UTF-8 string into a `0x`-prefixed hex payload.
pub fn encode(message: &str) -> String {
    format!("0x{}", hex::encode(message.as_bytes()))
}

/// Decode a hex payload (with or without `0x` prefix) back to the original
/// string.
///
/// Fails with [`NotaryError::Format`] on odd-length input, non-hex digits,
/// or bytes that are not valid UTF-8.
pub fn decode(payload: &str) -> Result<String> {
    let stripped = payload.strip_prefix("0x").unwrap_or(payload);

    let bytes = hex::decode(stripped)
        .map_err(|e| NotaryError::Format(format!("invalid hex payload: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| NotaryError::Format(format!("payload is not valid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ascii() {
        let message = "token=K7Q2M8XR4P scheme=food-subsidy";
        assert_eq!(decode(&encode(message)).unwrap(), message);
    }

    #[test]
    fn test_round_trip_unicode() {
        for message in ["नमस्ते दुनिया", "emoji 🚀 payload", "", "¼ ₹2,50,000"] {
            assert_eq!(decode(&encode(message)).unwrap(), message);
        }
    }

    #[test]
    fn test_encode_is_prefixed_hex() {
        assert_eq!(encode("hi"), "0x6869");
    }

    #[test]
    fn test_decode_accepts_unprefixed() {
        assert_eq!(decode("6869").unwrap(), "hi");
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        assert!(matches!(decode("0xabc"), Err(NotaryError::Format(_))));
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(matches!(decode("0xzz11"), Err(NotaryError::Format(_))));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        // 0xff is not a valid UTF-8 sequence on its own
        assert!(matches!(decode("0xff"), Err(NotaryError::Format(_))));
    }
}
