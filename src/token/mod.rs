//! Verification token generation
//!
//! Tokens are the short opaque codes handed to claimants for public
//! re-verification. Uniqueness is NOT guaranteed here; the claim ledger
//! checks for collisions at append time and asks for a fresh code under its
//! single-writer lock.

use rand::Rng;

/// Characters a token may contain. Uppercase + digits keeps codes easy to
/// read back over the phone.
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Token length in characters
pub const TOKEN_LEN: usize = 10;

/// Generate a fixed-length pseudo-random alphanumeric token code.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_charset() {
        for _ in 0..100 {
            let token = generate_token();
            assert_eq!(token.len(), TOKEN_LEN);
            assert!(token.bytes().all(|b| TOKEN_CHARSET.contains(&b)));
        }
    }

    #[test]
    fn test_tokens_vary() {
        let a = generate_token();
        let b = generate_token();
        // 36^10 codes; two consecutive draws colliding means a broken RNG
        assert_ne!(a, b);
    }
}
