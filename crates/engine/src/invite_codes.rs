//! Invite code generation.
//!
//! Codes are short, human-shareable and globally unique. Uniqueness is
//! enforced by the allocator in `ops::households` (check-then-reserve
//! inside the creation transaction) with the UNIQUE index on
//! `households.invite_code` as the storage backstop.

use uuid::Uuid;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub(crate) const CODE_LEN: usize = 6;

/// Upper bound on generate-then-check retries before the allocator gives
/// up with `ResourceExhausted`.
pub(crate) const MAX_ATTEMPTS: usize = 100;

/// Returns a 6-character uppercase alphanumeric code.
///
/// Randomness comes from a v4 UUID, so no dedicated RNG dependency is
/// needed. The caller is responsible for uniqueness checks.
pub(crate) fn generate() -> String {
    Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(CODE_LEN)
        .map(|byte| CHARSET[*byte as usize % CHARSET.len()] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_has_fixed_length() {
        assert_eq!(generate().len(), CODE_LEN);
    }

    #[test]
    fn code_uses_uppercase_alphanumerics_only() {
        for _ in 0..100 {
            let code = generate();
            assert!(
                code.bytes().all(|b| CHARSET.contains(&b)),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn codes_vary() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate()).collect();
        // Collisions over 50 draws from 36^6 values would be extraordinary.
        assert!(codes.len() > 1);
    }
}
