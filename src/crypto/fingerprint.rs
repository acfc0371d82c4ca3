//! Public-key fingerprints for out-of-band verification.
//!
//! A fingerprint is a short, human-comparable digest of a contact's public
//! key bundle: SHA-256 over the length-prefixed concatenation of the KEM
//! and signature public keys, truncated and rendered as grouped lowercase
//! hex. Two people compare fingerprints over a trusted channel (in person,
//! a phone call) to establish that they hold each other's real keys.
//!
//! This module only answers the comparison query. Marking a contact
//! `verified` is an explicit, separate, caller-driven action so the trust
//! decision stays auditable.

use sha2::{Digest, Sha256};

use crate::contact::Contact;

/// Number of digest bytes rendered into the fingerprint string
pub const FINGERPRINT_BYTES: usize = 16;

/// Domain separator hashed ahead of the key material
const FINGERPRINT_DOMAIN: &[u8] = b"qsm-fingerprint-v1";

/// Compute the fingerprint of a public key bundle
///
/// Deterministic and one-way. Keys are length-prefixed before hashing so
/// `(ab, c)` and `(a, bc)` can never collide.
///
/// ## Format
///
/// 32 lowercase hex characters in groups of four:
///
/// ```text
/// 3f2a 91cc 07de b544 1a06 e9c2 558f d031
/// ```
pub fn fingerprint(kem_public_key: &[u8], signature_public_key: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(FINGERPRINT_DOMAIN);
    hasher.update((kem_public_key.len() as u64).to_le_bytes());
    hasher.update(kem_public_key);
    hasher.update((signature_public_key.len() as u64).to_le_bytes());
    hasher.update(signature_public_key);
    let digest = hasher.finalize();

    let hex = hex::encode(&digest[..FINGERPRINT_BYTES]);
    hex.as_bytes()
        .chunks(4)
        .map(|chunk| std::str::from_utf8(chunk).expect("hex is ascii"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compare a contact's computed fingerprint against an expected value
///
/// Exact string comparison. On a match the *caller* is responsible for
/// setting `contact.verified = true`; this function never mutates trust
/// state.
pub fn verify_contact_fingerprint(contact: &Contact, expected: &str) -> bool {
    fingerprint(&contact.kem_public_key, &contact.signature_public_key) == expected
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_stable() {
        let fp1 = fingerprint(&[1u8; 64], &[2u8; 32]);
        let fp2 = fingerprint(&[1u8; 64], &[2u8; 32]);
        assert_eq!(fp1, fp2);
    }

    #[test]
    fn test_fingerprint_sensitive_to_single_byte() {
        let base = fingerprint(&[1u8; 64], &[2u8; 32]);

        let mut kem = [1u8; 64];
        kem[63] ^= 0x01;
        assert_ne!(base, fingerprint(&kem, &[2u8; 32]));

        let mut sig = [2u8; 32];
        sig[0] ^= 0x01;
        assert_ne!(base, fingerprint(&[1u8; 64], &sig));
    }

    #[test]
    fn test_fingerprint_length_prefixing_prevents_boundary_shift() {
        // Same concatenated bytes, different split
        let fp1 = fingerprint(&[0u8; 10], &[0u8; 20]);
        let fp2 = fingerprint(&[0u8; 20], &[0u8; 10]);
        assert_ne!(fp1, fp2);
    }

    #[test]
    fn test_fingerprint_format() {
        let fp = fingerprint(&[1u8; 8], &[2u8; 8]);

        // 32 hex chars in 8 groups of 4 separated by spaces
        let groups: Vec<&str> = fp.split(' ').collect();
        assert_eq!(groups.len(), 8);
        for group in groups {
            assert_eq!(group.len(), 4);
            assert!(group.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_verify_contact_fingerprint_exact_match_only() {
        let contact = Contact::new(
            "bob_456".into(),
            "Bob".into(),
            vec![1u8; 64],
            vec![2u8; 32],
        );

        let fp = fingerprint(&contact.kem_public_key, &contact.signature_public_key);
        assert!(verify_contact_fingerprint(&contact, &fp));

        // Case and whitespace are not normalized
        assert!(!verify_contact_fingerprint(&contact, &fp.to_uppercase()));
        assert!(!verify_contact_fingerprint(&contact, &fp.replace(' ', "")));
    }
}
