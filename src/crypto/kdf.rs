//! Key derivation from KEM shared secrets.
//!
//! HKDF-SHA256 turns a provider-reported shared secret into the fixed-size
//! AES-256-GCM message key. Determinism is the whole contract: both parties
//! must converge on the same key from the same secret and the same fixed
//! domain constants, or decryption fails.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::crypto::cipher::{MessageKey, KEY_SIZE};
use crate::error::{Error, Result};

/// Domain separation constants for HKDF
///
/// Fixed and non-secret. They ensure a key derived for message encryption
/// cannot collide with a key derived for any other purpose from the same
/// shared secret.
pub mod domain {
    /// Salt for message key derivation
    pub const MESSAGE_KEY_SALT: &[u8] = b"qsm-message-key-salt-v1";

    /// Info string for message key derivation
    pub const MESSAGE_KEY_INFO: &[u8] = b"qsm-message-key-v1";
}

/// Derive `length` bytes from a shared secret with explicit salt and info
///
/// Deterministic: identical inputs always produce identical output.
///
/// ## Errors
///
/// `DerivationFailed` only on malformed input lengths: an empty secret,
/// a zero length, or a length beyond the HKDF-SHA256 expansion bound
/// (255 × 32 bytes).
pub fn derive(shared_secret: &[u8], salt: &[u8], info: &[u8], length: usize) -> Result<Vec<u8>> {
    if shared_secret.is_empty() {
        return Err(Error::DerivationFailed("empty shared secret".into()));
    }
    if length == 0 {
        return Err(Error::DerivationFailed("zero output length".into()));
    }

    let hkdf = Hkdf::<Sha256>::new(Some(salt), shared_secret);

    let mut output = vec![0u8; length];
    hkdf.expand(info, &mut output)
        .map_err(|_| Error::DerivationFailed(format!("invalid output length {}", length)))?;

    Ok(output)
}

/// Derive the message encryption key for one encrypt/decrypt call
///
/// Uses the fixed protocol salt/info constants and the cipher's key size.
/// The returned key is ephemeral: it lives only for the duration of the
/// call and is zeroized on drop.
pub fn derive_message_key(shared_secret: &[u8]) -> Result<MessageKey> {
    let bytes = derive(
        shared_secret,
        domain::MESSAGE_KEY_SALT,
        domain::MESSAGE_KEY_INFO,
        KEY_SIZE,
    )?;

    // derive() guarantees exactly KEY_SIZE bytes here
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&bytes);

    Ok(MessageKey::from_bytes(key))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_deterministic() {
        let secret = [42u8; 32];

        let k1 = derive(&secret, b"salt", b"info", 32).unwrap();
        let k2 = derive(&secret, b"salt", b"info", 32).unwrap();

        assert_eq!(k1, k2);
    }

    #[test]
    fn test_different_secrets_different_keys() {
        let k1 = derive(&[1u8; 32], b"salt", b"info", 32).unwrap();
        let k2 = derive(&[2u8; 32], b"salt", b"info", 32).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn test_salt_and_info_separate_domains() {
        let secret = [42u8; 32];

        let base = derive(&secret, b"salt", b"info", 32).unwrap();
        let other_salt = derive(&secret, b"salt2", b"info", 32).unwrap();
        let other_info = derive(&secret, b"salt", b"info2", 32).unwrap();

        assert_ne!(base, other_salt);
        assert_ne!(base, other_info);
    }

    #[test]
    fn test_variable_secret_lengths_accepted() {
        // Provider-reported shared secrets are not assumed to be 32 bytes
        let k1 = derive(&[7u8; 64], b"salt", b"info", 32).unwrap();
        assert_eq!(k1.len(), 32);
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        assert!(matches!(
            derive(&[], b"salt", b"info", 32),
            Err(Error::DerivationFailed(_))
        ));
        assert!(matches!(
            derive(&[1u8; 32], b"salt", b"info", 0),
            Err(Error::DerivationFailed(_))
        ));
        // Beyond the 255 * hash_len HKDF expansion bound
        assert!(matches!(
            derive(&[1u8; 32], b"salt", b"info", 255 * 32 + 1),
            Err(Error::DerivationFailed(_))
        ));
    }

    #[test]
    fn test_message_key_uses_fixed_constants() {
        let secret = [42u8; 32];

        let via_helper = derive_message_key(&secret).unwrap();
        let via_raw = derive(
            &secret,
            domain::MESSAGE_KEY_SALT,
            domain::MESSAGE_KEY_INFO,
            KEY_SIZE,
        )
        .unwrap();

        assert_eq!(via_helper.as_bytes(), via_raw.as_slice());
    }
}
