//! Authenticated encryption for message payloads.
//!
//! AES-256-GCM with a 96-bit nonce and 128-bit tag. Nonces are generated
//! fresh from the OS CSPRNG for every `encrypt` call inside the protocol
//! engine; `Nonce::random()` is the only way to mint one outside of
//! deserialization, which makes reuse structurally hard rather than a
//! convention.
//!
//! `open` fails closed: any tag mismatch returns the generic
//! [`Error::DecryptionFailed`] with no partial plaintext exposed, and no
//! distinction between tampering and key mismatch.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce as AesNonce,
};
use rand::RngCore;
use zeroize::ZeroizeOnDrop;

use crate::error::{Error, Result};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// Size of the message encryption key in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// A nonce (number used once) for AES-GCM
///
/// **Never reuse a nonce with the same key.** Random 96-bit nonces are
/// safe up to the 2^32-message birthday bound per key, far beyond what a
/// per-message KEM-derived key will ever see (each message key here is
/// used exactly once).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Nonce(pub [u8; NONCE_SIZE]);

impl Nonce {
    /// Generate a cryptographically random nonce
    pub fn random() -> Self {
        let mut bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Reconstruct a nonce received on the wire
    pub fn from_bytes(bytes: [u8; NONCE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Reconstruct from a slice (must be exactly `NONCE_SIZE` bytes)
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: [u8; NONCE_SIZE] = slice.try_into().map_err(|_| {
            Error::MalformedMessage(format!(
                "nonce must be {} bytes, got {}",
                NONCE_SIZE,
                slice.len()
            ))
        })?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; NONCE_SIZE] {
        &self.0
    }
}

/// An AES-256-GCM message key
///
/// Ephemeral: derived per encrypt/decrypt call, zeroized on drop, never
/// persisted or logged.
#[derive(ZeroizeOnDrop)]
pub struct MessageKey([u8; KEY_SIZE]);

impl MessageKey {
    /// Create from raw derived bytes
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MessageKey(..)")
    }
}

/// Encrypt a payload, producing ciphertext with the tag appended
///
/// `aad` is authenticated but not encrypted; it must match on `open`.
pub fn seal(key: &MessageKey, nonce: &Nonce, plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|e| Error::EncryptionFailed(format!("invalid key: {}", e)))?;

    let payload = Payload {
        msg: plaintext,
        aad,
    };

    cipher
        .encrypt(AesNonce::from_slice(&nonce.0), payload)
        .map_err(|e| Error::EncryptionFailed(format!("seal failed: {}", e)))
}

/// Decrypt a payload produced by [`seal`]
///
/// ## Errors
///
/// Returns the generic [`Error::DecryptionFailed`] on any authentication
/// failure: tampered ciphertext, wrong key, wrong nonce, or mismatched
/// AAD. The causes are intentionally indistinguishable.
pub fn open(key: &MessageKey, nonce: &Nonce, ciphertext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|_| Error::DecryptionFailed)?;

    let payload = Payload {
        msg: ciphertext,
        aad,
    };

    cipher
        .decrypt(AesNonce::from_slice(&nonce.0), payload)
        .map_err(|_| Error::DecryptionFailed)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seal_open_round_trip() {
        let key = MessageKey::from_bytes([42u8; KEY_SIZE]);
        let nonce = Nonce::random();

        let ciphertext = seal(&key, &nonce, b"Hello, World!", b"context").unwrap();
        assert_eq!(ciphertext.len(), 13 + TAG_SIZE);

        let plaintext = open(&key, &nonce, &ciphertext, b"context").unwrap();
        assert_eq!(plaintext, b"Hello, World!");
    }

    #[test]
    fn test_empty_plaintext() {
        let key = MessageKey::from_bytes([42u8; KEY_SIZE]);
        let nonce = Nonce::random();

        let ciphertext = seal(&key, &nonce, b"", b"").unwrap();
        let plaintext = open(&key, &nonce, &ciphertext, b"").unwrap();
        assert_eq!(plaintext, b"");
    }

    #[test]
    fn test_tampered_ciphertext_fails_closed() {
        let key = MessageKey::from_bytes([42u8; KEY_SIZE]);
        let nonce = Nonce::random();

        let mut ciphertext = seal(&key, &nonce, b"Hello, World!", b"context").unwrap();
        ciphertext[0] ^= 0x01;

        let result = open(&key, &nonce, &ciphertext, b"context");
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_wrong_key_and_wrong_aad_indistinguishable() {
        let key = MessageKey::from_bytes([42u8; KEY_SIZE]);
        let wrong_key = MessageKey::from_bytes([43u8; KEY_SIZE]);
        let nonce = Nonce::random();

        let ciphertext = seal(&key, &nonce, b"secret", b"aad").unwrap();

        let e1 = open(&wrong_key, &nonce, &ciphertext, b"aad").unwrap_err();
        let e2 = open(&key, &nonce, &ciphertext, b"wrong aad").unwrap_err();

        assert_eq!(e1.to_string(), e2.to_string());
    }

    #[test]
    fn test_nonce_uniqueness_statistical() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(*Nonce::random().as_bytes()));
        }
    }

    #[test]
    fn test_nonce_from_slice_length_checked() {
        assert!(Nonce::from_slice(&[0u8; NONCE_SIZE]).is_ok());
        assert!(matches!(
            Nonce::from_slice(&[0u8; 11]),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_message_key_debug_redacted() {
        let key = MessageKey::from_bytes([0xAB; KEY_SIZE]);
        assert_eq!(format!("{:?}", key), "MessageKey(..)");
    }
}
