//! # Primitive Provider
//!
//! The capability interface through which the protocol engine consumes
//! KEM and signature primitives.
//!
//! ## Boundary
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PRIMITIVE PROVIDER BOUNDARY                        │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  PrimitiveProvider Trait                                        │   │
//! │  │  ───────────────────────                                         │   │
//! │  │                                                                 │   │
//! │  │  • kem_keygen()                  → {public, private}            │   │
//! │  │  • kem_encapsulate(public)       → {ciphertext, shared_secret}  │   │
//! │  │  • kem_decapsulate(private, ct)  → shared_secret                │   │
//! │  │  • sig_keygen()                  → {public, private}            │   │
//! │  │  • sign(private, message)        → signature                    │   │
//! │  │  • verify(public, message, sig)  → bool                         │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Implementations:                                                      │
//! │  ────────────────                                                       │
//! │                                                                         │
//! │  ┌───────────────────────────┐  ┌───────────────────────────┐          │
//! │  │  MlKemProvider            │  │  ClassicalProvider        │          │
//! │  │  ML-KEM-768 + ML-DSA-65   │  │  X25519 + Ed25519         │          │
//! │  │  (post-quantum)           │  │  (classical fallback)     │          │
//! │  └───────────────────────────┘  └───────────────────────────┘          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything crosses this boundary as plain bytes. The engine makes no
//! assumption about key or ciphertext lengths: each provider reports its
//! own sizes through [`AlgorithmSuite`], and every length observed on the
//! wire is the provider's, not a constant of this crate.

mod classical;
mod mlkem;

pub use classical::ClassicalProvider;
pub use mlkem::MlKemProvider;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::Result;

/// Names and nominal sizes of the algorithm families a provider wires in
///
/// This travels with the provider as injected configuration; the protocol
/// core never hardcodes an algorithm family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSuite {
    /// KEM family name (e.g. "ML-KEM-768")
    pub kem: String,
    /// Signature family name (e.g. "ML-DSA-65")
    pub signature: String,
}

/// A KEM keypair as raw provider-reported bytes
///
/// The private half is zeroized on drop. `Debug` shows lengths only.
#[derive(Clone, Serialize, Deserialize)]
pub struct KemKeypair {
    /// Public encapsulation key (shareable)
    pub public_key: Vec<u8>,
    /// Private decapsulation key (never leaves the keystore boundary)
    pub private_key: Vec<u8>,
}

impl Drop for KemKeypair {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.private_key.zeroize();
    }
}

impl std::fmt::Debug for KemKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KemKeypair")
            .field("public_key_len", &self.public_key.len())
            .field("private_key_len", &self.private_key.len())
            .finish()
    }
}

/// A signature keypair as raw provider-reported bytes
///
/// The private half is zeroized on drop. `Debug` shows lengths only.
#[derive(Clone, Serialize, Deserialize)]
pub struct SigKeypair {
    /// Public verification key (shareable)
    pub public_key: Vec<u8>,
    /// Private signing key (never leaves the keystore boundary)
    pub private_key: Vec<u8>,
}

impl Drop for SigKeypair {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.private_key.zeroize();
    }
}

impl std::fmt::Debug for SigKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigKeypair")
            .field("public_key_len", &self.public_key.len())
            .field("private_key_len", &self.private_key.len())
            .finish()
    }
}

/// A KEM shared secret
///
/// Short-lived: consumed only as key-derivation input, never used directly
/// as a cipher key, never persisted. Zeroized on drop.
pub struct SharedSecret(Zeroizing<Vec<u8>>);

impl SharedSecret {
    /// Wrap raw shared-secret bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    /// Get the raw bytes (for key derivation only)
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSecret")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Result of KEM encapsulation: the ciphertext to transmit and the
/// shared secret both parties converge on
#[derive(Debug)]
pub struct Encapsulation {
    /// KEM ciphertext (goes on the wire)
    pub ciphertext: Vec<u8>,
    /// Shared secret (stays local, feeds the KDF)
    pub shared_secret: SharedSecret,
}

/// Capability interface for KEM and signature primitives
///
/// Operations are byte-in/byte-out and synchronous. Each call either
/// completes with a full result or fails with no observable partial
/// effect; implementations must not retain or log the bytes they are
/// given.
pub trait PrimitiveProvider: Send + Sync {
    /// The algorithm families this provider wires in
    fn suite(&self) -> AlgorithmSuite;

    /// Generate a fresh KEM keypair
    fn kem_keygen(&self) -> Result<KemKeypair>;

    /// Encapsulate against a recipient's public key
    fn kem_encapsulate(&self, public_key: &[u8]) -> Result<Encapsulation>;

    /// Recover the shared secret from a received ciphertext
    fn kem_decapsulate(&self, private_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret>;

    /// Generate a fresh signature keypair
    fn sig_keygen(&self) -> Result<SigKeypair>;

    /// Sign a message with a private signing key
    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Vec<u8>>;

    /// Verify a signature; `Ok(false)` means a well-formed but invalid
    /// signature, `Err` means the inputs were not even well-formed
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool>;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_never_prints_private_bytes() {
        let kp = KemKeypair {
            public_key: vec![1, 2, 3],
            private_key: vec![0xAA; 16],
        };
        let rendered = format!("{:?}", kp);
        assert!(!rendered.contains("170")); // 0xAA
        assert!(rendered.contains("private_key_len"));

        let ss = SharedSecret::new(vec![0xBB; 32]);
        let rendered = format!("{:?}", ss);
        assert!(!rendered.contains("187")); // 0xBB
    }

    #[test]
    fn test_suite_round_trips_through_json() {
        let suite = AlgorithmSuite {
            kem: "ML-KEM-768".into(),
            signature: "ML-DSA-65".into(),
        };
        let json = serde_json::to_string(&suite).unwrap();
        let restored: AlgorithmSuite = serde_json::from_str(&json).unwrap();
        assert_eq!(suite, restored);
    }
}
