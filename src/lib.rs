//! # QSM Core
//!
//! Hybrid post-quantum secure messaging protocol core: key lifecycle,
//! KEM-derived key scheduling, authenticated encryption, signature
//! binding, and the wire codec. Transport, persistence of messages, and
//! UI belong to the embedding application.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         QSM CORE ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      ProtocolEngine                             │   │
//! │  │        encrypt / decrypt, ordering and rejection rules          │   │
//! │  └───────┬─────────────────┬─────────────────────┬─────────────────┘   │
//! │          │                 │                     │                     │
//! │          ▼                 ▼                     ▼                     │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────────────┐  │
//! │  │   KeyStore   │  │ PrimitiveProvider│  │       crypto             │  │
//! │  │  lifecycle,  │  │  KEM + signature │  │  HKDF derivation,        │  │
//! │  │  SecureStore │  │  (ML-KEM/ML-DSA, │  │  AES-256-GCM seal/open,  │  │
//! │  │  backends    │  │   X25519/Ed25519)│  │  fingerprints            │  │
//! │  └──────────────┘  └──────────────────┘  └──────────────────────────┘  │
//! │          │                                                             │
//! │          ▼                                                             │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌─────────────────────┐  │
//! │  │  QuantumMessage  │  │     Contact      │  │       Error         │  │
//! │  │  wire codec +    │  │  peer identity,  │  │  taxonomy, codes,   │  │
//! │  │  signing input   │  │  trust state     │  │  rejection queries  │  │
//! │  └──────────────────┘  └──────────────────┘  └─────────────────────┘  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use qsm_core::{Contact, KeyStore, MemoryStore, MlKemProvider, ProtocolEngine};
//!
//! # fn main() -> qsm_core::Result<()> {
//! let provider = Arc::new(MlKemProvider::new());
//! let keystore = KeyStore::new(provider.clone(), Box::new(MemoryStore::new()));
//! let engine = ProtocolEngine::new(provider);
//!
//! // Each party generates keys once and exchanges the public halves
//! let alice_public = keystore.generate_and_store_keys("alice_123")?;
//! let bob_public = keystore.generate_and_store_keys("bob_456")?;
//!
//! let bob = Contact::new(
//!     "bob_456".into(),
//!     "Bob".into(),
//!     bob_public.kem_public_key.clone(),
//!     bob_public.signature_public_key.clone(),
//! );
//!
//! let alice_keys = keystore.private_keys("alice_123")?;
//! let message = engine.encrypt(b"Hello Bob!", &bob, "alice_123", &alice_keys)?;
//!
//! // On Bob's side
//! let alice = Contact::new(
//!     "alice_123".into(),
//!     "Alice".into(),
//!     alice_public.kem_public_key.clone(),
//!     alice_public.signature_public_key.clone(),
//! );
//! let bob_keys = keystore.private_keys("bob_456")?;
//! let plaintext = engine.decrypt(&message, &alice, &bob_keys)?;
//! assert_eq!(plaintext, b"Hello Bob!");
//! # Ok(())
//! # }
//! ```

pub mod contact;
pub mod crypto;
pub mod engine;
pub mod error;
pub mod keystore;
pub mod message;
pub mod provider;
pub mod time;

pub use contact::Contact;
pub use crypto::{fingerprint, verify_contact_fingerprint};
pub use engine::ProtocolEngine;
pub use error::{Error, Result};
pub use keystore::{KeyStore, KeypairBundle, MemoryStore, PublicKeyBundle, SecureStore};
pub use message::{QuantumMessage, PROTOCOL_VERSION, SUPPORTED_VERSIONS};
pub use provider::{
    AlgorithmSuite, ClassicalProvider, MlKemProvider, PrimitiveProvider, SharedSecret,
};

/// Crate version string
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
        assert!(!version().is_empty());
    }
}
