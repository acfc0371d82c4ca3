//! # Symmetric Layer
//!
//! The symmetric half of the protocol: key derivation, authenticated
//! encryption, and public-key fingerprints.
//!
//! ## Scheme
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SYMMETRIC LAYER                                    │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. KEM shared secret (provider output, any length)                    │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  2. HKDF-SHA256(ikm = shared_secret,                                   │
//! │                 salt = fixed protocol constant,                        │
//! │                 info = fixed protocol constant)                        │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  3. 32-byte message key → AES-256-GCM                                  │
//! │     • 96-bit nonce, fresh per message                                  │
//! │     • 128-bit authentication tag                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Salt and info are fixed, non-secret protocol constants: they give the
//! derived key domain separation from any other use of the same shared
//! secret, not confidentiality.

mod cipher;
mod fingerprint;
mod kdf;

pub use cipher::{open, seal, MessageKey, Nonce, KEY_SIZE, NONCE_SIZE, TAG_SIZE};
pub use fingerprint::{fingerprint, verify_contact_fingerprint, FINGERPRINT_BYTES};
pub use kdf::{derive, derive_message_key, domain};
