//! # Key Material Store
//!
//! Owns this device's keypairs. No other component touches raw private
//! key bytes except through this module.
//!
//! ## Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      KEY MATERIAL LIFECYCLE                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  generate_and_store_keys(user)                                         │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  first call:  provider keygen (KEM + signature)             │       │
//! │  │               persist bundle, return public half            │       │
//! │  │  later calls: return existing public half (idempotent)      │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  private_keys(user) / export_public_keys(user)                         │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  rotate_keys(user)   — explicit wholesale replacement                  │
//! │  destroy_keys(user)  — account wipe                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Namespaces
//!
//! Private bundles live under `qsm.private.<user>`, public bundles under
//! `qsm.public.<user>`. The store never reads or writes outside these two
//! namespace kinds.
//!
//! ## Concurrency
//!
//! First-time generation for a user is serialized behind a mutex
//! (single-writer guarantee): without it, two racing callers would each
//! generate a keypair and one would be silently orphaned. Reads take no
//! exclusive lock and parallelize freely.

mod secure_store;

pub use secure_store::{MemoryStore, SecureStore};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::crypto;
use crate::error::{Error, Result};
use crate::provider::{KemKeypair, PrimitiveProvider, SigKeypair};

/// Storage key namespaces
mod namespace {
    /// Per-user private key bundles (never exported)
    pub fn private(user_id: &str) -> String {
        format!("qsm.private.{}", user_id)
    }

    /// Per-user public key bundles
    pub fn public(user_id: &str) -> String {
        format!("qsm.public.{}", user_id)
    }
}

/// A user's complete private key material
///
/// Never leaves the keystore boundary except into the protocol engine for
/// the duration of a call; private halves are zeroized on drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeypairBundle {
    /// KEM keypair
    pub kem: KemKeypair,
    /// Signature keypair
    pub signature: SigKeypair,
    /// Creation time (Unix millis)
    pub created_at: i64,
}

/// The exportable half of a user's key material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyBundle {
    /// Public encapsulation key
    pub kem_public_key: Vec<u8>,
    /// Public signature verification key
    pub signature_public_key: Vec<u8>,
    /// Human-comparable fingerprint of the two keys above
    pub fingerprint: String,
}

/// The key material store
///
/// Generates keypairs through the injected primitive provider and
/// persists them through the injected secure storage backend.
pub struct KeyStore {
    provider: Arc<dyn PrimitiveProvider>,
    store: Box<dyn SecureStore>,
    /// Serializes first-time generation and rotation per store
    generation_lock: Mutex<()>,
}

impl KeyStore {
    /// Create a keystore over a provider and a storage backend
    pub fn new(provider: Arc<dyn PrimitiveProvider>, store: Box<dyn SecureStore>) -> Self {
        Self {
            provider,
            store,
            generation_lock: Mutex::new(()),
        }
    }

    /// Generate and persist keypairs for a user, or return the existing
    /// public bundle
    ///
    /// Idempotent: repeated calls return the same keys until
    /// [`rotate_keys`](Self::rotate_keys) is explicitly requested.
    /// Concurrent first-time calls for the same user are serialized.
    pub fn generate_and_store_keys(&self, user_id: &str) -> Result<PublicKeyBundle> {
        let _guard = self.generation_lock.lock();

        if self.store.exists(&namespace::private(user_id))? {
            return self.export_public_keys(user_id);
        }

        self.generate_locked(user_id)
    }

    /// Explicitly replace a user's key material wholesale
    ///
    /// In-flight encrypt/decrypt calls holding the previous bundle are
    /// unaffected; they complete against the keys they were given.
    pub fn rotate_keys(&self, user_id: &str) -> Result<PublicKeyBundle> {
        let _guard = self.generation_lock.lock();
        tracing::info!(user_id, "rotating key material");
        self.generate_locked(user_id)
    }

    /// Retrieve a user's private key bundle
    ///
    /// Fails with [`Error::KeyNotFound`] if the user has never generated
    /// keys.
    pub fn private_keys(&self, user_id: &str) -> Result<KeypairBundle> {
        let bytes = self
            .store
            .retrieve(&namespace::private(user_id))?
            .ok_or(Error::KeyNotFound)?;

        let bundle: KeypairBundle = bincode::deserialize(&bytes)?;
        Ok(bundle)
    }

    /// Export a user's public key bundle
    pub fn export_public_keys(&self, user_id: &str) -> Result<PublicKeyBundle> {
        let bytes = self
            .store
            .retrieve(&namespace::public(user_id))?
            .ok_or(Error::KeyNotFound)?;

        let bundle: PublicKeyBundle = bincode::deserialize(&bytes)?;
        Ok(bundle)
    }

    /// Destroy all key material for a user (account wipe)
    pub fn destroy_keys(&self, user_id: &str) -> Result<()> {
        self.store.delete(&namespace::private(user_id))?;
        self.store.delete(&namespace::public(user_id))?;
        tracing::info!(user_id, "destroyed key material");
        Ok(())
    }

    // Caller must hold generation_lock.
    fn generate_locked(&self, user_id: &str) -> Result<PublicKeyBundle> {
        let kem = self.provider.kem_keygen()?;
        let signature = self.provider.sig_keygen()?;

        let public = PublicKeyBundle {
            kem_public_key: kem.public_key.clone(),
            signature_public_key: signature.public_key.clone(),
            fingerprint: crypto::fingerprint(&kem.public_key, &signature.public_key),
        };

        let bundle = KeypairBundle {
            kem,
            signature,
            created_at: crate::time::now_timestamp_millis(),
        };

        let private_bytes = bincode::serialize(&bundle)
            .map_err(|e| Error::StorageWriteError(e.to_string()))?;
        let public_bytes = bincode::serialize(&public)
            .map_err(|e| Error::StorageWriteError(e.to_string()))?;

        self.store.store(&namespace::private(user_id), &private_bytes)?;
        self.store.store(&namespace::public(user_id), &public_bytes)?;

        tracing::debug!(
            user_id,
            kem_public_len = public.kem_public_key.len(),
            signature_public_len = public.signature_public_key.len(),
            "generated and stored key material"
        );

        Ok(public)
    }
}

// ============================================================================
// TESTS
// ============================================================================
