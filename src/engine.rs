//! # Protocol Engine
//!
//! The encrypt/decrypt pipeline. Everything else in this crate exists to
//! feed this module.
//!
//! ## Pipelines
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          ENCRYPT PIPELINE                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  plaintext ──┐                                                          │
//! │              │   ┌──────────────┐    ┌─────────────┐    ┌───────────┐  │
//! │  recipient ──┼──▶│ encapsulate  │───▶│ HKDF derive │───▶│ AES seal  │  │
//! │  public key  │   │ (KEM ct, ss) │    │ message key │    │ +fresh    │  │
//! │              │   └──────────────┘    └─────────────┘    │  nonce    │  │
//! │              │                                          └─────┬─────┘  │
//! │              │                                                ▼        │
//! │  sender ─────┴───────────────────────▶ sign(canonical input) ──▶ msg   │
//! │  signing key                                                           │
//! │                                                                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                          DECRYPT PIPELINE                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  1. version gate        (before any cryptographic work)                │
//! │  2. verify signature    (sender public key, recomputed input)          │
//! │  3. decapsulate         (recipient private key, KEM ciphertext)        │
//! │  4. derive message key  (HKDF, fixed domain constants)                 │
//! │  5. open payload        (AES-GCM, nonce from the wire)                 │
//! │                                                                         │
//! │  The order is load-bearing: no decapsulation, derivation, or           │
//! │  decryption is attempted for a message whose signature does not        │
//! │  verify, and no primitive runs at all for an unsupported version.      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rejection behavior
//!
//! A forged signature and a tampered payload both surface as rejection
//! errors with fixed messages. Callers get `is_rejection()` to present a
//! single "message could not be decrypted" experience, never a reason.

use std::sync::Arc;

use crate::contact::Contact;
use crate::crypto::{self, Nonce};
use crate::error::{Error, Result};
use crate::keystore::KeypairBundle;
use crate::message::{self, QuantumMessage, PROTOCOL_VERSION};
use crate::provider::{AlgorithmSuite, PrimitiveProvider};

/// The message encrypt/decrypt engine
///
/// Stateless apart from the injected provider: every call receives the key
/// material it operates on, so one engine instance serves any number of
/// users concurrently.
pub struct ProtocolEngine {
    provider: Arc<dyn PrimitiveProvider>,
}

impl ProtocolEngine {
    /// Create an engine over a primitive provider
    pub fn new(provider: Arc<dyn PrimitiveProvider>) -> Self {
        Self { provider }
    }

    /// The algorithm families this engine's provider wires in
    pub fn suite(&self) -> AlgorithmSuite {
        self.provider.suite()
    }

    /// Encrypt and sign a payload for a recipient
    ///
    /// Encapsulates a fresh shared secret against the recipient's KEM
    /// public key, derives a one-use message key, seals the payload under
    /// a fresh random nonce, and signs the canonical input with the
    /// sender's signing key. The shared secret and message key are
    /// zeroized before this returns.
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        recipient: &Contact,
        sender_id: &str,
        sender_keys: &KeypairBundle,
    ) -> Result<QuantumMessage> {
        let encapsulation = self.provider.kem_encapsulate(&recipient.kem_public_key)?;
        let message_key = crypto::derive_message_key(encapsulation.shared_secret.as_bytes())?;

        let nonce = Nonce::random();
        let encrypted_payload = crypto::seal(&message_key, &nonce, plaintext, b"")?;

        let mut message = QuantumMessage {
            id: QuantumMessage::new_id(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient.id.clone(),
            kem_ciphertext: encapsulation.ciphertext,
            encrypted_payload,
            nonce: nonce.as_bytes().to_vec(),
            signature: Vec::new(),
            timestamp: crate::time::now_timestamp_millis(),
            version: PROTOCOL_VERSION.to_string(),
        };

        message.signature = self
            .provider
            .sign(&sender_keys.signature.private_key, &message.signing_input())?;

        tracing::debug!(
            message_id = %message.id,
            recipient_id = %message.recipient_id,
            payload_len = message.encrypted_payload.len(),
            kem_ciphertext_len = message.kem_ciphertext.len(),
            "encrypted message"
        );

        Ok(message)
    }

    /// Verify and decrypt a received message
    ///
    /// ## Errors
    ///
    /// - [`Error::UnsupportedProtocolVersion`] before any primitive runs
    ///   if the message's version is unknown
    /// - [`Error::SignatureVerificationFailed`] if the signature does not
    ///   verify against the sender's public key; nothing downstream of the
    ///   signature check is attempted
    /// - [`Error::DecryptionFailed`] if the payload fails to authenticate
    pub fn decrypt(
        &self,
        message: &QuantumMessage,
        sender: &Contact,
        recipient_keys: &KeypairBundle,
    ) -> Result<Vec<u8>> {
        if !message::is_supported_version(&message.version) {
            return Err(Error::UnsupportedProtocolVersion(message.version.clone()));
        }

        message.validate()?;

        // Uniform rejection: a malformed signature and a non-verifying one
        // are indistinguishable to the caller.
        match self.provider.verify(
            &sender.signature_public_key,
            &message.signing_input(),
            &message.signature,
        ) {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                tracing::debug!(message_id = %message.id, "rejected message signature");
                return Err(Error::SignatureVerificationFailed);
            }
        }

        let shared_secret = self
            .provider
            .kem_decapsulate(&recipient_keys.kem.private_key, &message.kem_ciphertext)?;
        let message_key = crypto::derive_message_key(shared_secret.as_bytes())?;

        let nonce = Nonce::from_slice(&message.nonce)?;
        let plaintext = crypto::open(&message_key, &nonce, &message.encrypted_payload, b"")?;

        tracing::debug!(
            message_id = %message.id,
            sender_id = %message.sender_id,
            plaintext_len = plaintext.len(),
            "decrypted message"
        );

        Ok(plaintext)
    }
}

// ============================================================================
// TESTS
// ============================================================================
