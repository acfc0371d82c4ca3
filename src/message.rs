//! # Message Codec
//!
//! The wire entity and its canonical byte forms.
//!
//! ## Wire Format
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      QUANTUM MESSAGE FORMAT                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  QuantumMessage (JSON serialized)                                      │
//! │  ──────────────────────────────                                         │
//! │  {                                                                      │
//! │    "id": "uuid-v4",                 // Unique message ID                │
//! │    "sender_id": "alice_123",        // Sender identifier                │
//! │    "recipient_id": "bob_456",       // Recipient identifier             │
//! │    "kem_ciphertext": "base64...",   // KEM encapsulation ciphertext     │
//! │    "encrypted_payload": "base64...",// AEAD ciphertext + tag            │
//! │    "nonce": "base64...",            // 12-byte AEAD nonce               │
//! │    "signature": "base64...",        // Detached signature               │
//! │    "timestamp": 1234567890123,      // Unix timestamp (ms)              │
//! │    "version": "1.0.0"               // Protocol version                 │
//! │  }                                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical Signing Input
//!
//! The signature covers every other field of the message, concatenated in
//! a fixed order with a domain prefix and 64-bit little-endian length
//! prefixes on the variable-length fields:
//!
//! ```text
//! "qsm-signing-v1" || lp(id) || lp(sender_id) || lp(recipient_id)
//!                  || lp(kem_ciphertext) || lp(encrypted_payload)
//!                  || lp(nonce) || timestamp_le64 || lp(version)
//! ```
//!
//! Both sides recompute this from the message fields, so mutating any
//! field after signing invalidates verification. That is the point.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crypto::NONCE_SIZE;
use crate::error::{Error, Result};

/// Protocol version written into every outgoing message
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Versions this engine will accept on decrypt
pub const SUPPORTED_VERSIONS: &[&str] = &["1.0.0"];

/// Domain prefix for the canonical signing input
const SIGNING_DOMAIN: &[u8] = b"qsm-signing-v1";

/// The wire entity: one encrypted, signed message
///
/// Immutable once constructed; every field except `signature` is covered
/// by the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumMessage {
    /// Unique message ID (UUID v4)
    pub id: String,
    /// Sender identifier
    pub sender_id: String,
    /// Recipient identifier
    pub recipient_id: String,
    /// KEM encapsulation ciphertext (provider-reported length)
    #[serde(with = "base64_bytes")]
    pub kem_ciphertext: Vec<u8>,
    /// AEAD ciphertext with appended authentication tag
    #[serde(with = "base64_bytes")]
    pub encrypted_payload: Vec<u8>,
    /// AEAD nonce (fixed cipher nonce size)
    #[serde(with = "base64_bytes")]
    pub nonce: Vec<u8>,
    /// Detached signature over the canonical signing input
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
    /// Unix timestamp in milliseconds at assembly time
    pub timestamp: i64,
    /// Protocol version, "major.minor.patch"
    pub version: String,
}

impl QuantumMessage {
    /// Generate a fresh message ID
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Assemble the canonical signing input from this message's fields
    ///
    /// Deterministic and order-fixed; see the module docs for the layout.
    pub fn signing_input(&self) -> Vec<u8> {
        let mut input = Vec::with_capacity(
            SIGNING_DOMAIN.len()
                + self.id.len()
                + self.sender_id.len()
                + self.recipient_id.len()
                + self.kem_ciphertext.len()
                + self.encrypted_payload.len()
                + self.nonce.len()
                + self.version.len()
                + 8 * 8,
        );

        fn push_field(input: &mut Vec<u8>, field: &[u8]) {
            input.extend_from_slice(&(field.len() as u64).to_le_bytes());
            input.extend_from_slice(field);
        }

        input.extend_from_slice(SIGNING_DOMAIN);
        push_field(&mut input, self.id.as_bytes());
        push_field(&mut input, self.sender_id.as_bytes());
        push_field(&mut input, self.recipient_id.as_bytes());
        push_field(&mut input, &self.kem_ciphertext);
        push_field(&mut input, &self.encrypted_payload);
        push_field(&mut input, &self.nonce);
        input.extend_from_slice(&self.timestamp.to_le_bytes());
        push_field(&mut input, self.version.as_bytes());

        input
    }

    /// Serialize to the JSON wire form
    pub fn to_wire(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::MalformedMessage(format!("encode: {}", e)))
    }

    /// Deserialize from the JSON wire form, validating every field
    ///
    /// Required fields are checked here at the boundary; a message that
    /// decodes has the right shape everywhere downstream.
    pub fn from_wire(json: &str) -> Result<Self> {
        let message: QuantumMessage = serde_json::from_str(json)
            .map_err(|e| Error::MalformedMessage(format!("decode: {}", e)))?;
        message.validate()?;
        Ok(message)
    }

    /// Validate field shapes
    ///
    /// Does not check the protocol version against `SUPPORTED_VERSIONS`;
    /// that gate belongs to the engine so an unsupported-but-well-formed
    /// version surfaces as `UnsupportedProtocolVersion`, not as a codec
    /// error.
    pub fn validate(&self) -> Result<()> {
        fn required(value: &str, name: &str) -> Result<()> {
            if value.is_empty() {
                Err(Error::MalformedMessage(format!("empty field: {}", name)))
            } else {
                Ok(())
            }
        }

        required(&self.id, "id")?;
        required(&self.sender_id, "sender_id")?;
        required(&self.recipient_id, "recipient_id")?;
        required(&self.version, "version")?;

        if self.kem_ciphertext.is_empty() {
            return Err(Error::MalformedMessage("empty field: kem_ciphertext".into()));
        }
        if self.encrypted_payload.is_empty() {
            return Err(Error::MalformedMessage(
                "empty field: encrypted_payload".into(),
            ));
        }
        if self.signature.is_empty() {
            return Err(Error::MalformedMessage("empty field: signature".into()));
        }
        if self.nonce.len() != NONCE_SIZE {
            return Err(Error::MalformedMessage(format!(
                "nonce must be {} bytes, got {}",
                NONCE_SIZE,
                self.nonce.len()
            )));
        }
        if self.timestamp < 0 {
            return Err(Error::MalformedMessage("negative timestamp".into()));
        }
        if !is_version_shaped(&self.version) {
            return Err(Error::MalformedMessage(format!(
                "version not major.minor.patch: {}",
                self.version
            )));
        }

        Ok(())
    }
}

/// Whether a version string has the "major.minor.patch" shape
fn is_version_shaped(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

/// Whether this engine speaks the given protocol version
pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// Serde helper for byte fields as base64 strings
mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BASE64.decode(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================
