//! # Contacts
//!
//! A contact is the caller-owned record of a peer: an identifier, a
//! display name, and the peer's public key material. The protocol engine
//! treats contacts as read-only input.
//!
//! ## Trust model
//!
//! `verified` starts false and can only become true through an explicit
//! caller action after a fingerprint match (see
//! [`crate::crypto::verify_contact_fingerprint`]). Nothing in this crate
//! upgrades it implicitly — not construction, not deserialization, not a
//! successful decrypt.

use serde::{Deserialize, Serialize};

use crate::crypto;
use crate::error::{Error, Result};

/// A peer's identity and public key material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable identifier for this peer
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    /// Public encapsulation key (provider-reported length)
    #[serde(with = "base64_bytes")]
    pub kem_public_key: Vec<u8>,
    /// Public signature verification key (provider-reported length)
    #[serde(with = "base64_bytes")]
    pub signature_public_key: Vec<u8>,
    /// Whether this contact's fingerprint has been verified out-of-band.
    /// Only the caller flips this, and only after an explicit match.
    #[serde(default)]
    pub verified: bool,
}

impl Contact {
    /// Create a new contact
    ///
    /// Always unverified: trust is established later, explicitly.
    pub fn new(
        id: String,
        display_name: String,
        kem_public_key: Vec<u8>,
        signature_public_key: Vec<u8>,
    ) -> Self {
        Self {
            id,
            display_name,
            kem_public_key,
            signature_public_key,
            verified: false,
        }
    }

    /// Compute this contact's fingerprint for out-of-band comparison
    pub fn fingerprint(&self) -> String {
        crypto::fingerprint(&self.kem_public_key, &self.signature_public_key)
    }

    /// Deserialize a contact from JSON, validating every required field
    ///
    /// Fails with `MalformedMessage` if a field is absent or wrong-shaped;
    /// fields are checked here at the boundary, never probed at use.
    pub fn from_json(json: &str) -> Result<Self> {
        let contact: Contact = serde_json::from_str(json)
            .map_err(|e| Error::MalformedMessage(format!("contact: {}", e)))?;
        contact.validate()?;
        Ok(contact)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::MalformedMessage(format!("contact: {}", e)))
    }

    fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(Error::MalformedMessage("contact: empty id".into()));
        }
        if self.kem_public_key.is_empty() {
            return Err(Error::MalformedMessage("contact: empty KEM public key".into()));
        }
        if self.signature_public_key.is_empty() {
            return Err(Error::MalformedMessage(
                "contact: empty signature public key".into(),
            ));
        }
        Ok(())
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contact_is_never_verified() {
        let contact = Contact::new("alice_123".into(), "Alice".into(), vec![1; 32], vec![2; 32]);
        assert!(!contact.verified);
    }

    #[test]
    fn test_json_round_trip() {
        let contact = Contact::new("alice_123".into(), "Alice".into(), vec![1; 32], vec![2; 32]);
        let json = contact.to_json().unwrap();
        let restored = Contact::from_json(&json).unwrap();
        assert_eq!(contact, restored);
    }

    #[test]
    fn test_verified_defaults_false_when_absent() {
        let json = format!(
            r#"{{"id":"a","display_name":"A","kem_public_key":"{}","signature_public_key":"{}"}}"#,
            "AQID", "BAUG" // base64 of [1,2,3] and [4,5,6]
        );
        let contact = Contact::from_json(&json).unwrap();
        assert!(!contact.verified);
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"id":"a","display_name":"A"}"#;
        assert!(matches!(
            Contact::from_json(json),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        let json = r#"{"id":"a","display_name":"A","kem_public_key":"","signature_public_key":"AQID"}"#;
        assert!(matches!(
            Contact::from_json(json),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let json = r#"{"id":"a","display_name":"A","kem_public_key":"!!!","signature_public_key":"AQID"}"#;
        assert!(matches!(
            Contact::from_json(json),
            Err(Error::MalformedMessage(_))
        ));
    }

    #[test]
    fn test_fingerprint_matches_free_function() {
        let contact = Contact::new("a".into(), "A".into(), vec![1; 32], vec![2; 32]);
        assert_eq!(
            contact.fingerprint(),
            crypto::fingerprint(&contact.kem_public_key, &contact.signature_public_key)
        );
    }
}
