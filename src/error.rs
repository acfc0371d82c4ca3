//! # Error Handling
//!
//! Error types for the protocol core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Key Material Errors                                               │
//! │  │   ├── KeyNotFound              - No keys stored for this user       │
//! │  │   └── KeyGenerationFailed      - Provider keygen failed             │
//! │  │                                                                      │
//! │  ├── Protocol Errors                                                   │
//! │  │   ├── KeyEncapsulationFailed   - KEM encapsulation failed           │
//! │  │   ├── KeyDecapsulationFailed   - KEM decapsulation failed           │
//! │  │   ├── SigningFailed            - Signature creation failed          │
//! │  │   ├── SignatureVerificationFailed - Signature did not verify        │
//! │  │   ├── DecryptionFailed         - AEAD open failed (tamper/mismatch) │
//! │  │   ├── EncryptionFailed         - AEAD seal failed                   │
//! │  │   ├── DerivationFailed         - HKDF input malformed               │
//! │  │   └── UnsupportedProtocolVersion - Unknown wire version             │
//! │  │                                                                      │
//! │  ├── Codec Errors                                                      │
//! │  │   └── MalformedMessage         - Field absent or wrong-shaped       │
//! │  │                                                                      │
//! │  └── Storage Errors                                                    │
//! │      ├── StorageReadError         - Backend read failed                │
//! │      ├── StorageWriteError        - Backend write failed               │
//! │      └── StorageCorrupted         - Stored bundle failed to decode     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure in this core is terminal for the call that raised it:
//! each one indicates malformed input, a security violation, or a missing
//! precondition, none of which are transient. Error payloads never contain
//! key material, shared secrets, or plaintext.

use thiserror::Error;

/// Result type alias for protocol core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the protocol core
///
/// Variants are categorized by module/domain. The rejection variants
/// (`SignatureVerificationFailed`, `DecryptionFailed`) are deliberately
/// unit variants with fixed messages so a caller cannot leak an oracle
/// by echoing them.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Key Material Errors (100-199)
    // ========================================================================

    /// No key material stored for the requested user
    #[error("No keys found for user. Generate keys first.")]
    KeyNotFound,

    /// The primitive provider failed to generate a keypair
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    // ========================================================================
    // Protocol Errors (200-299)
    // ========================================================================

    /// KEM encapsulation against the recipient key failed
    #[error("Key encapsulation failed: {0}")]
    KeyEncapsulationFailed(String),

    /// KEM decapsulation of the received ciphertext failed
    #[error("Key decapsulation failed: {0}")]
    KeyDecapsulationFailed(String),

    /// Signature creation failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Signature did not verify against the sender's public key
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// AEAD open failed: covers tampering and key mismatch uniformly
    #[error("Decryption failed")]
    DecryptionFailed,

    /// AEAD seal failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Key derivation input was malformed
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    /// The message carries a protocol version this engine does not speak
    #[error("Unsupported protocol version: {0}")]
    UnsupportedProtocolVersion(String),

    // ========================================================================
    // Codec Errors (300-399)
    // ========================================================================

    /// A wire message field was absent or wrong-shaped
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    // ========================================================================
    // Storage Errors (400-499)
    // ========================================================================

    /// Failed to read from the secure storage backend
    #[error("Failed to read from storage: {0}")]
    StorageReadError(String),

    /// Failed to write to the secure storage backend
    #[error("Failed to write to storage: {0}")]
    StorageWriteError(String),

    /// A stored key bundle failed to decode
    #[error("Stored key material is corrupted: {0}")]
    StorageCorrupted(String),
}

impl Error {
    /// Get the numeric error code for telemetry
    ///
    /// Codes are organized by category:
    /// - 100-199: Key material
    /// - 200-299: Protocol
    /// - 300-399: Codec
    /// - 400-499: Storage
    pub fn code(&self) -> i32 {
        match self {
            // Key material (100-199)
            Error::KeyNotFound => 100,
            Error::KeyGenerationFailed(_) => 101,

            // Protocol (200-299)
            Error::KeyEncapsulationFailed(_) => 200,
            Error::KeyDecapsulationFailed(_) => 201,
            Error::SigningFailed(_) => 202,
            Error::SignatureVerificationFailed => 203,
            Error::DecryptionFailed => 204,
            Error::EncryptionFailed(_) => 205,
            Error::DerivationFailed(_) => 206,
            Error::UnsupportedProtocolVersion(_) => 207,

            // Codec (300-399)
            Error::MalformedMessage(_) => 300,

            // Storage (400-499)
            Error::StorageReadError(_) => 400,
            Error::StorageWriteError(_) => 401,
            Error::StorageCorrupted(_) => 402,
        }
    }

    /// Whether the caller should offer a generic "cannot decrypt" experience
    ///
    /// Verification and decryption failures are indistinguishable from each
    /// other by design (uniform rejection); both return true here.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::SignatureVerificationFailed | Error::DecryptionFailed
        )
    }

    /// Whether the caller should prompt the user to set up keys
    pub fn requires_key_setup(&self) -> bool {
        matches!(self, Error::KeyNotFound)
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::StorageCorrupted(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
