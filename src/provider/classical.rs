//! Classical reference provider: X25519 + Ed25519.
//!
//! X25519 is used KEM-style: encapsulation generates an ephemeral keypair,
//! the "ciphertext" is the ephemeral public key, and the shared secret is
//! the Diffie-Hellman output of ephemeral × recipient-static. Decapsulation
//! recomputes the same DH from the recipient's static private key and the
//! received ephemeral public key.
//!
//! This provider exists as the classical fallback and as a fast test double:
//! it exercises the provider boundary with key and ciphertext sizes two
//! orders of magnitude smaller than the post-quantum set, which is exactly
//! what keeps hardcoded-length assumptions out of the engine.

use ed25519_dalek::{Signature as Ed25519Signature, Signer, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use x25519_dalek::{EphemeralSecret, PublicKey as X25519PublicKey, StaticSecret};

use crate::error::{Error, Result};
use crate::provider::{
    AlgorithmSuite, Encapsulation, KemKeypair, PrimitiveProvider, SharedSecret, SigKeypair,
};

/// X25519 key, ciphertext, and shared secret size in bytes
pub const X25519_KEY_SIZE: usize = 32;
/// Ed25519 signature size in bytes
pub const ED25519_SIGNATURE_SIZE: usize = 64;

/// Classical primitive provider (X25519 + Ed25519)
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassicalProvider;

impl ClassicalProvider {
    /// Create a new provider instance
    pub fn new() -> Self {
        Self
    }
}

impl PrimitiveProvider for ClassicalProvider {
    fn suite(&self) -> AlgorithmSuite {
        AlgorithmSuite {
            kem: "X25519".into(),
            signature: "Ed25519".into(),
        }
    }

    fn kem_keygen(&self) -> Result<KemKeypair> {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = X25519PublicKey::from(&secret);
        Ok(KemKeypair {
            public_key: public.as_bytes().to_vec(),
            private_key: secret.to_bytes().to_vec(),
        })
    }

    fn kem_encapsulate(&self, public_key: &[u8]) -> Result<Encapsulation> {
        let their_public: [u8; X25519_KEY_SIZE] = public_key
            .try_into()
            .map_err(|_| Error::KeyEncapsulationFailed("malformed recipient KEM key".into()))?;
        let their_public = X25519PublicKey::from(their_public);

        let ephemeral = EphemeralSecret::random_from_rng(OsRng);
        let ephemeral_public = X25519PublicKey::from(&ephemeral);
        let dh = ephemeral.diffie_hellman(&their_public);

        Ok(Encapsulation {
            ciphertext: ephemeral_public.as_bytes().to_vec(),
            shared_secret: SharedSecret::new(dh.as_bytes().to_vec()),
        })
    }

    fn kem_decapsulate(&self, private_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret> {
        let secret: [u8; X25519_KEY_SIZE] = private_key
            .try_into()
            .map_err(|_| Error::KeyDecapsulationFailed("malformed KEM private key".into()))?;
        let ephemeral_public: [u8; X25519_KEY_SIZE] = ciphertext
            .try_into()
            .map_err(|_| Error::KeyDecapsulationFailed("malformed KEM ciphertext".into()))?;

        let secret = StaticSecret::from(secret);
        let dh = secret.diffie_hellman(&X25519PublicKey::from(ephemeral_public));

        Ok(SharedSecret::new(dh.as_bytes().to_vec()))
    }

    fn sig_keygen(&self) -> Result<SigKeypair> {
        let signing = ed25519_dalek::SigningKey::generate(&mut OsRng);
        Ok(SigKeypair {
            public_key: signing.verifying_key().to_bytes().to_vec(),
            private_key: signing.to_bytes().to_vec(),
        })
    }

    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        let seed: [u8; 32] = private_key
            .try_into()
            .map_err(|_| Error::SigningFailed("malformed signing key".into()))?;
        let signing = ed25519_dalek::SigningKey::from_bytes(&seed);

        Ok(signing.sign(message).to_bytes().to_vec())
    }

    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
        let public: [u8; 32] = match public_key.try_into() {
            Ok(p) => p,
            Err(_) => return Ok(false),
        };
        let verifying = match VerifyingKey::from_bytes(&public) {
            Ok(v) => v,
            Err(_) => return Ok(false),
        };
        let sig_bytes: [u8; ED25519_SIGNATURE_SIZE] = match signature.try_into() {
            Ok(s) => s,
            Err(_) => return Ok(false),
        };
        let sig = Ed25519Signature::from_bytes(&sig_bytes);

        Ok(verifying.verify(message, &sig).is_ok())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encapsulate_decapsulate_converge() {
        let provider = ClassicalProvider::new();
        let kp = provider.kem_keygen().unwrap();

        assert_eq!(kp.public_key.len(), X25519_KEY_SIZE);

        let enc = provider.kem_encapsulate(&kp.public_key).unwrap();
        assert_eq!(enc.ciphertext.len(), X25519_KEY_SIZE);

        let ss = provider
            .kem_decapsulate(&kp.private_key, &enc.ciphertext)
            .unwrap();
        assert_eq!(ss.as_bytes(), enc.shared_secret.as_bytes());
    }

    #[test]
    fn test_each_encapsulation_is_fresh() {
        let provider = ClassicalProvider::new();
        let kp = provider.kem_keygen().unwrap();

        let enc1 = provider.kem_encapsulate(&kp.public_key).unwrap();
        let enc2 = provider.kem_encapsulate(&kp.public_key).unwrap();

        // Fresh ephemeral per encapsulation: different ciphertexts and secrets
        assert_ne!(enc1.ciphertext, enc2.ciphertext);
        assert_ne!(
            enc1.shared_secret.as_bytes(),
            enc2.shared_secret.as_bytes()
        );
    }

    #[test]
    fn test_sign_verify() {
        let provider = ClassicalProvider::new();
        let kp = provider.sig_keygen().unwrap();

        let sig = provider.sign(&kp.private_key, b"hello").unwrap();
        assert_eq!(sig.len(), ED25519_SIGNATURE_SIZE);

        assert!(provider.verify(&kp.public_key, b"hello", &sig).unwrap());
        assert!(!provider.verify(&kp.public_key, b"tampered", &sig).unwrap());
    }

    #[test]
    fn test_malformed_inputs() {
        let provider = ClassicalProvider::new();

        assert!(matches!(
            provider.kem_encapsulate(&[1, 2, 3]),
            Err(Error::KeyEncapsulationFailed(_))
        ));
        assert!(matches!(
            provider.kem_decapsulate(&[1, 2, 3], &[0u8; 32]),
            Err(Error::KeyDecapsulationFailed(_))
        ));
        assert!(!provider.verify(&[1, 2, 3], b"m", &[0u8; 64]).unwrap());
    }
}
