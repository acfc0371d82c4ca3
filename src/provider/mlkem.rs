//! Post-quantum reference provider: ML-KEM-768 + ML-DSA-65.
//!
//! Backed by the PQClean implementations via the `pqcrypto` crates. This is
//! the reference parameter set: ~1.2KB KEM public keys, ~2.4KB KEM private
//! keys, ~2KB signature public keys, ~4KB signature private keys, at NIST
//! security category 3. The engine never relies on these sizes; they are
//! surfaced here only as constants for tests and capacity planning.

use pqcrypto_mldsa::mldsa65;
use pqcrypto_mlkem::mlkem768;
use pqcrypto_traits::kem::{
    Ciphertext as _, PublicKey as _, SecretKey as _, SharedSecret as _,
};
use pqcrypto_traits::sign::{
    DetachedSignature as _, PublicKey as _, SecretKey as _,
};

use crate::error::{Error, Result};
use crate::provider::{
    AlgorithmSuite, Encapsulation, KemKeypair, PrimitiveProvider, SharedSecret, SigKeypair,
};

/// ML-KEM-768 public key size in bytes
pub const MLKEM_PUBLIC_KEY_SIZE: usize = 1184;
/// ML-KEM-768 secret key size in bytes
pub const MLKEM_SECRET_KEY_SIZE: usize = 2400;
/// ML-KEM-768 ciphertext size in bytes
pub const MLKEM_CIPHERTEXT_SIZE: usize = 1088;
/// ML-KEM-768 shared secret size in bytes
pub const MLKEM_SHARED_SECRET_SIZE: usize = 32;
/// ML-DSA-65 public key size in bytes
pub const MLDSA_PUBLIC_KEY_SIZE: usize = 1952;
/// ML-DSA-65 signature size in bytes
pub const MLDSA_SIGNATURE_SIZE: usize = 3309;

/// Post-quantum primitive provider (ML-KEM-768 + ML-DSA-65)
#[derive(Debug, Default, Clone, Copy)]
pub struct MlKemProvider;

impl MlKemProvider {
    /// Create a new provider instance
    pub fn new() -> Self {
        Self
    }
}

impl PrimitiveProvider for MlKemProvider {
    fn suite(&self) -> AlgorithmSuite {
        AlgorithmSuite {
            kem: "ML-KEM-768".into(),
            signature: "ML-DSA-65".into(),
        }
    }

    fn kem_keygen(&self) -> Result<KemKeypair> {
        let (pk, sk) = mlkem768::keypair();
        Ok(KemKeypair {
            public_key: pk.as_bytes().to_vec(),
            private_key: sk.as_bytes().to_vec(),
        })
    }

    fn kem_encapsulate(&self, public_key: &[u8]) -> Result<Encapsulation> {
        let pk = mlkem768::PublicKey::from_bytes(public_key)
            .map_err(|_| Error::KeyEncapsulationFailed("malformed recipient KEM key".into()))?;

        let (ss, ct) = mlkem768::encapsulate(&pk);

        Ok(Encapsulation {
            ciphertext: ct.as_bytes().to_vec(),
            shared_secret: SharedSecret::new(ss.as_bytes().to_vec()),
        })
    }

    fn kem_decapsulate(&self, private_key: &[u8], ciphertext: &[u8]) -> Result<SharedSecret> {
        let sk = mlkem768::SecretKey::from_bytes(private_key)
            .map_err(|_| Error::KeyDecapsulationFailed("malformed KEM private key".into()))?;
        let ct = mlkem768::Ciphertext::from_bytes(ciphertext)
            .map_err(|_| Error::KeyDecapsulationFailed("malformed KEM ciphertext".into()))?;

        let ss = mlkem768::decapsulate(&ct, &sk);

        Ok(SharedSecret::new(ss.as_bytes().to_vec()))
    }

    fn sig_keygen(&self) -> Result<SigKeypair> {
        let (pk, sk) = mldsa65::keypair();
        Ok(SigKeypair {
            public_key: pk.as_bytes().to_vec(),
            private_key: sk.as_bytes().to_vec(),
        })
    }

    fn sign(&self, private_key: &[u8], message: &[u8]) -> Result<Vec<u8>> {
        let sk = mldsa65::SecretKey::from_bytes(private_key)
            .map_err(|_| Error::SigningFailed("malformed signing key".into()))?;

        let sig = mldsa65::detached_sign(message, &sk);

        Ok(sig.as_bytes().to_vec())
    }

    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
        let pk = match mldsa65::PublicKey::from_bytes(public_key) {
            Ok(pk) => pk,
            Err(_) => return Ok(false),
        };
        let sig = match mldsa65::DetachedSignature::from_bytes(signature) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };

        Ok(mldsa65::verify_detached_signature(&sig, message, &pk).is_ok())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kem_sizes_match_reference_parameter_set() {
        let provider = MlKemProvider::new();
        let kp = provider.kem_keygen().unwrap();

        assert_eq!(kp.public_key.len(), MLKEM_PUBLIC_KEY_SIZE);
        assert_eq!(kp.private_key.len(), MLKEM_SECRET_KEY_SIZE);

        let enc = provider.kem_encapsulate(&kp.public_key).unwrap();
        assert_eq!(enc.ciphertext.len(), MLKEM_CIPHERTEXT_SIZE);
        assert_eq!(enc.shared_secret.as_bytes().len(), MLKEM_SHARED_SECRET_SIZE);
    }

    #[test]
    fn test_encapsulate_decapsulate_converge() {
        let provider = MlKemProvider::new();
        let kp = provider.kem_keygen().unwrap();

        let enc = provider.kem_encapsulate(&kp.public_key).unwrap();
        let ss = provider
            .kem_decapsulate(&kp.private_key, &enc.ciphertext)
            .unwrap();

        assert_eq!(ss.as_bytes(), enc.shared_secret.as_bytes());
    }

    #[test]
    fn test_encapsulate_rejects_malformed_key() {
        let provider = MlKemProvider::new();
        let result = provider.kem_encapsulate(&[0u8; 7]);
        assert!(matches!(result, Err(Error::KeyEncapsulationFailed(_))));
    }

    #[test]
    fn test_sign_verify() {
        let provider = MlKemProvider::new();
        let kp = provider.sig_keygen().unwrap();

        assert_eq!(kp.public_key.len(), MLDSA_PUBLIC_KEY_SIZE);

        let sig = provider.sign(&kp.private_key, b"hello").unwrap();
        assert_eq!(sig.len(), MLDSA_SIGNATURE_SIZE);

        assert!(provider.verify(&kp.public_key, b"hello", &sig).unwrap());
        assert!(!provider.verify(&kp.public_key, b"hell0", &sig).unwrap());
    }

    #[test]
    fn test_verify_malformed_inputs_return_false() {
        let provider = MlKemProvider::new();
        let kp = provider.sig_keygen().unwrap();
        let sig = provider.sign(&kp.private_key, b"hello").unwrap();

        // Truncated key and truncated signature are invalid, not errors
        assert!(!provider.verify(&kp.public_key[..10], b"hello", &sig).unwrap());
        assert!(!provider.verify(&kp.public_key, b"hello", &sig[..10]).unwrap());
    }
}
