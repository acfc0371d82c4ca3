//! Secure storage backend contract.
//!
//! The keystore persists key bundles through this trait; the production
//! backends are platform keychains/keystores owned by the embedding
//! application and are out of scope here. The in-memory implementation
//! backs tests and development.
//!
//! Values handed back through `retrieve` are `Zeroizing` so private key
//! bytes are wiped when the caller drops them.

use parking_lot::RwLock;
use std::collections::HashMap;
use zeroize::Zeroizing;

use crate::error::Result;

/// Platform-agnostic secure key-value storage
pub trait SecureStore: Send + Sync {
    /// Store a value under a key, replacing any existing value
    fn store(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Retrieve a value; `None` if the key does not exist
    fn retrieve(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>>;

    /// Delete a value; returns whether anything was deleted
    fn delete(&self, key: &str) -> Result<bool>;

    /// Check whether a key exists
    fn exists(&self, key: &str) -> Result<bool>;
}

/// In-memory secure store for development and testing
#[derive(Default)]
pub struct MemoryStore {
    memory: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureStore for MemoryStore {
    fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut storage = self.memory.write();
        storage.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Option<Zeroizing<Vec<u8>>>> {
        let storage = self.memory.read();
        Ok(storage.get(key).cloned().map(Zeroizing::new))
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut storage = self.memory.write();
        Ok(storage.remove(key).is_some())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let storage = self.memory.read();
        Ok(storage.contains_key(key))
    }
}

// ============================================================================
// TESTS
// ============================================================================
