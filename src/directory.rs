//! # Directory
//!
//! Resolution of identity addresses to registered public keys.
//!
//! The directory is an external collaborator: the production lookup lives
//! behind an API client, and this crate only defines the seam plus an
//! in-memory implementation for tests and embedding. Public keys are
//! trusted as delivered - the fingerprint exists so users can verify them
//! out of band.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::crypto::KEY_SIZE;
use crate::error::{Error, Result};

/// Maps an identity address to its currently registered public key
pub trait Directory {
    /// Resolve an address to its public key, `NotFound` on a miss
    fn resolve(&self, address: &str) -> Result<[u8; KEY_SIZE]>;
}

/// In-memory directory for tests and embedding
///
/// Addresses are case-insensitive; re-registering an address replaces its
/// key, matching the backing service's upsert semantics.
#[derive(Default)]
pub struct MemoryDirectory {
    entries: RwLock<HashMap<String, [u8; KEY_SIZE]>>,
}

impl MemoryDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the public key for an address
    pub fn register(&self, address: &str, public_key: [u8; KEY_SIZE]) {
        let mut entries = self.entries.write();
        entries.insert(address.to_lowercase(), public_key);
    }
}

impl Directory for MemoryDirectory {
    fn resolve(&self, address: &str) -> Result<[u8; KEY_SIZE]> {
        let entries = self.entries.read();
        entries
            .get(&address.to_lowercase())
            .copied()
            .ok_or_else(|| Error::NotFound(address.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KeyPair;

    #[test]
    fn test_register_resolve() {
        let directory = MemoryDirectory::new();
        let kp = KeyPair::generate();

        directory.register("alice@example", kp.public_bytes());

        let resolved = directory.resolve("alice@example").unwrap();
        assert_eq!(resolved, kp.public_bytes());
    }

    #[test]
    fn test_addresses_case_insensitive() {
        let directory = MemoryDirectory::new();
        let kp = KeyPair::generate();

        directory.register("Alice@Example", kp.public_bytes());

        assert_eq!(
            directory.resolve("alice@example").unwrap(),
            kp.public_bytes()
        );
    }

    #[test]
    fn test_reregistration_replaces_key() {
        let directory = MemoryDirectory::new();
        let old = KeyPair::generate();
        let new = KeyPair::generate();

        directory.register("alice", old.public_bytes());
        directory.register("alice", new.public_bytes());

        assert_eq!(directory.resolve("alice").unwrap(), new.public_bytes());
    }

    #[test]
    fn test_unknown_address_not_found() {
        let directory = MemoryDirectory::new();

        let result = directory.resolve("nobody");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
