//! # Storage Module
//!
//! The persistence seam for key-related state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KEY STORE                                        │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  KeyStore Trait                                                         │
//! │  ──────────────                                                          │
//! │                                                                         │
//! │  • get(key)        - Read a blob, None when absent                     │
//! │  • set(key, value) - Write a blob                                      │
//! │  • delete(key)     - Remove a blob, reporting whether it existed       │
//! │                                                                         │
//! │  Three logical keys:                                                   │
//! │  ┌───────────────────┬─────────────────────────────────────────┐       │
//! │  │ PUBLIC_KEY        │ base64 public key (non-secret)          │       │
//! │  │ FINGERPRINT       │ derived fingerprint (non-secret)        │       │
//! │  │ WRAPPED_KEY       │ password-wrapped secret (JSON blob)     │       │
//! │  └───────────────────┴─────────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no schema version: "none present" (uninitialized) and "all
//! present" (fully initialized) are the only fully-defined states. A public
//! key without a wrapped secret is a legitimate transient state - a freshly
//! generated pair that was never exported.
//!
//! The store is injected into the key pair manager rather than accessed as
//! ambient global state, so multiple identities can coexist and tests are
//! deterministic. Raw secret key bytes are never written through this
//! interface - only the password-wrapped blob.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::error::Result;

/// Logical key names for persisted identity state
pub mod keys {
    /// The base64-encoded public key
    pub const PUBLIC_KEY: &str = "whisper.identity.public-key";

    /// The derived key fingerprint
    pub const FINGERPRINT: &str = "whisper.identity.fingerprint";

    /// The password-wrapped secret key (JSON blob)
    pub const WRAPPED_KEY: &str = "whisper.identity.wrapped-key";
}

/// Durable key-value store for public key, fingerprint, and wrapped secret
///
/// Implementations may be slow or failing I/O; the crypto core treats them
/// as opaque calls and never retries.
pub trait KeyStore {
    /// Read a blob, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write a blob
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove a blob, reporting whether it existed
    fn delete(&self, key: &str) -> Result<bool>;
}

/// In-memory key store for tests and embedding
///
/// Internally synchronized; production deployments back this trait with a
/// platform keychain or database instead.
#[derive(Default)]
pub struct MemoryKeyStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryKeyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write();
        Ok(entries.remove(key).is_some())
    }
}

// ============================================================================
// TESTS
// ============================================================================
