//! # Identity Module
//!
//! Identity key pair lifecycle: generation, backup, restore, and clearing.
//!
//! ## Lifecycle
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     IDENTITY KEY LIFECYCLE                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  generate()                                                             │
//! │  ┌─────────────┐                                                        │
//! │  │ fresh X25519│──► persist public key + fingerprint                    │
//! │  │ key pair    │──► never the secret                                    │
//! │  └─────────────┘                                                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  export(password)                                                       │
//! │  ┌─────────────┐                                                        │
//! │  │ wrap secret │──► persist wrapped blob, mark stored                   │
//! │  │ (key vault) │                                                        │
//! │  └─────────────┘                                                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  import(wrapped, password)     ← possibly on another device             │
//! │  ┌─────────────┐                                                        │
//! │  │ unwrap,     │──► recompute public key from the secret                │
//! │  │ recompute   │──► persist all three entries                           │
//! │  └─────────────┘                                                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  clear()                                                                │
//! │  ┌─────────────┐                                                        │
//! │  │ wipe memory │──► delete all persisted entries (idempotent)           │
//! │  └─────────────┘                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The manager is a pure engine: state is observed through an explicit
//! [`IdentitySnapshot`] and changed through explicit operations. Persistence
//! goes through an injected [`KeyStore`]; there is no ambient global state
//! and no coupling to any presentation layer.
//!
//! The in-memory key pair is a single mutable slot. The manager does not
//! guarantee internal thread safety - callers serialize concurrent mutation.

use zeroize::Zeroizing;

use crate::crypto::{
    decode_public_key, decrypt_message, derive_fingerprint, encrypt_message, unwrap_key,
    wrap_key, KeyPair, WrappedKey, KEY_SIZE,
};
use crate::error::{Error, Result};
use crate::storage::{keys, KeyStore};

/// Point-in-time view of the identity state
///
/// Contains no secret material; safe to hand to any calling layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySnapshot {
    /// Whether a key pair is currently loaded in memory
    pub has_key_pair: bool,

    /// Base64-encoded public key, when known
    pub public_key: Option<String>,

    /// Derived fingerprint, when known
    pub fingerprint: Option<String>,

    /// Whether a password-wrapped secret is persisted
    pub is_stored: bool,
}

/// Owns the in-memory identity key pair and its persisted projection
pub struct KeyPairManager<S: KeyStore> {
    store: S,
    key_pair: Option<KeyPair>,
    public_key: Option<String>,
    fingerprint: Option<String>,
    is_stored: bool,
}

impl<S: KeyStore> KeyPairManager<S> {
    /// Create a manager over a store, hydrating any persisted public state
    ///
    /// A previously persisted public key and fingerprint are restored; the
    /// secret stays absent until the wrapped blob is imported with its
    /// password. Partial presence is tolerated: a public key without a
    /// wrapped secret is simply a pair that was never exported.
    pub fn new(store: S) -> Result<Self> {
        let public_key = match store.get(keys::PUBLIC_KEY)? {
            Some(bytes) => {
                let encoded = String::from_utf8(bytes).map_err(|_| {
                    Error::StorageReadError("Stored public key is not valid UTF-8".into())
                })?;
                // Validate before trusting persisted state
                decode_public_key(&encoded)?;
                Some(encoded)
            }
            None => None,
        };

        let fingerprint = match store.get(keys::FINGERPRINT)? {
            Some(bytes) => Some(String::from_utf8(bytes).map_err(|_| {
                Error::StorageReadError("Stored fingerprint is not valid UTF-8".into())
            })?),
            None => None,
        };

        let is_stored = store.get(keys::WRAPPED_KEY)?.is_some();

        if public_key.is_some() {
            tracing::debug!(stored = is_stored, "hydrated identity public state");
        }

        Ok(Self {
            store,
            key_pair: None,
            public_key,
            fingerprint,
            is_stored,
        })
    }

    /// Generate a fresh identity key pair
    ///
    /// Replaces any previously held pair, persists the public key and
    /// fingerprint (never the secret), and removes any stale wrapped blob -
    /// a blob from a previous pair can never unwrap to the new secret.
    pub fn generate(&mut self) -> Result<IdentitySnapshot> {
        let key_pair = KeyPair::generate();
        self.install(key_pair)?;

        self.store.delete(keys::WRAPPED_KEY)?;
        self.is_stored = false;

        tracing::info!(
            fingerprint = self.fingerprint.as_deref().unwrap_or(""),
            "generated new identity key pair"
        );
        Ok(self.snapshot())
    }

    /// Load a key pair from raw secret bytes, recomputing its public key
    ///
    /// Whether the recomputed public key must match an externally expected
    /// value is the caller's decision; this operation only guarantees the
    /// recomputation is correct. Any stale wrapped blob is removed.
    pub fn import_secret(&mut self, secret: &[u8; KEY_SIZE]) -> Result<IdentitySnapshot> {
        let key_pair = KeyPair::from_secret_bytes(secret);
        self.install(key_pair)?;

        self.store.delete(keys::WRAPPED_KEY)?;
        self.is_stored = false;

        tracing::info!("imported identity key pair from raw secret");
        Ok(self.snapshot())
    }

    /// Wrap the current secret key under a password and persist the blob
    ///
    /// Returns the wrapped key for the caller to export (for example as
    /// JSON via [`WrappedKey::to_json`]).
    pub fn export(&mut self, password: &str) -> Result<WrappedKey> {
        let key_pair = self.key_pair.as_ref().ok_or(Error::NoKeyPair)?;

        let secret = Zeroizing::new(key_pair.secret_bytes());
        let wrapped = wrap_key(&secret, password)?;

        self.store
            .set(keys::WRAPPED_KEY, wrapped.to_json()?.as_bytes())?;
        self.is_stored = true;

        tracing::info!("exported wrapped identity key");
        Ok(wrapped)
    }

    /// Restore a key pair from a wrapped blob and its password
    ///
    /// Unwraps the secret, recomputes the matching public key, and persists
    /// all three entries. Fails without touching state when the password is
    /// wrong or the blob was altered.
    pub fn import(&mut self, wrapped: &WrappedKey, password: &str) -> Result<IdentitySnapshot> {
        let secret = unwrap_key(wrapped, password)?;
        let key_pair = KeyPair::from_secret_bytes(&secret);
        self.install(key_pair)?;

        self.store
            .set(keys::WRAPPED_KEY, wrapped.to_json()?.as_bytes())?;
        self.is_stored = true;

        tracing::info!(
            fingerprint = self.fingerprint.as_deref().unwrap_or(""),
            "imported wrapped identity key"
        );
        Ok(self.snapshot())
    }

    /// Wipe in-memory key material and all persisted entries
    ///
    /// Idempotent: clearing an already-clear manager is a no-op.
    pub fn clear(&mut self) -> Result<()> {
        self.key_pair = None;
        self.public_key = None;
        self.fingerprint = None;
        self.is_stored = false;

        self.store.delete(keys::PUBLIC_KEY)?;
        self.store.delete(keys::FINGERPRINT)?;
        self.store.delete(keys::WRAPPED_KEY)?;

        tracing::info!("cleared identity keys");
        Ok(())
    }

    /// Observe the current state
    pub fn snapshot(&self) -> IdentitySnapshot {
        IdentitySnapshot {
            has_key_pair: self.key_pair.is_some(),
            public_key: self.public_key.clone(),
            fingerprint: self.fingerprint.clone(),
            is_stored: self.is_stored,
        }
    }

    /// Encrypt a message to a recipient's public key with the held pair
    pub fn encrypt_to(
        &self,
        plaintext: &str,
        recipient_public: &[u8; KEY_SIZE],
    ) -> Result<String> {
        let key_pair = self.key_pair.as_ref().ok_or(Error::NoKeyPair)?;
        encrypt_message(plaintext, recipient_public, key_pair)
    }

    /// Decrypt an envelope from a sender's public key with the held pair
    pub fn decrypt_from(
        &self,
        transport: &str,
        sender_public: &[u8; KEY_SIZE],
    ) -> Result<String> {
        let key_pair = self.key_pair.as_ref().ok_or(Error::NoKeyPair)?;
        decrypt_message(transport, sender_public, key_pair)
    }

    /// Get the held public key bytes
    pub fn public_bytes(&self) -> Result<[u8; KEY_SIZE]> {
        self.key_pair
            .as_ref()
            .map(KeyPair::public_bytes)
            .ok_or(Error::NoKeyPair)
    }

    /// Install a key pair in the memory slot and persist its public half
    fn install(&mut self, key_pair: KeyPair) -> Result<()> {
        let public = key_pair.public_base64();
        let fingerprint = derive_fingerprint(&key_pair.public_bytes());

        self.store.set(keys::PUBLIC_KEY, public.as_bytes())?;
        self.store.set(keys::FINGERPRINT, fingerprint.as_bytes())?;

        self.key_pair = Some(key_pair);
        self.public_key = Some(public);
        self.fingerprint = Some(fingerprint);
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Directory, MemoryDirectory};
    use crate::storage::MemoryKeyStore;

    fn manager() -> KeyPairManager<MemoryKeyStore> {
        KeyPairManager::new(MemoryKeyStore::new()).unwrap()
    }

    #[test]
    fn test_fresh_manager_is_empty() {
        let m = manager();
        let snapshot = m.snapshot();

        assert!(!snapshot.has_key_pair);
        assert!(snapshot.public_key.is_none());
        assert!(snapshot.fingerprint.is_none());
        assert!(!snapshot.is_stored);
    }

    #[test]
    fn test_generate_persists_public_state_only() {
        let store = MemoryKeyStore::new();
        let mut m = KeyPairManager::new(store).unwrap();

        let snapshot = m.generate().unwrap();

        assert!(snapshot.has_key_pair);
        assert!(snapshot.public_key.is_some());
        assert!(snapshot.fingerprint.is_some());
        assert!(!snapshot.is_stored);

        // The secret never hits the store unwrapped: only the public key
        // and fingerprint entries exist after generation
        assert!(m.store.get(keys::PUBLIC_KEY).unwrap().is_some());
        assert!(m.store.get(keys::FINGERPRINT).unwrap().is_some());
        assert!(m.store.get(keys::WRAPPED_KEY).unwrap().is_none());
    }

    #[test]
    fn test_generate_replaces_previous_pair() {
        let mut m = manager();

        let first = m.generate().unwrap();
        let second = m.generate().unwrap();

        assert_ne!(first.public_key, second.public_key);
        assert_ne!(first.fingerprint, second.fingerprint);
    }

    #[test]
    fn test_generate_discards_stale_wrapped_blob() {
        let mut m = manager();

        m.generate().unwrap();
        m.export("hunter2").unwrap();
        assert!(m.snapshot().is_stored);

        // The old blob can never unwrap to the new secret
        m.generate().unwrap();
        assert!(!m.snapshot().is_stored);
        assert!(m.store.get(keys::WRAPPED_KEY).unwrap().is_none());
    }

    #[test]
    fn test_export_requires_key_pair() {
        let mut m = manager();
        assert!(matches!(m.export("hunter2"), Err(Error::NoKeyPair)));
    }

    #[test]
    fn test_export_import_round_trip_across_managers() {
        let mut alice = manager();
        let original = alice.generate().unwrap();
        let wrapped = alice.export("hunter2").unwrap();

        // Restore on a fresh manager with a fresh store
        let mut restored = manager();
        let snapshot = restored.import(&wrapped, "hunter2").unwrap();

        assert_eq!(snapshot.public_key, original.public_key);
        assert_eq!(snapshot.fingerprint, original.fingerprint);
        assert!(snapshot.is_stored);
    }

    #[test]
    fn test_import_wrong_password_leaves_state_untouched() {
        let mut alice = manager();
        alice.generate().unwrap();
        let wrapped = alice.export("correct").unwrap();

        let mut other = manager();
        let before = other.snapshot();

        let result = other.import(&wrapped, "wrong");
        assert!(matches!(result, Err(Error::AuthenticationFailed)));
        assert_eq!(other.snapshot(), before);
    }

    #[test]
    fn test_import_secret_recomputes_public_key() {
        let mut m = manager();
        let generated = m.generate().unwrap();
        let secret = m.key_pair.as_ref().unwrap().secret_bytes();

        let mut other = manager();
        let imported = other.import_secret(&secret).unwrap();

        assert_eq!(imported.public_key, generated.public_key);
        assert_eq!(imported.fingerprint, generated.fingerprint);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut m = manager();
        m.generate().unwrap();
        m.export("hunter2").unwrap();

        m.clear().unwrap();
        m.clear().unwrap();

        let snapshot = m.snapshot();
        assert!(!snapshot.has_key_pair);
        assert!(snapshot.public_key.is_none());
        assert!(snapshot.fingerprint.is_none());
        assert!(!snapshot.is_stored);

        assert!(m.store.get(keys::PUBLIC_KEY).unwrap().is_none());
        assert!(m.store.get(keys::FINGERPRINT).unwrap().is_none());
        assert!(m.store.get(keys::WRAPPED_KEY).unwrap().is_none());
    }

    #[test]
    fn test_hydration_restores_public_half() {
        let store = MemoryKeyStore::new();
        let original;
        {
            let mut m = KeyPairManager::new(MemoryKeyStore::new()).unwrap();
            original = m.generate().unwrap();
            store
                .set(keys::PUBLIC_KEY, original.public_key.as_ref().unwrap().as_bytes())
                .unwrap();
            store
                .set(
                    keys::FINGERPRINT,
                    original.fingerprint.as_ref().unwrap().as_bytes(),
                )
                .unwrap();
        }

        // A new process over the same store sees the public half, but has
        // no secret until the wrapped blob is imported
        let m = KeyPairManager::new(store).unwrap();
        let snapshot = m.snapshot();

        assert!(!snapshot.has_key_pair);
        assert_eq!(snapshot.public_key, original.public_key);
        assert_eq!(snapshot.fingerprint, original.fingerprint);
        assert!(!snapshot.is_stored);
    }

    #[test]
    fn test_message_operations_require_key_pair() {
        let m = manager();
        let peer = KeyPair::generate();

        assert!(matches!(
            m.encrypt_to("hi", &peer.public_bytes()),
            Err(Error::NoKeyPair)
        ));
        assert!(matches!(
            m.decrypt_from("irrelevant", &peer.public_bytes()),
            Err(Error::NoKeyPair)
        ));
    }

    #[test]
    fn test_end_to_end_alice_and_bob() {
        // Alice and Bob each generate a pair and register with the directory
        let directory = MemoryDirectory::new();

        let mut alice = manager();
        alice.generate().unwrap();
        directory.register("alice", alice.public_bytes().unwrap());

        let mut bob = manager();
        bob.generate().unwrap();
        directory.register("bob", bob.public_bytes().unwrap());

        // Alice resolves Bob's key and encrypts; the opaque envelope string
        // is "stored" and later "fetched" by Bob
        let bob_public = directory.resolve("bob").unwrap();
        let stored_envelope = alice.encrypt_to("hello bob", &bob_public).unwrap();

        // Bob resolves Alice's key and decrypts
        let alice_public = directory.resolve("alice").unwrap();
        let plaintext = bob.decrypt_from(&stored_envelope, &alice_public).unwrap();

        assert_eq!(plaintext, "hello bob");
    }
}
