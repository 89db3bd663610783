//! # Key Management
//!
//! X25519 identity key pairs for per-message key agreement.
//!
//! ## Key Material
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        IDENTITY KEY PAIR                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Secret key: 32 bytes (kept secret, zeroized on drop)                  │
//! │  Public key: 32 bytes (shared freely via the directory)                │
//! │                                                                         │
//! │  Invariant: the public key is always recomputable from the secret      │
//! │  key via X25519 scalar multiplication. A stored public key must        │
//! │  match that recomputation.                                             │
//! │                                                                         │
//! │  Purpose:                                                              │
//! │  • Key agreement with peers (X25519 ECDH inside the box construction)  │
//! │  • NOT signing - this is an agreement key, not an identity proof       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use crypto_box::{PublicKey as BoxPublicKey, SecretKey as BoxSecretKey};
use rand::rngs::OsRng;
use zeroize::ZeroizeOnDrop;

use crate::error::{Error, Result};

/// Size of public and secret keys in bytes (256 bits)
pub const KEY_SIZE: usize = 32;

/// X25519 key pair for message encryption
///
/// ## Security
///
/// - The secret key is zeroized when this struct is dropped
/// - The public key can be safely shared with anyone
#[derive(ZeroizeOnDrop)]
pub struct KeyPair {
    /// Private agreement key (secret)
    #[zeroize(skip)] // crypto_box::SecretKey handles its own zeroization
    secret: BoxSecretKey,
    /// Public agreement key (derived from secret)
    #[zeroize(skip)]
    public: BoxPublicKey,
}

impl KeyPair {
    /// Generate a new random key pair
    ///
    /// Uses the operating system's secure random number generator.
    pub fn generate() -> Self {
        let secret = BoxSecretKey::generate(&mut OsRng);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Recompute a key pair from raw secret key bytes (import path)
    ///
    /// This is deterministic: the same secret always produces the same
    /// public key. Whether the recomputed public key must match an
    /// externally expected value is the caller's decision.
    pub fn from_secret_bytes(bytes: &[u8; KEY_SIZE]) -> Self {
        let secret = BoxSecretKey::from(*bytes);
        let public = secret.public_key();
        Self { secret, public }
    }

    /// Get the secret key bytes (for backup/wrapping)
    ///
    /// ## Security Warning
    ///
    /// Only use this for the key vault. Never log or transmit these bytes.
    pub fn secret_bytes(&self) -> [u8; KEY_SIZE] {
        self.secret.to_bytes()
    }

    /// Get the public key bytes
    pub fn public_bytes(&self) -> [u8; KEY_SIZE] {
        *self.public.as_bytes()
    }

    /// Get the public key as a base64 string (directory/wire form)
    pub fn public_base64(&self) -> String {
        encode_public_key(&self.public_bytes())
    }

    /// Get reference to the secret key for box operations
    pub(crate) fn secret(&self) -> &BoxSecretKey {
        &self.secret
    }
}

/// Encode a 32-byte public key as base64 for transport and display
pub fn encode_public_key(bytes: &[u8; KEY_SIZE]) -> String {
    BASE64.encode(bytes)
}

/// Decode a base64-encoded public key, validating its length
pub fn decode_public_key(encoded: &str) -> Result<[u8; KEY_SIZE]> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| Error::InvalidKey(format!("Invalid base64 public key: {}", e)))?;

    bytes.try_into().map_err(|_| {
        Error::InvalidKey(format!("Public key must be {} bytes", KEY_SIZE))
    })
}

// ============================================================================
// TESTS
// ============================================================================
