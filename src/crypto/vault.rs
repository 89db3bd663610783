//! # Key Vault
//!
//! Password-based wrapping of secret keys for export/backup.
//!
//! ## Wrapping Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        KEY WRAPPING FLOW                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Step 1: Derive Wrapping Key (deliberately slow)                       │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  PBKDF2-HMAC-SHA256(                                         │       │
//! │  │    password = user password,                                 │       │
//! │  │    salt = 16 random bytes (fresh per export),                │       │
//! │  │    iterations = 100,000                                      │       │
//! │  │  )                                                           │       │
//! │  │           ↓                                                   │       │
//! │  │  256-bit AES key                                             │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  Step 2: Encrypt                                                       │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  AES-256-GCM(key, iv = 12 random bytes, secret key bytes)   │       │
//! │  │           ↓                                                   │       │
//! │  │  Ciphertext + 16-byte auth tag                               │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  Output: WrappedKey { version, salt, iv, data }                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unwrapping re-derives the identical key from the stored salt and
//! authenticates-then-decrypts. A wrong password or an altered blob fails
//! closed with an authentication error - corrupted plaintext is never
//! returned.
//!
//! The format carries an explicit version and a per-export random salt.
//! Earlier designs in this space used a single fixed salt for all users,
//! which forfeits per-user protection against precomputed dictionary
//! attacks; the random salt closes that hole.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce as AesNonce,
};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::keys::KEY_SIZE;
use crate::error::{Error, Result};

/// PBKDF2 iteration count for the wrapping key
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Size of the per-export random salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of the AES-GCM initialization vector in bytes (96 bits)
pub const IV_SIZE: usize = 12;

/// Current wrapped-key format version
pub const WRAPPED_KEY_VERSION: u8 = 1;

/// A secret key encrypted under a password-derived key
///
/// Byte vectors serialize as arrays of 0-255 integers in JSON, so an export
/// looks like:
///
/// ```json
/// { "version": 1, "salt": [12, 200, ...], "iv": [31, 7, ...], "data": [...] }
/// ```
///
/// Any export from one instance imports correctly on any compliant instance
/// using the same algorithm parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WrappedKey {
    /// Format version for future algorithm upgrades
    pub version: u8,

    /// Per-export random PBKDF2 salt (16 bytes)
    pub salt: Vec<u8>,

    /// AES-GCM initialization vector (12 bytes)
    pub iv: Vec<u8>,

    /// Ciphertext plus 16-byte authentication tag
    pub data: Vec<u8>,
}

impl WrappedKey {
    /// Encode as a JSON string for the user to save
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode from a previously exported JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Derive the 256-bit wrapping key from a password and salt
fn derive_wrapping_key(password: &str, salt: &[u8]) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Wrap a secret key under a user password
///
/// Generates a fresh random salt and IV on every call, so wrapping the same
/// secret twice produces unrelated blobs.
pub fn wrap_key(secret: &[u8; KEY_SIZE], password: &str) -> Result<WrappedKey> {
    if password.is_empty() {
        return Err(Error::MissingPassword);
    }

    let mut salt = [0u8; SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);

    let mut iv = [0u8; IV_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut iv);

    let mut wrapping_key = derive_wrapping_key(password, &salt);
    let cipher = Aes256Gcm::new_from_slice(&wrapping_key)
        .map_err(|e| Error::KeyDerivationFailed(format!("Invalid wrapping key: {}", e)))?;
    wrapping_key.zeroize();

    let data = cipher
        .encrypt(AesNonce::from_slice(&iv), secret.as_slice())
        .map_err(|_| Error::EncryptionFailed("key wrapping failed".into()))?;

    Ok(WrappedKey {
        version: WRAPPED_KEY_VERSION,
        salt: salt.to_vec(),
        iv: iv.to_vec(),
        data,
    })
}

/// Unwrap a secret key with the password it was wrapped under
///
/// ## Errors
///
/// - `UnsupportedVersion` for a format this build does not understand
/// - `AuthenticationFailed` whenever the password is wrong or the blob was
///   altered - never corrupted plaintext
pub fn unwrap_key(wrapped: &WrappedKey, password: &str) -> Result<Zeroizing<[u8; KEY_SIZE]>> {
    if password.is_empty() {
        return Err(Error::MissingPassword);
    }

    if wrapped.version != WRAPPED_KEY_VERSION {
        return Err(Error::UnsupportedVersion(wrapped.version));
    }

    if wrapped.iv.len() != IV_SIZE {
        return Err(Error::InvalidKey(format!(
            "IV must be {} bytes, got {}",
            IV_SIZE,
            wrapped.iv.len()
        )));
    }

    let mut wrapping_key = derive_wrapping_key(password, &wrapped.salt);
    let cipher = Aes256Gcm::new_from_slice(&wrapping_key)
        .map_err(|e| Error::KeyDerivationFailed(format!("Invalid wrapping key: {}", e)))?;
    wrapping_key.zeroize();

    let plaintext = cipher
        .decrypt(AesNonce::from_slice(&wrapped.iv), wrapped.data.as_slice())
        .map_err(|_| Error::AuthenticationFailed)?;

    let secret: [u8; KEY_SIZE] = plaintext
        .as_slice()
        .try_into()
        .map_err(|_| Error::InvalidKey("Wrapped payload is not a 32-byte key".into()))?;

    Ok(Zeroizing::new(secret))
}

// ============================================================================
// TESTS
// ============================================================================
