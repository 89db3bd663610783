//! # Error Handling
//!
//! Error types for Whisper Core.
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
//! │  ├── Validation Errors                                                 │
//! │  │   ├── NoKeyPair             - No key pair loaded                    │
//! │  │   └── MissingPassword       - Empty password supplied               │
//! │  │                                                                      │
//! │  ├── Key Errors                                                        │
//! │  │   ├── InvalidKey            - Invalid key format/length             │
//! │  │   └── KeyDerivationFailed   - PBKDF2/primitive provider error       │
//! │  │                                                                      │
//! │  ├── Crypto Errors                                                     │
//! │  │   ├── EncryptionFailed      - Box or AEAD encryption failed         │
//! │  │   ├── DecryptionFailed      - Envelope failed to authenticate       │
//! │  │   └── AuthenticationFailed  - Wrapped-key tag mismatch              │
//! │  │                                                                      │
//! │  ├── Format Errors                                                     │
//! │  │   ├── InvalidEnvelope       - Malformed transport string            │
//! │  │   └── SerializationError    - JSON encode/decode failure            │
//! │  │                                                                      │
//! │  ├── Directory Errors                                                  │
//! │  │   └── NotFound              - No public key for address             │
//! │  │                                                                      │
//! │  └── Storage Errors                                                    │
//! │      ├── StorageReadError      - Failed to read from the store         │
//! │      └── StorageWriteError     - Failed to write to the store          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Authentication and decryption failures are terminal for that call:
//! retrying identical inputs re-fails deterministically, so no variant here
//! is a retry signal. Error messages never contain key material.

use thiserror::Error;

/// Result type alias for Whisper Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Whisper Core
///
/// All errors are categorized by module/domain to make error handling
/// clearer and to provide meaningful error messages to callers.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Validation Errors (100-199)
    // ========================================================================

    /// No key pair is loaded in the manager
    #[error("No key pair loaded. Generate or import a key pair first.")]
    NoKeyPair,

    /// An empty password was supplied
    #[error("A non-empty password is required.")]
    MissingPassword,

    // ========================================================================
    // Key Errors (200-299)
    // ========================================================================

    /// Invalid key format or length
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Key derivation failed
    #[error("Failed to derive key: {0}")]
    KeyDerivationFailed(String),

    // ========================================================================
    // Crypto Errors (300-399)
    // ========================================================================

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Message envelope failed to authenticate or decrypt
    ///
    /// Deliberately carries no detail: a wrong key and a tampered
    /// ciphertext must be indistinguishable to the caller.
    #[error("Decryption failed")]
    DecryptionFailed,

    /// Wrapped-key authentication failed (wrong password or altered blob)
    #[error("Wrapped key failed to authenticate: wrong password or corrupted data")]
    AuthenticationFailed,

    // ========================================================================
    // Format Errors (400-499)
    // ========================================================================

    /// Malformed envelope transport string
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// JSON serialization or deserialization failure
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Unsupported wrapped-key format version
    #[error("Unsupported wrapped key version: {0}")]
    UnsupportedVersion(u8),

    // ========================================================================
    // Directory Errors (500-599)
    // ========================================================================

    /// No public key registered for the given address
    #[error("No public key registered for address: {0}")]
    NotFound(String),

    // ========================================================================
    // Storage Errors (600-699)
    // ========================================================================

    /// Failed to read from the key store
    #[error("Failed to read from storage: {0}")]
    StorageReadError(String),

    /// Failed to write to the key store
    #[error("Failed to write to storage: {0}")]
    StorageWriteError(String),
}

impl Error {
    /// Get the numeric error code for embedding layers
    ///
    /// Error codes are organized by category:
    /// - 100-199: Validation
    /// - 200-299: Keys
    /// - 300-399: Crypto
    /// - 400-499: Formats
    /// - 500-599: Directory
    /// - 600-699: Storage
    pub fn code(&self) -> i32 {
        match self {
            // Validation (100-199)
            Error::NoKeyPair => 100,
            Error::MissingPassword => 101,

            // Keys (200-299)
            Error::InvalidKey(_) => 200,
            Error::KeyDerivationFailed(_) => 201,

            // Crypto (300-399)
            Error::EncryptionFailed(_) => 300,
            Error::DecryptionFailed => 301,
            Error::AuthenticationFailed => 302,

            // Formats (400-499)
            Error::InvalidEnvelope(_) => 400,
            Error::SerializationError(_) => 401,
            Error::UnsupportedVersion(_) => 402,

            // Directory (500-599)
            Error::NotFound(_) => 500,

            // Storage (600-699)
            Error::StorageReadError(_) => 600,
            Error::StorageWriteError(_) => 601,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================
