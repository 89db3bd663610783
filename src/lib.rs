//! # Whisper Core
//!
//! The cryptographic engine for a two-party encrypted messaging system:
//! identity key management, password-wrapped key backup, and authenticated
//! public-key encryption of message payloads.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       WHISPER CORE MODULES                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────┐      ┌──────────────────┐                        │
//! │  │    Identity      │      │     Crypto       │                        │
//! │  │                  │      │                  │                        │
//! │  │ - KeyPairManager │─────►│ - X25519 keys    │                        │
//! │  │ - Snapshot       │      │ - Fingerprints   │                        │
//! │  │ - Export/Import  │      │ - Message boxes  │                        │
//! │  └────────┬─────────┘      │ - Key vault      │                        │
//! │           │                └──────────────────┘                        │
//! │           ▼                                                            │
//! │  ┌──────────────────┐      ┌──────────────────┐                        │
//! │  │    Storage       │      │    Directory     │                        │
//! │  │                  │      │                  │                        │
//! │  │ - KeyStore trait │      │ - Resolve trait  │                        │
//! │  │ - Memory impl    │      │ - Memory impl    │                        │
//! │  └──────────────────┘      └──────────────────┘                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types for the entire library
//! - [`crypto`] - Cryptographic primitives (keys, fingerprints, boxes, vault)
//! - [`identity`] - Key pair lifecycle over an injected store
//! - [`storage`] - The persistence seam and an in-memory store
//! - [`directory`] - Address-to-public-key resolution seam
//!
//! ## Security Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          SECURITY LAYERS                                │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Message Confidentiality & Integrity (X25519 + XSalsa20-Poly1305)      │
//! │  ───────────────────────────────────────────────────────────────        │
//! │  Every message is boxed between the sender's secret key and the        │
//! │  recipient's public key with a fresh 24-byte random nonce. Tampering   │
//! │  is detected by the Poly1305 tag; decryption fails closed.             │
//! │                                                                         │
//! │  Key Backup (PBKDF2 + AES-256-GCM)                                     │
//! │  ──────────────────────────────────                                     │
//! │  The secret key only leaves memory wrapped under a password-derived    │
//! │  key with a per-export random salt. Wrong passwords and altered        │
//! │  blobs are rejected by the GCM tag.                                    │
//! │                                                                         │
//! │  Key Verification (Fingerprints)                                       │
//! │  ────────────────────────────────                                       │
//! │  Public keys delivered by the directory are trusted as delivered;      │
//! │  short fingerprints let users detect key substitution out of band.     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Execution Model
//!
//! All core operations are synchronous and deterministic apart from one
//! call to the OS CSPRNG per key, nonce, or salt. None perform I/O beyond
//! the injected store, and none retry: a failed authentication re-fails
//! deterministically on identical inputs.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod crypto;
pub mod directory;
pub mod error;
pub mod identity;
pub mod storage;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use crypto::{EncryptedEnvelope, KeyPair, WrappedKey};
pub use directory::{Directory, MemoryDirectory};
pub use error::{Error, Result};
pub use identity::{IdentitySnapshot, KeyPairManager};
pub use storage::{KeyStore, MemoryKeyStore};

/// Returns the version of Whisper Core
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
