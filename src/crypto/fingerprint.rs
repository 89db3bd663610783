//! # Key Fingerprints
//!
//! Short human-verifiable strings derived from public keys.
//!
//! ## Derivation
//!
//! ```text
//! Public Key (32 bytes)
//!       │
//!       ▼
//! SHA-512 ──► first 8 bytes ──► base64 ──► strip '+' '/' '=' ──► cap at 16
//! ```
//!
//! The fingerprint is a verification aid for at-a-glance key-substitution
//! detection, not a security boundary: the 8-byte truncation deliberately
//! trades collision resistance for readability.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sha2::{Digest, Sha512};

use crate::crypto::keys::KEY_SIZE;

/// Number of hash bytes kept before encoding
const FINGERPRINT_HASH_BYTES: usize = 8;

/// Maximum fingerprint length in characters
const FINGERPRINT_MAX_CHARS: usize = 16;

/// Derive the fingerprint of a public key
///
/// Pure and deterministic: identical input always yields identical output;
/// distinct keys yield distinct fingerprints with overwhelming probability.
pub fn derive_fingerprint(public_key: &[u8; KEY_SIZE]) -> String {
    let hash = Sha512::digest(public_key);
    let encoded = BASE64.encode(&hash[..FINGERPRINT_HASH_BYTES]);

    encoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(FINGERPRINT_MAX_CHARS)
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
