//! # Cryptography Module
//!
//! All cryptographic primitives used by Whisper Core.
//!
//! ## Security Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 MESSAGE ENCRYPTION                              │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  X25519 + XSalsa20-Poly1305 ("box" construction)               │   │
//! │  │  ─────────────────────────────────────────────────              │   │
//! │  │                                                                 │   │
//! │  │  1. Key Agreement: X25519 ECDH                                 │   │
//! │  │     Sender's Secret × Recipient's Public = Shared Secret      │   │
//! │  │                                                                 │   │
//! │  │  2. Encryption: XSalsa20-Poly1305                              │   │
//! │  │     • 192-bit nonce (random per message)                       │   │
//! │  │     • 128-bit authentication tag                               │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 KEY WRAPPING (BACKUP)                           │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  PBKDF2-HMAC-SHA256 (100,000 rounds, random salt)              │   │
//! │  │           ↓                                                      │   │
//! │  │  AES-256-GCM (random 96-bit IV, 128-bit tag)                   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithm Choices & Rationale
//!
//! | Algorithm | Purpose | Why Chosen |
//! |-----------|---------|------------|
//! | X25519 | Key Agreement | Fast ECDH, small keys, widely audited |
//! | XSalsa20-Poly1305 | Message AEAD | 192-bit nonce safe for random use |
//! | AES-256-GCM | Key Wrapping | Hardware acceleration, AEAD |
//! | PBKDF2-SHA256 | Password KDF | Deliberately slow, standard |
//! | SHA-512 | Fingerprints | Truncation-friendly, nacl-compatible |
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: secret keys and derived keys are zeroized
//! 2. **Secure Random**: `rand::rngs::OsRng` for all keys, nonces, salts
//! 3. **No Nonce Reuse**: unique random nonces for every encryption call

mod fingerprint;
mod keys;
mod message;
pub mod vault;

pub use fingerprint::derive_fingerprint;
pub use keys::{decode_public_key, encode_public_key, KeyPair, KEY_SIZE};
pub use message::{
    decrypt_message, encrypt_message, EncryptedEnvelope, NONCE_SIZE, TAG_SIZE,
};
pub use vault::{unwrap_key, wrap_key, WrappedKey, PBKDF2_ITERATIONS};
