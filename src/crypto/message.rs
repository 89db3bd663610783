//! # Message Encryption
//!
//! Authenticated public-key encryption of individual message payloads.
//!
//! ## Encryption Flow
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      MESSAGE ENCRYPTION FLOW                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SENDER (Alice)                                                        │
//! │  ─────────────────────────────────────────────────────────────────      │
//! │                                                                         │
//! │  Step 1: Fresh Nonce (unique per message)                              │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  Random 24 bytes from CSPRNG                                 │       │
//! │  │  (Never derived from a counter, never reused!)               │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  Step 2: Box                                                           │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  box(                                                        │       │
//! │  │    plaintext,                                                │       │
//! │  │    nonce,                                                    │       │
//! │  │    recipient_public × sender_secret  (X25519)               │       │
//! │  │  )                                                          │       │
//! │  │           ↓                                                  │       │
//! │  │  XSalsa20-Poly1305 ciphertext + 16-byte tag                 │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! │  Step 3: Envelope                                                      │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │  { "nonce": base64(nonce), "box": base64(ciphertext‖tag) }  │       │
//! │  │           ↓                                                  │       │
//! │  │  base64(JSON)  →  one opaque transport string               │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The recipient runs the same key agreement with the roles swapped, then
//! authenticates-then-decrypts. A wrong key and a tampered ciphertext are
//! indistinguishable to the caller, to avoid leaking an oracle.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use crypto_box::{
    aead::{Aead, AeadCore, OsRng},
    Nonce, PublicKey as BoxPublicKey, SalsaBox,
};
use serde::{Deserialize, Serialize};

use crate::crypto::keys::{KeyPair, KEY_SIZE};
use crate::error::{Error, Result};

/// Size of the box nonce in bytes (192 bits)
pub const NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag in bytes (128 bits)
pub const TAG_SIZE: usize = 16;

/// One encrypted message: a random nonce plus ciphertext-with-tag
///
/// Serialized as JSON with independently base64-encoded fields, then the
/// whole JSON further base64-encoded into a single opaque transport string.
/// This nested shape is the deployed wire format and must be preserved for
/// interoperability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncryptedEnvelope {
    /// Base64-encoded 24-byte nonce
    pub nonce: String,

    /// Base64-encoded ciphertext plus 16-byte tag
    #[serde(rename = "box")]
    pub body: String,
}

impl EncryptedEnvelope {
    /// Encode as the single opaque transport string
    pub fn to_transport_string(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(BASE64.encode(json.as_bytes()))
    }

    /// Decode from the opaque transport string
    pub fn from_transport_string(transport: &str) -> Result<Self> {
        let json = BASE64
            .decode(transport)
            .map_err(|e| Error::InvalidEnvelope(format!("Invalid base64: {}", e)))?;

        serde_json::from_slice(&json)
            .map_err(|e| Error::InvalidEnvelope(format!("Invalid structure: {}", e)))
    }
}

/// Encrypt a message for a recipient
///
/// Draws a fresh 24-byte random nonce on every call and performs the
/// X25519 + XSalsa20-Poly1305 box construction between the sender's secret
/// key and the recipient's public key.
///
/// ## Returns
///
/// The opaque envelope transport string.
pub fn encrypt_message(
    plaintext: &str,
    recipient_public: &[u8; KEY_SIZE],
    sender: &KeyPair,
) -> Result<String> {
    let recipient = BoxPublicKey::from(*recipient_public);
    let salsa_box = SalsaBox::new(&recipient, sender.secret());

    let nonce = SalsaBox::generate_nonce(&mut OsRng);
    let ciphertext = salsa_box
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| Error::EncryptionFailed("box encryption failed".into()))?;

    let envelope = EncryptedEnvelope {
        nonce: BASE64.encode(nonce),
        body: BASE64.encode(&ciphertext),
    };

    envelope.to_transport_string()
}

/// Decrypt a message from a sender
///
/// ## Errors
///
/// Returns `DecryptionFailed` whenever authentication fails. The error is
/// identical for a wrong key and a tampered ciphertext.
pub fn decrypt_message(
    transport: &str,
    sender_public: &[u8; KEY_SIZE],
    recipient: &KeyPair,
) -> Result<String> {
    let envelope = EncryptedEnvelope::from_transport_string(transport)?;

    let nonce_bytes = BASE64
        .decode(&envelope.nonce)
        .map_err(|e| Error::InvalidEnvelope(format!("Invalid nonce encoding: {}", e)))?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(Error::InvalidEnvelope(format!(
            "Nonce must be {} bytes, got {}",
            NONCE_SIZE,
            nonce_bytes.len()
        )));
    }

    let ciphertext = BASE64
        .decode(&envelope.body)
        .map_err(|e| Error::InvalidEnvelope(format!("Invalid box encoding: {}", e)))?;

    let sender = BoxPublicKey::from(*sender_public);
    let salsa_box = SalsaBox::new(&sender, recipient.secret());

    let plaintext = salsa_box
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
        .map_err(|_| Error::DecryptionFailed)?;

    String::from_utf8(plaintext)
        .map_err(|_| Error::InvalidEnvelope("Plaintext is not valid UTF-8".into()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn pair() -> (KeyPair, KeyPair) {
        (KeyPair::generate(), KeyPair::generate())
    }

    #[test]
    fn test_round_trip_basic() {
        let (alice, bob) = pair();

        let transport = encrypt_message("hello bob", &bob.public_bytes(), &alice).unwrap();
        let plaintext = decrypt_message(&transport, &alice.public_bytes(), &bob).unwrap();

        assert_eq!(plaintext, "hello bob");
    }

    #[test]
    fn test_round_trip_empty_string() {
        let (alice, bob) = pair();

        let transport = encrypt_message("", &bob.public_bytes(), &alice).unwrap();
        let plaintext = decrypt_message(&transport, &alice.public_bytes(), &bob).unwrap();

        assert_eq!(plaintext, "");
    }

    #[test]
    fn test_round_trip_multibyte_text() {
        let (alice, bob) = pair();
        let message = "héllo wörld — 你好, мир 🦀";

        let transport = encrypt_message(message, &bob.public_bytes(), &alice).unwrap();
        let plaintext = decrypt_message(&transport, &alice.public_bytes(), &bob).unwrap();

        assert_eq!(plaintext, message);
    }

    #[test]
    fn test_round_trip_large_text() {
        let (alice, bob) = pair();

        // ~10 KB of random but valid UTF-8 text
        let mut rng = rand::thread_rng();
        let mut bytes = vec![0u8; 10 * 1024];
        rng.fill_bytes(&mut bytes);
        let message: String = bytes.iter().map(|b| (b'a' + (b % 26)) as char).collect();

        let transport = encrypt_message(&message, &bob.public_bytes(), &alice).unwrap();
        let plaintext = decrypt_message(&transport, &alice.public_bytes(), &bob).unwrap();

        assert_eq!(plaintext, message);
    }

    #[test]
    fn test_nonce_fresh_per_call() {
        let (alice, bob) = pair();

        let t1 = encrypt_message("same message", &bob.public_bytes(), &alice).unwrap();
        let t2 = encrypt_message("same message", &bob.public_bytes(), &alice).unwrap();

        let e1 = EncryptedEnvelope::from_transport_string(&t1).unwrap();
        let e2 = EncryptedEnvelope::from_transport_string(&t2).unwrap();

        assert_ne!(e1.nonce, e2.nonce);
        assert_ne!(e1.body, e2.body);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let (alice, bob) = pair();

        let transport = encrypt_message("attack at dawn", &bob.public_bytes(), &alice).unwrap();
        let mut envelope = EncryptedEnvelope::from_transport_string(&transport).unwrap();

        // Flip one bit in the ciphertext
        let mut body = BASE64.decode(&envelope.body).unwrap();
        body[0] ^= 0x01;
        envelope.body = BASE64.encode(&body);

        let tampered = envelope.to_transport_string().unwrap();
        let result = decrypt_message(&tampered, &alice.public_bytes(), &bob);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_tampered_nonce_fails() {
        let (alice, bob) = pair();

        let transport = encrypt_message("attack at dawn", &bob.public_bytes(), &alice).unwrap();
        let mut envelope = EncryptedEnvelope::from_transport_string(&transport).unwrap();

        let mut nonce = BASE64.decode(&envelope.nonce).unwrap();
        nonce[NONCE_SIZE - 1] ^= 0x80;
        envelope.nonce = BASE64.encode(&nonce);

        let tampered = envelope.to_transport_string().unwrap();
        let result = decrypt_message(&tampered, &alice.public_bytes(), &bob);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_every_ciphertext_bit_matters() {
        let (alice, bob) = pair();

        let transport = encrypt_message("short", &bob.public_bytes(), &alice).unwrap();
        let envelope = EncryptedEnvelope::from_transport_string(&transport).unwrap();
        let body = BASE64.decode(&envelope.body).unwrap();

        for byte in 0..body.len() {
            for bit in 0..8 {
                let mut corrupted = body.clone();
                corrupted[byte] ^= 1 << bit;

                let tampered = EncryptedEnvelope {
                    nonce: envelope.nonce.clone(),
                    body: BASE64.encode(&corrupted),
                }
                .to_transport_string()
                .unwrap();

                assert!(
                    decrypt_message(&tampered, &alice.public_bytes(), &bob).is_err(),
                    "bit flip at byte {} bit {} was accepted",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_wrong_key_same_error_as_tampering() {
        let (alice, bob) = pair();
        let eve = KeyPair::generate();

        let transport = encrypt_message("secret", &bob.public_bytes(), &alice).unwrap();

        // Eve cannot decrypt, and the error carries no distinguishing detail
        let result = decrypt_message(&transport, &alice.public_bytes(), &eve);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_envelope_wire_shape() {
        let (alice, bob) = pair();

        let transport = encrypt_message("hi", &bob.public_bytes(), &alice).unwrap();

        // The transport string is base64 of a JSON object with exactly
        // the fields "nonce" and "box"
        let json = BASE64.decode(&transport).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert!(object.contains_key("nonce"));
        assert!(object.contains_key("box"));

        let nonce = BASE64.decode(object["nonce"].as_str().unwrap()).unwrap();
        assert_eq!(nonce.len(), NONCE_SIZE);

        // "hi" is 2 bytes, plus the 16-byte tag
        let body = BASE64.decode(object["box"].as_str().unwrap()).unwrap();
        assert_eq!(body.len(), 2 + TAG_SIZE);
    }

    #[test]
    fn test_malformed_transport_rejected() {
        let bob = KeyPair::generate();

        assert!(matches!(
            decrypt_message("@@not base64@@", &bob.public_bytes(), &bob),
            Err(Error::InvalidEnvelope(_))
        ));

        let not_json = BASE64.encode(b"plain text, not an envelope");
        assert!(matches!(
            decrypt_message(&not_json, &bob.public_bytes(), &bob),
            Err(Error::InvalidEnvelope(_))
        ));
    }
}
