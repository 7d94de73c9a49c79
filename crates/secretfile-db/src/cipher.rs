//! AES-128 envelope encryption.
//!
//! Every value is sealed under the store key with a fresh 16-byte IV and
//! rendered as `AES:<base64 iv>:<base64 ciphertext>`. The mode is GCM, so the
//! ciphertext field carries an authentication tag and any modification of
//! the IV or ciphertext is rejected instead of decrypting to altered text.
//!
//! Envelopes written by tools that use the same `AES` tag with CBC and PKCS#5
//! padding are not readable here; decrypting one fails with
//! [`SecretError::CryptoFailure`].

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes128;
use aes_gcm::{AesGcm, Nonce};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{Result, SecretError};

/// Algorithm tag written as the first envelope field.
pub const ALGORITHM: &str = "AES";

/// Store key length in bytes (AES-128).
pub const KEY_SIZE: usize = 16;

/// IV length in bytes.
pub const IV_SIZE: usize = 16;

/// AES-128-GCM with a 16-byte nonce.
type EnvelopeCipher = AesGcm<Aes128, U16>;

/// Generate a new random 128-bit store key from the operating system RNG.
pub fn generate_key() -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    OsRng.fill_bytes(&mut key[..]);
    key
}

fn random_iv() -> [u8; IV_SIZE] {
    let mut iv = [0u8; IV_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}

/// Build the cipher for `key`, reporting a bad key length through `error`.
fn cipher_for(key: &[u8], error: fn(String) -> SecretError) -> Result<EnvelopeCipher> {
    EnvelopeCipher::new_from_slice(key)
        .map_err(|_| error(format!("key must be {KEY_SIZE} bytes, got {}", key.len())))
}

/// Encrypt `plaintext` under `key` and return the three-field envelope.
pub fn encrypt(key: &[u8], plaintext: &str) -> Result<String> {
    let cipher = cipher_for(key, SecretError::EncryptionFailed)?;
    let iv = random_iv();

    let ciphertext = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), plaintext.as_bytes())
        .map_err(|e| SecretError::EncryptionFailed(e.to_string()))?;

    Ok(format!(
        "{ALGORITHM}:{}:{}",
        STANDARD.encode(iv),
        STANDARD.encode(ciphertext)
    ))
}

/// Decrypt an envelope previously produced by [`encrypt`] under the same key.
pub fn decrypt(key: &[u8], envelope: &str) -> Result<String> {
    let (iv, ciphertext) = parse_envelope(envelope)?;
    let cipher = cipher_for(key, SecretError::CryptoFailure)?;

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(Nonce::<U16>::from_slice(&iv), ciphertext.as_slice())
            .map_err(|_| {
                SecretError::CryptoFailure(
                    "authentication failed (wrong key or tampered value)".to_string(),
                )
            })?,
    );

    String::from_utf8(plaintext.to_vec())
        .map_err(|e| SecretError::CryptoFailure(format!("invalid UTF-8: {e}")))
}

fn split_envelope(envelope: &str) -> Option<(&str, &str)> {
    let mut fields = envelope.split(':');
    let (algorithm, iv, ciphertext) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() || algorithm != ALGORITHM {
        return None;
    }
    if iv.trim().is_empty() || ciphertext.trim().is_empty() {
        return None;
    }
    Some((iv, ciphertext))
}

fn parse_envelope(envelope: &str) -> Result<(Vec<u8>, Vec<u8>)> {
    let (iv, ciphertext) = split_envelope(envelope).ok_or_else(|| {
        SecretError::InvalidEnvelope(format!(
            "expected {ALGORITHM}:<iv>:<ciphertext> with three non-blank fields"
        ))
    })?;

    let iv = STANDARD
        .decode(iv)
        .map_err(|e| SecretError::InvalidEnvelope(format!("IV is not base64: {e}")))?;
    if iv.len() != IV_SIZE {
        return Err(SecretError::InvalidEnvelope(format!(
            "IV must be {IV_SIZE} bytes, got {}",
            iv.len()
        )));
    }

    let ciphertext = STANDARD
        .decode(ciphertext)
        .map_err(|e| SecretError::InvalidEnvelope(format!("ciphertext is not base64: {e}")))?;

    Ok((iv, ciphertext))
}
