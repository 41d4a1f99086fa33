//! Cryptographic utilities for FixtureKit
//!
//! Provides key derivation and AES-256-CBC encryption of strings and JSON
//! values. Encrypted values use the `<iv-hex>:<ciphertext-hex>` encoding so
//! they can be stored inside fixture files next to plain values.

use crate::error::DecryptionError;
use crate::{Error, Result};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length of a derived key in bytes
pub const KEY_LEN: usize = 32;

/// Length of the CBC initialization vector in bytes
pub const IV_LEN: usize = 16;

/// Turns passphrases into 256-bit keys
pub struct KeyDeriver;

impl KeyDeriver {
    /// Derive a 64-char hex key from a passphrase.
    ///
    /// A passphrase that is already 64 hex characters is returned unchanged;
    /// anything else is hashed with SHA-256.
    pub fn derive_key(passphrase: &str) -> String {
        if Self::is_hex_key(passphrase) {
            return passphrase.to_string();
        }
        sha256_hex(passphrase.as_bytes())
    }

    /// Generate a fresh random key from the OS RNG
    pub fn generate_key() -> String {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        hex::encode(key)
    }

    /// Whether `value` is already a valid hex-encoded key
    pub fn is_hex_key(value: &str) -> bool {
        value.len() == KEY_LEN * 2 && value.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

/// SHA-256 of `data`, hex encoded
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compare SHA-256 of `data` with a hex digest in constant time
pub fn verify_sha256(data: &[u8], expected_hex: &str) -> bool {
    let computed = sha256_hex(data);
    let expected = expected_hex.to_ascii_lowercase();
    if computed.len() != expected.len() {
        return false;
    }
    computed.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// AES-256-CBC cipher bound to a single derived key.
///
/// Immutable after construction; share it freely between workers.
#[derive(Clone)]
pub struct SymmetricCipher {
    key: [u8; KEY_LEN],
}

impl SymmetricCipher {
    /// Build a cipher from a passphrase or a 64-char hex key
    pub fn new(passphrase: &str) -> Self {
        let hex_key = KeyDeriver::derive_key(passphrase);
        let mut key = [0u8; KEY_LEN];
        // derive_key always yields 64 hex chars
        if let Ok(bytes) = hex::decode(&hex_key) {
            key.copy_from_slice(&bytes);
        }
        Self { key }
    }

    /// Raw key bytes
    pub fn key_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Short, non-reversible identifier for the key
    pub fn key_fingerprint(&self) -> String {
        sha256_hex(&self.key)[..16].to_string()
    }

    /// Encrypt a string with a fresh random IV
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let cipher = Aes256CbcEnc::new_from_slices(&self.key, &iv)
            .map_err(|e| Error::Encryption(format!("cipher init failed: {}", e)))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        debug!(len = plaintext.len(), "Encrypted value");
        Ok(format!("{}:{}", hex::encode(iv), hex::encode(ciphertext)))
    }

    /// Decrypt an `<iv-hex>:<ciphertext-hex>` blob
    pub fn decrypt(&self, blob: &str) -> Result<String> {
        let (iv, ciphertext) = parse_blob(blob)?;

        let cipher = Aes256CbcDec::new_from_slices(&self.key, &iv)
            .map_err(|_| DecryptionError::Failed)?;
        let plaintext = cipher
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| DecryptionError::Failed)?;

        String::from_utf8(plaintext).map_err(|_| Error::from(DecryptionError::Failed))
    }

    /// Serialize `value` to JSON and encrypt it
    pub fn encrypt_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = serde_json::to_string(value)?;
        self.encrypt(&json)
    }

    /// Decrypt a blob and parse the plaintext as JSON
    pub fn decrypt_json<T: DeserializeOwned>(&self, blob: &str) -> Result<T> {
        let json = self.decrypt(blob)?;
        serde_json::from_str(&json).map_err(|_| Error::from(DecryptionError::InvalidJson))
    }

    /// One-way SHA-256 hash, hex encoded
    pub fn hash(&self, plaintext: &str) -> String {
        sha256_hex(plaintext.as_bytes())
    }

    /// Check `plaintext` against a hash produced by [`SymmetricCipher::hash`]
    pub fn verify_hash(&self, plaintext: &str, hash: &str) -> bool {
        verify_sha256(plaintext.as_bytes(), hash)
    }
}

impl std::fmt::Debug for SymmetricCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricCipher")
            .field("key_fingerprint", &self.key_fingerprint())
            .finish()
    }
}

/// Split and hex-decode an encrypted blob
fn parse_blob(blob: &str) -> Result<([u8; IV_LEN], Vec<u8>)> {
    let parts: Vec<&str> = blob.split(':').collect();
    if parts.len() != 2 || parts.iter().any(|p| p.is_empty()) {
        return Err(DecryptionError::InvalidFormat.into());
    }

    let iv_bytes = hex::decode(parts[0]).map_err(|_| DecryptionError::InvalidFormat)?;
    let iv: [u8; IV_LEN] = iv_bytes
        .try_into()
        .map_err(|_| DecryptionError::InvalidFormat)?;
    let ciphertext = hex::decode(parts[1]).map_err(|_| DecryptionError::InvalidFormat)?;

    Ok((iv, ciphertext))
}
