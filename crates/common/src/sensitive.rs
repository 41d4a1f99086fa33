//! Recursive encryption of sensitive fields in JSON values
//!
//! Object keys are matched case-insensitively against [`SENSITIVE_KEYS`].
//! Only string values under those keys are touched; everything else is
//! walked and copied as-is. The input is never mutated.

use crate::crypto::SymmetricCipher;
use crate::Result;
use serde_json::{Map, Value};
use tracing::warn;

/// Lowercased key names whose string values are treated as secrets
pub const SENSITIVE_KEYS: &[&str] = &["password", "apikey", "token", "secret", "key"];

/// Whether an object key names a sensitive value
pub fn is_sensitive_key(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SENSITIVE_KEYS.contains(&lowered.as_str())
}

/// How decrypt failures on flagged fields are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkMode {
    /// Leave the original value in place when it does not decrypt.
    /// Fixtures routinely mix encrypted and plain values, but this also
    /// hides genuinely corrupted ciphertext.
    #[default]
    Tolerant,
    /// Fail on the first value that does not decrypt
    Strict,
}

/// Encrypts and decrypts the sensitive fields of arbitrary JSON data
#[derive(Debug, Clone, Copy)]
pub struct SensitiveFieldWalker<'a> {
    cipher: &'a SymmetricCipher,
    mode: WalkMode,
}

impl<'a> SensitiveFieldWalker<'a> {
    pub fn new(cipher: &'a SymmetricCipher) -> Self {
        Self {
            cipher,
            mode: WalkMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: WalkMode) -> Self {
        self.mode = mode;
        self
    }

    /// Return a copy of `value` with every sensitive string encrypted
    pub fn encrypt_sensitive_fields(&self, value: &Value) -> Result<Value> {
        let mut copy = value.clone();
        self.walk(&mut copy, &|s: &str| self.cipher.encrypt(s))?;
        Ok(copy)
    }

    /// Return a copy of `value` with every sensitive string decrypted
    pub fn decrypt_sensitive_fields(&self, value: &Value) -> Result<Value> {
        let mut copy = value.clone();
        self.walk(&mut copy, &|s: &str| self.cipher.decrypt(s))?;
        Ok(copy)
    }

    fn walk(&self, value: &mut Value, transform: &dyn Fn(&str) -> Result<String>) -> Result<()> {
        match value {
            Value::Object(map) => self.walk_object(map, transform),
            Value::Array(items) => {
                for item in items.iter_mut() {
                    self.walk(item, transform)?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn walk_object(
        &self,
        map: &mut Map<String, Value>,
        transform: &dyn Fn(&str) -> Result<String>,
    ) -> Result<()> {
        for (key, field) in map.iter_mut() {
            if let (true, Value::String(s)) = (is_sensitive_key(key), &mut *field) {
                match transform(s) {
                    Ok(replaced) => *s = replaced,
                    Err(e) if e.is_decryption() && self.mode == WalkMode::Tolerant => {
                        warn!(field = %key, "Leaving sensitive field as-is: {}", e);
                    }
                    Err(e) => return Err(e),
                }
                continue;
            }
            self.walk(field, transform)?;
        }
        Ok(())
    }
}

impl SymmetricCipher {
    /// Encrypt sensitive fields with the default walker
    pub fn encrypt_sensitive_fields(&self, value: &Value) -> Result<Value> {
        SensitiveFieldWalker::new(self).encrypt_sensitive_fields(value)
    }

    /// Decrypt sensitive fields, tolerating values that are not encrypted
    pub fn decrypt_sensitive_fields(&self, value: &Value) -> Value {
        SensitiveFieldWalker::new(self)
            .decrypt_sensitive_fields(value)
            .unwrap_or_else(|_| value.clone())
    }
}
