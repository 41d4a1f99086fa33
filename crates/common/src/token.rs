//! Signed, expiring tokens
//!
//! A token is `base64(JSON {data, timestamp, expiry}).hex(HMAC-SHA256)`, the
//! signature being computed over the base64 segment with the cipher key.
//! Verification never errors: malformed, tampered and expired tokens all
//! come back as `None`.

use crate::crypto::SymmetricCipher;
use crate::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Default token lifetime
pub const DEFAULT_TTL_MINUTES: i64 = 60;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Decoded token contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub data: serde_json::Value,
    /// Creation time, unix millis
    pub timestamp: i64,
    /// Expiry time, unix millis
    pub expiry: i64,
}

impl TokenPayload {
    /// `data` as a string, when it is one
    pub fn data_str(&self) -> Option<&str> {
        self.data.as_str()
    }
}

/// Builds and checks secure tokens with a shared key
#[derive(Debug, Clone)]
pub struct SecureTokenCodec {
    cipher: SymmetricCipher,
}

impl SecureTokenCodec {
    pub fn new(cipher: SymmetricCipher) -> Self {
        Self { cipher }
    }

    /// Create a token valid for `ttl_minutes`.
    ///
    /// Zero or negative TTLs yield a token that is already expired.
    pub fn create_token<T: Serialize + ?Sized>(
        &self,
        data: &T,
        ttl_minutes: i64,
    ) -> Result<String> {
        self.create_token_at(data, ttl_minutes, now_millis())
    }

    fn create_token_at<T: Serialize + ?Sized>(
        &self,
        data: &T,
        ttl_minutes: i64,
        now: i64,
    ) -> Result<String> {
        let payload = TokenPayload {
            data: serde_json::to_value(data)?,
            timestamp: now,
            expiry: now.saturating_add(ttl_minutes.saturating_mul(MILLIS_PER_MINUTE)),
        };
        let encoded = STANDARD.encode(serde_json::to_vec(&payload)?);
        let signature = self.sign(&encoded);

        debug!(ttl_minutes, "Created secure token");
        Ok(format!("{}.{}", encoded, signature))
    }

    /// Verify a token, returning its payload if it is authentic and unexpired
    pub fn verify_token(&self, token: &str) -> Option<TokenPayload> {
        self.verify_token_at(token, now_millis())
    }

    fn verify_token_at(&self, token: &str, now: i64) -> Option<TokenPayload> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 2 {
            debug!("Rejected token: malformed");
            return None;
        }
        let (encoded, signature) = (parts[0], parts[1]);

        let expected = self.sign(encoded);
        if expected.len() != signature.len()
            || !bool::from(expected.as_bytes().ct_eq(signature.as_bytes()))
        {
            debug!("Rejected token: signature mismatch");
            return None;
        }

        let bytes = STANDARD.decode(encoded).ok()?;
        let payload: TokenPayload = serde_json::from_slice(&bytes).ok()?;

        if now >= payload.expiry {
            debug!("Rejected token: expired");
            return None;
        }
        Some(payload)
    }

    fn sign(&self, encoded: &str) -> String {
        // HMAC accepts keys of any length
        let mut mac = match HmacSha256::new_from_slice(self.cipher.key_bytes()) {
            Ok(mac) => mac,
            Err(_) => return String::new(),
        };
        mac.update(encoded.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SecureTokenCodec {
        SecureTokenCodec::new(SymmetricCipher::new("token-test-key"))
    }

    #[test]
    fn test_create_verify() {
        let codec = codec();
        let token = codec.create_token("user-42", DEFAULT_TTL_MINUTES).unwrap();
        let payload = codec.verify_token(&token).expect("fresh token must verify");
        assert_eq!(payload.data_str(), Some("user-42"));
        assert_eq!(payload.expiry - payload.timestamp, 60 * MILLIS_PER_MINUTE);
    }

    #[test]
    fn test_structured_data() {
        let codec = codec();
        let data = serde_json::json!({"sub": "alice", "scope": ["read"]});
        let token = codec.create_token(&data, 5).unwrap();
        assert_eq!(codec.verify_token(&token).unwrap().data, data);
    }

    #[test]
    fn test_expired() {
        let codec = codec();
        let token = codec.create_token("x", -1).unwrap();
        assert!(codec.verify_token(&token).is_none());

        let token = codec.create_token_at("x", 0, 1_000).unwrap();
        assert!(codec.verify_token_at(&token, 1_000).is_none());
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let token = codec.create_token_at("x", 1, 0).unwrap();
        assert!(codec.verify_token_at(&token, MILLIS_PER_MINUTE - 1).is_some());
        assert!(codec.verify_token_at(&token, MILLIS_PER_MINUTE).is_none());
    }

    #[test]
    fn test_tampered_signature() {
        let codec = codec();
        let token = codec.create_token("x", 60).unwrap();
        let (payload, sig) = token.split_once('.').unwrap();

        for i in 0..sig.len() {
            let mut chars: Vec<char> = sig.chars().collect();
            chars[i] = if chars[i] == '0' { '1' } else { '0' };
            let tampered = format!("{}.{}", payload, chars.into_iter().collect::<String>());
            assert!(codec.verify_token(&tampered).is_none(), "position {i}");
        }
    }

    #[test]
    fn test_tampered_payload() {
        let codec = codec();
        let token = codec.create_token("x", 60).unwrap();
        let (_, sig) = token.split_once('.').unwrap();
        let forged = STANDARD.encode(br#"{"data":"admin","timestamp":0,"expiry":99999999999999}"#);
        assert!(codec.verify_token(&format!("{}.{}", forged, sig)).is_none());
    }

    #[test]
    fn test_other_key_rejected() {
        let token = codec().create_token("x", 60).unwrap();
        let other = SecureTokenCodec::new(SymmetricCipher::new("another-key"));
        assert!(other.verify_token(&token).is_none());
    }

    #[test]
    fn test_malformed() {
        let codec = codec();
        for token in ["", "abc", "a.b.c", ".", "!!!.deadbeef"] {
            assert!(codec.verify_token(token).is_none(), "{token}");
        }
    }

    #[test]
    fn test_signed_garbage_payload() {
        // Correctly signed but not base64 JSON
        let codec = codec();
        let encoded = "bm90IGpzb24=";
        let token = format!("{}.{}", encoded, codec.sign(encoded));
        assert!(codec.verify_token(&token).is_none());
    }
}
