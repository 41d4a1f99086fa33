//! Encoded shapes that persisted fixtures depend on

use base64::{engine::general_purpose::STANDARD, Engine as _};
use fixturekit_common::{KeyDeriver, SecureTokenCodec, SymmetricCipher};
use hmac::{Hmac, Mac};
use sha2::Sha256;

const HEX_KEY: &str = "8f2b6c1e4a9d3f7b0c5e2a8d6f1b4c9e7a3d0f5b8c2e6a1d9f4b7c0e3a5d8f2b";

#[test]
fn encrypted_blob_is_iv_colon_ciphertext() {
    let cipher = SymmetricCipher::new(HEX_KEY);
    let blob = cipher.encrypt("fixture-password").unwrap();

    let parts: Vec<&str> = blob.split(':').collect();
    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].len(), 32);
    assert!(parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_hexdigit())));
    // 16 bytes of plaintext pad to two blocks
    assert_eq!(hex::decode(parts[1]).unwrap().len(), 32);
}

#[test]
fn token_payload_and_signature_layout() {
    let cipher = SymmetricCipher::new(HEX_KEY);
    let codec = SecureTokenCodec::new(cipher.clone());
    let token = codec.create_token("session-1", 15).unwrap();

    let (payload, signature) = token.split_once('.').unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&STANDARD.decode(payload).unwrap()).unwrap();
    assert_eq!(json["data"], "session-1");
    let timestamp = json["timestamp"].as_i64().unwrap();
    let expiry = json["expiry"].as_i64().unwrap();
    assert_eq!(expiry - timestamp, 15 * 60_000);

    let mut mac = Hmac::<Sha256>::new_from_slice(&hex::decode(HEX_KEY).unwrap()).unwrap();
    mac.update(payload.as_bytes());
    assert_eq!(signature, hex::encode(mac.finalize().into_bytes()));
}

#[test]
fn externally_signed_token_verifies() {
    let cipher = SymmetricCipher::new(HEX_KEY);
    let codec = SecureTokenCodec::new(cipher);

    let payload = STANDARD.encode(br#"{"data":"external","timestamp":0,"expiry":32503680000000}"#);
    let mut mac = Hmac::<Sha256>::new_from_slice(&hex::decode(HEX_KEY).unwrap()).unwrap();
    mac.update(payload.as_bytes());
    let token = format!("{}.{}", payload, hex::encode(mac.finalize().into_bytes()));

    let verified = codec.verify_token(&token).expect("valid external token");
    assert_eq!(verified.data_str(), Some("external"));
}

#[test]
fn passphrase_key_matches_sha256() {
    use sha2::Digest;
    let expected = hex::encode(Sha256::digest(b"correct horse battery staple"));
    assert_eq!(KeyDeriver::derive_key("correct horse battery staple"), expected);
}
