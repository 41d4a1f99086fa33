use fixturekit_common::config::DataConfig;
use fixturekit_common::SymmetricCipher;
use fixturekit_testdata::entities::USERS;
use fixturekit_testdata::{DataError, TestDataManager, UserOptions};
use serde_json::json;
use tempfile::TempDir;

fn manager(dir: &TempDir, key: &str) -> TestDataManager {
    let config = DataConfig {
        data_dir: dir.path().to_path_buf(),
        ..DataConfig::default()
    };
    TestDataManager::new(SymmetricCipher::new(key), &config)
}

#[tokio::test]
async fn sensitive_fields_are_encrypted_on_disk() {
    let tmp = TempDir::new().unwrap();
    let mut mgr = manager(&tmp, "persist-key");
    let fixture = json!({
        "username": "checkout-bot",
        "password": "Sup3rSecret",
        "integrations": [{"name": "stripe", "apiKey": "sk_test_123"}]
    });

    let path = mgr.save_test_data("accounts", "checkout", &fixture).await.unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&std::fs::read(tmp.path().join(path)).unwrap()).unwrap();
    assert_eq!(raw["username"], "checkout-bot");
    assert_ne!(raw["password"], "Sup3rSecret");
    assert!(raw["password"].as_str().unwrap().contains(':'));
    assert_ne!(raw["integrations"][0]["apiKey"], "sk_test_123");

    let loaded = mgr.load_test_data("accounts", "checkout").await.unwrap();
    assert_eq!(loaded, fixture);
}

#[tokio::test]
async fn hand_written_plain_fixture_loads_unchanged() {
    let tmp = TempDir::new().unwrap();
    let mgr = manager(&tmp, "persist-key");
    let dir = tmp.path().join("users");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("legacy.json"),
        r#"{"username": "old", "password": "plain-text"}"#,
    )
    .unwrap();

    let loaded = mgr.load_test_data("users", "legacy").await.unwrap();
    assert_eq!(loaded["password"], "plain-text");
}

#[tokio::test]
async fn generated_users_round_trip() {
    let tmp = TempDir::new().unwrap();
    let mut mgr = manager(&tmp, "persist-key");
    let users = mgr.generate_users(3, &UserOptions::default()).unwrap();

    mgr.save_generated(USERS, "batch").await.unwrap();
    let loaded = mgr.load_test_data(USERS, "batch").await.unwrap();

    let loaded = loaded.as_array().unwrap();
    assert_eq!(loaded.len(), 3);
    for (user, value) in users.iter().zip(loaded) {
        assert_eq!(value["id"], user.id.to_string());
        assert_eq!(value["password"], user.password);
        assert_eq!(value["plainPassword"], user.plain_password);
    }
}

#[tokio::test]
async fn missing_fixture_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let mgr = manager(&tmp, "persist-key");
    let err = mgr.load_test_data("users", "nope").await.unwrap_err();
    assert!(matches!(err, DataError::NotFound(_)));
}

#[tokio::test]
async fn invalid_names_are_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut mgr = manager(&tmp, "persist-key");
    let err = mgr
        .save_test_data("users", "../escape", &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, DataError::InvalidPath(_)));
}
