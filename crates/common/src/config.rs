//! FixtureKit configuration

use crate::crypto::SymmetricCipher;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable holding the encryption passphrase or hex key
pub const KEY_ENV_VAR: &str = "FIXTUREKIT_ENCRYPTION_KEY";

/// Passphrase used only when `mode = "test"` and no key is configured.
/// Anything encrypted with it should be considered public.
pub const INSECURE_TEST_KEY: &str = "fixturekit-insecure-test-key-do-not-use-in-production";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    pub encryption: EncryptionConfig,
    pub data: DataConfig,
}

/// Whether an insecure default key may be used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// A key must be configured explicitly
    #[default]
    Production,
    /// Fall back to [`INSECURE_TEST_KEY`] with a warning
    Test,
}

/// Key material configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    /// Passphrase or 64-char hex key
    pub key: Option<String>,

    pub mode: KeyMode,
}

/// Which backends a cleanup cycle visits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupStrategy {
    /// Use the configured default
    Auto,
    Database,
    Api,
    File,
    #[default]
    All,
}

impl std::fmt::Display for CleanupStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CleanupStrategy::Auto => "auto",
            CleanupStrategy::Database => "database",
            CleanupStrategy::Api => "api",
            CleanupStrategy::File => "file",
            CleanupStrategy::All => "all",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for CleanupStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(CleanupStrategy::Auto),
            "database" => Ok(CleanupStrategy::Database),
            "api" => Ok(CleanupStrategy::Api),
            "file" => Ok(CleanupStrategy::File),
            "all" => Ok(CleanupStrategy::All),
            other => Err(Error::InvalidConfig(format!(
                "unknown cleanup strategy: {}",
                other
            ))),
        }
    }
}

/// Test-data generation and persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root directory for persisted fixtures
    pub data_dir: PathBuf,

    /// Strategy `auto` resolves to
    pub cleanup_strategy: CleanupStrategy,

    /// Encrypt generated user passwords by default
    pub encrypt_passwords: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("test-data"),
            cleanup_strategy: CleanupStrategy::All,
            encrypt_passwords: true,
        }
    }
}

impl FixtureConfig {
    /// Load configuration from file, or defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the key material from the environment or this config
    pub fn resolve_key(&self) -> Result<String> {
        let from_env = std::env::var(KEY_ENV_VAR).ok();
        self.resolve_key_with(from_env)
    }

    /// Build a cipher from the resolved key
    pub fn cipher(&self) -> Result<SymmetricCipher> {
        Ok(SymmetricCipher::new(&self.resolve_key()?))
    }

    fn resolve_key_with(&self, from_env: Option<String>) -> Result<String> {
        let configured = from_env
            .filter(|k| !k.is_empty())
            .or_else(|| self.encryption.key.clone().filter(|k| !k.is_empty()));

        match (configured, self.encryption.mode) {
            (Some(key), _) => Ok(key),
            (None, KeyMode::Test) => {
                warn!("No encryption key configured, using the insecure test key");
                Ok(INSECURE_TEST_KEY.to_string())
            }
            (None, KeyMode::Production) => Err(Error::InvalidConfig(format!(
                "no encryption key configured; set {} or encryption.key",
                KEY_ENV_VAR
            ))),
        }
    }
}
