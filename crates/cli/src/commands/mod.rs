//! CLI Commands

pub mod crypt;
pub mod data;
pub mod key;
pub mod password;
pub mod token;

use anyhow::{Context as _, Result};
use fixturekit_common::{FixtureConfig, KeyMode, SymmetricCipher};
use std::path::Path;
use tracing::debug;

use crate::output::OutputFormat;

/// Resolved configuration shared by every command
pub struct Context {
    pub config: FixtureConfig,
    pub format: OutputFormat,
}

impl Context {
    /// Load the config file and apply command-line overrides
    pub fn load(
        path: &Path,
        key: Option<String>,
        test_mode: bool,
        format: OutputFormat,
    ) -> Result<Self> {
        let mut config = FixtureConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            config.encryption.key = Some(key);
        }
        if test_mode {
            config.encryption.mode = KeyMode::Test;
        }
        debug!(
            path = %path.display(),
            mode = ?config.encryption.mode,
            key_configured = config.encryption.key.is_some(),
            "Loaded configuration"
        );
        Ok(Self { config, format })
    }

    /// Cipher for the configured key; fails when no key is available
    pub fn cipher(&self) -> Result<SymmetricCipher> {
        Ok(self.config.cipher()?)
    }
}
