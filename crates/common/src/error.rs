//! Error types for FixtureKit

use thiserror::Error;

/// Result type alias using FixtureKit Error
pub type Result<T> = std::result::Result<T, Error>;

/// Why a decrypt call was rejected.
///
/// Wrong key, corrupted ciphertext and bad padding all collapse into
/// [`DecryptionError::Failed`] so callers cannot tell them apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecryptionError {
    #[error("invalid format: expected <iv-hex>:<ciphertext-hex>")]
    InvalidFormat,

    #[error("failed to decrypt")]
    Failed,

    #[error("failed to parse decrypted JSON")]
    InvalidJson,
}

/// FixtureKit error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(#[from] DecryptionError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl Error {
    /// True for any decrypt-side failure, regardless of cause
    pub fn is_decryption(&self) -> bool {
        matches!(self, Error::Decryption(_))
    }
}
