//! FixtureKit Common Library
//!
//! Key derivation, symmetric encryption of credentials, signed expiring
//! tokens, password policy and configuration shared by the FixtureKit crates.

pub mod config;
pub mod crypto;
pub mod error;
pub mod password;
pub mod sensitive;
pub mod token;

// Re-export commonly used types
pub use config::{CleanupStrategy, FixtureConfig, KeyMode};
pub use crypto::{KeyDeriver, SymmetricCipher};
pub use error::{DecryptionError, Error, Result};
pub use password::{
    create_password_validator, generate_secure_password, PasswordOptions, PasswordPolicy,
    PasswordValidation,
};
pub use sensitive::{is_sensitive_key, SensitiveFieldWalker, WalkMode, SENSITIVE_KEYS};
pub use token::{SecureTokenCodec, TokenPayload};

/// FixtureKit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
