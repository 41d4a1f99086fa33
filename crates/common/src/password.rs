//! Password generation and policy validation

use crate::{Error, Result};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Default generated password length
pub const DEFAULT_PASSWORD_LENGTH: usize = 12;

/// Character classes drawn from when generating a password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordOptions {
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            include_uppercase: true,
            include_lowercase: true,
            include_numbers: true,
            include_symbols: true,
        }
    }
}

impl PasswordOptions {
    fn charset(&self) -> Vec<char> {
        let mut pool = String::new();
        if self.include_lowercase {
            pool.push_str(LOWERCASE);
        }
        if self.include_uppercase {
            pool.push_str(UPPERCASE);
        }
        if self.include_numbers {
            pool.push_str(DIGITS);
        }
        if self.include_symbols {
            pool.push_str(SYMBOLS);
        }
        pool.chars().collect()
    }
}

/// Generate a random password of `length` characters.
///
/// Uses the thread RNG; this is test data, not key material.
pub fn generate_secure_password(length: usize, options: &PasswordOptions) -> Result<String> {
    if length == 0 {
        return Err(Error::Validation("password length must be at least 1".to_string()));
    }
    let charset = options.charset();
    if charset.is_empty() {
        return Err(Error::Validation(
            "at least one character class must be enabled".to_string(),
        ));
    }

    let mut rng = rand::thread_rng();
    Ok((0..length)
        .filter_map(|_| charset.choose(&mut rng).copied())
        .collect())
}

/// Composition rules a password must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub max_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_numbers: bool,
    pub require_symbols: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
            require_uppercase: true,
            require_lowercase: true,
            require_numbers: true,
            require_symbols: false,
        }
    }
}

/// Outcome of checking a password against a policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl PasswordPolicy {
    /// Check `password`, collecting every violated rule
    pub fn validate(&self, password: &str) -> PasswordValidation {
        let mut errors = Vec::new();
        let length = password.chars().count();

        if length < self.min_length {
            errors.push(format!(
                "Password must be at least {} characters long",
                self.min_length
            ));
        }
        if length > self.max_length {
            errors.push(format!(
                "Password must be no more than {} characters long",
                self.max_length
            ));
        }
        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            errors.push("Password must contain at least one uppercase letter".to_string());
        }
        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            errors.push("Password must contain at least one lowercase letter".to_string());
        }
        if self.require_numbers && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one number".to_string());
        }
        if self.require_symbols && !password.chars().any(|c| SYMBOLS.contains(c)) {
            errors.push("Password must contain at least one special character".to_string());
        }

        PasswordValidation {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Bind a policy into a reusable validator closure
pub fn create_password_validator(policy: PasswordPolicy) -> impl Fn(&str) -> PasswordValidation {
    move |password: &str| policy.validate(password)
}
