//! Secure token commands

use anyhow::{bail, Context as _, Result};
use tracing::debug;
use clap::Subcommand;
use fixturekit_common::token::DEFAULT_TTL_MINUTES;
use fixturekit_common::{SecureTokenCodec, TokenPayload};
use serde::Serialize;

use super::Context;
use crate::output::{print_item, print_scalar, TableDisplay};

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Create a signed token
    Create {
        /// Data to embed as a string
        data: String,

        /// Parse the data as JSON instead
        #[arg(long)]
        json: bool,

        /// Lifetime in minutes; zero or negative creates an expired token
        #[arg(long, default_value_t = DEFAULT_TTL_MINUTES, allow_negative_numbers = true)]
        ttl: i64,
    },

    /// Verify a token and print its payload
    Verify {
        /// Token to verify
        token: String,
    },
}

/// Token payload display wrapper for serialization
#[derive(Serialize)]
pub struct PayloadDisplay {
    pub data: serde_json::Value,
    pub issued_at: String,
    pub expires_at: String,
}

fn format_millis(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

impl From<TokenPayload> for PayloadDisplay {
    fn from(payload: TokenPayload) -> Self {
        Self {
            data: payload.data,
            issued_at: format_millis(payload.timestamp),
            expires_at: format_millis(payload.expiry),
        }
    }
}

impl TableDisplay for PayloadDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Data", "Issued", "Expires"]
    }

    fn row(&self) -> Vec<String> {
        let data = match &self.data {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        vec![data, self.issued_at.clone(), self.expires_at.clone()]
    }
}

fn token_data(data: String, json: bool) -> Result<serde_json::Value> {
    if json {
        serde_json::from_str(&data).context("token data is not valid JSON")
    } else {
        Ok(serde_json::Value::String(data))
    }
}

pub fn execute(cmd: TokenCommands, ctx: &Context) -> Result<()> {
    let codec = SecureTokenCodec::new(ctx.cipher()?);

    match cmd {
        TokenCommands::Create { data, ttl, json } => {
            let value = token_data(data, json)?;
            let token = codec.create_token(&value, ttl)?;
            debug!(ttl, "Created token");
            print_scalar("token", &token, ctx.format);
        }

        TokenCommands::Verify { token } => match codec.verify_token(&token) {
            Some(payload) => print_item(&PayloadDisplay::from(payload), ctx.format),
            None => bail!("token is invalid or expired"),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_data_is_a_string_by_default() {
        assert_eq!(token_data("42".to_string(), false).unwrap(), json!("42"));
        assert_eq!(token_data("{\"a\":1}".to_string(), false).unwrap(), json!("{\"a\":1}"));
    }

    #[test]
    fn test_token_data_json() {
        assert_eq!(token_data("42".to_string(), true).unwrap(), json!(42));
        assert_eq!(token_data("{\"a\":1}".to_string(), true).unwrap(), json!({"a": 1}));
        assert!(token_data("not json".to_string(), true).is_err());
    }
}
