//! Key Commands

use anyhow::Result;
use clap::Subcommand;
use fixturekit_common::{KeyDeriver, SymmetricCipher};
use serde::Serialize;

use super::Context;
use crate::output::{print_item, TableDisplay};

#[derive(Subcommand)]
pub enum KeyCommands {
    /// Derive a 64-char hex key from a passphrase
    Derive {
        /// Passphrase, or an existing hex key
        passphrase: String,
    },

    /// Generate a random key
    Generate,

    /// Show the fingerprint of the configured key
    Fingerprint,
}

/// Key display wrapper for serialization
#[derive(Serialize)]
pub struct KeyDisplay {
    pub key: String,
    pub fingerprint: String,
}

impl KeyDisplay {
    fn from_hex(key: String) -> Self {
        let fingerprint = SymmetricCipher::new(&key).key_fingerprint();
        Self { key, fingerprint }
    }
}

impl TableDisplay for KeyDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Key", "Fingerprint"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.key.clone(), self.fingerprint.clone()]
    }
}

pub fn execute(cmd: KeyCommands, ctx: &Context) -> Result<()> {
    match cmd {
        KeyCommands::Derive { passphrase } => {
            let display = KeyDisplay::from_hex(KeyDeriver::derive_key(&passphrase));
            print_item(&display, ctx.format);
        }

        KeyCommands::Generate => {
            let display = KeyDisplay::from_hex(KeyDeriver::generate_key());
            print_item(&display, ctx.format);
        }

        KeyCommands::Fingerprint => {
            let cipher = ctx.cipher()?;
            crate::output::print_scalar("fingerprint", &cipher.key_fingerprint(), ctx.format);
        }
    }

    Ok(())
}
