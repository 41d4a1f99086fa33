//! Encryption and hashing commands

use anyhow::{bail, Context as _, Result};
use clap::Args;
use fixturekit_common::crypto::{sha256_hex, verify_sha256};

use super::Context;
use crate::output::{print_scalar, print_success, print_value};

#[derive(Args)]
pub struct EncryptArgs {
    /// Value to encrypt
    pub value: String,

    /// Treat the value as JSON and encrypt its serialization
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct DecryptArgs {
    /// Encrypted <iv>:<ciphertext> blob
    pub blob: String,

    /// Parse the plaintext as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct HashArgs {
    /// Value to hash
    pub value: String,
}

#[derive(Args)]
pub struct VerifyHashArgs {
    /// Candidate value
    pub value: String,

    /// Expected SHA-256 hex digest
    pub hash: String,
}

pub fn encrypt(args: EncryptArgs, ctx: &Context) -> Result<()> {
    let cipher = ctx.cipher()?;
    let blob = if args.json {
        let value: serde_json::Value =
            serde_json::from_str(&args.value).context("value is not valid JSON")?;
        cipher.encrypt_json(&value)?
    } else {
        cipher.encrypt(&args.value)?
    };
    print_scalar("encrypted", &blob, ctx.format);
    Ok(())
}

pub fn decrypt(args: DecryptArgs, ctx: &Context) -> Result<()> {
    let cipher = ctx.cipher()?;
    if args.json {
        let value: serde_json::Value = cipher.decrypt_json(&args.blob)?;
        print_value(&value, ctx.format);
    } else {
        let plaintext = cipher.decrypt(&args.blob)?;
        print_scalar("decrypted", &plaintext, ctx.format);
    }
    Ok(())
}

pub fn hash(args: HashArgs, ctx: &Context) {
    print_scalar("hash", &sha256_hex(args.value.as_bytes()), ctx.format);
}

pub fn verify_hash(args: VerifyHashArgs, _ctx: &Context) -> Result<()> {
    if !verify_sha256(args.value.as_bytes(), &args.hash) {
        bail!("hash does not match");
    }
    print_success("Hash matches");
    Ok(())
}
