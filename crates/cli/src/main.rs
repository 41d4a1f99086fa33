//! FixtureKit CLI - Main Entry Point
//!
//! Encrypts fixture credentials, issues and checks secure tokens, generates
//! passwords and synthetic test data from the command line.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

use commands::{crypt, data, key, password, token, Context};

/// FixtureKit CLI - credential encryption and test data for E2E suites
#[derive(Parser)]
#[command(name = "fixturekit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "fixturekit.toml", global = true)]
    config: PathBuf,

    /// Encryption passphrase or 64-char hex key
    #[arg(long, env = "FIXTUREKIT_ENCRYPTION_KEY", hide_env_values = true, global = true)]
    key: Option<String>,

    /// Allow the insecure built-in test key when no key is configured
    #[arg(long, global = true)]
    test_mode: bool,

    /// Output format
    #[arg(long, default_value = "plain", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive or generate encryption keys
    #[command(subcommand)]
    Key(key::KeyCommands),

    /// Encrypt a value
    Encrypt(crypt::EncryptArgs),

    /// Decrypt an <iv>:<ciphertext> blob
    Decrypt(crypt::DecryptArgs),

    /// SHA-256 hash a value
    Hash(crypt::HashArgs),

    /// Check a value against a SHA-256 hash
    VerifyHash(crypt::VerifyHashArgs),

    /// Create and verify secure tokens
    #[command(subcommand)]
    Token(token::TokenCommands),

    /// Generate and validate passwords
    #[command(subcommand)]
    Password(password::PasswordCommands),

    /// Generate and load synthetic test data
    #[command(subcommand)]
    Data(data::DataCommands),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::load(&cli.config, cli.key, cli.test_mode, cli.format)?;

    match cli.command {
        Commands::Key(cmd) => key::execute(cmd, &ctx)?,
        Commands::Encrypt(args) => crypt::encrypt(args, &ctx)?,
        Commands::Decrypt(args) => crypt::decrypt(args, &ctx)?,
        Commands::Hash(args) => crypt::hash(args, &ctx),
        Commands::VerifyHash(args) => crypt::verify_hash(args, &ctx)?,
        Commands::Token(cmd) => token::execute(cmd, &ctx)?,
        Commands::Password(cmd) => password::execute(cmd, &ctx)?,
        Commands::Data(cmd) => data::execute(cmd, &ctx).await?,
        Commands::Version => {
            println!("FixtureKit CLI v{}", fixturekit_common::VERSION);
            println!("Credential encryption and test data for browser E2E suites");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_create() {
        let cli = Cli::try_parse_from([
            "fixturekit", "--test-mode", "token", "create", "user-1", "--ttl", "5",
        ])
        .unwrap();
        assert!(cli.test_mode);
        assert!(matches!(
            cli.command,
            Commands::Token(token::TokenCommands::Create { ttl: 5, .. })
        ));
    }

    #[test]
    fn test_parse_negative_ttl() {
        let cli =
            Cli::try_parse_from(["fixturekit", "token", "create", "x", "--ttl", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Token(token::TokenCommands::Create { ttl: -1, .. })
        ));
    }

    #[test]
    fn test_parse_data_generate() {
        let cli = Cli::try_parse_from([
            "fixturekit", "--format", "json", "data", "generate", "user", "--count", "3",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Data(_)));
    }

    #[test]
    fn test_parse_token_create_json() {
        let cli = Cli::try_parse_from(["fixturekit", "token", "create", "{\"id\":1}", "--json"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Token(token::TokenCommands::Create { json: true, .. })
        ));
    }

    #[test]
    fn test_parse_zero_password_count_rejected() {
        let result =
            Cli::try_parse_from(["fixturekit", "password", "generate", "--count", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
