//! Password Commands

use anyhow::{bail, Result};
use tracing::debug;
use clap::{Args, Subcommand};
use fixturekit_common::password::DEFAULT_PASSWORD_LENGTH;
use fixturekit_common::{
    create_password_validator, generate_secure_password, PasswordOptions, PasswordPolicy,
};

use super::Context;
use crate::output::{print_scalar, print_success, OutputFormat};

#[derive(Subcommand)]
pub enum PasswordCommands {
    /// Generate random passwords
    Generate(GenerateArgs),

    /// Check a password against a policy
    Validate(ValidateArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Password length
    #[arg(short, long, default_value_t = DEFAULT_PASSWORD_LENGTH)]
    pub length: usize,

    /// Number of passwords to generate
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,

    #[arg(long)]
    pub no_uppercase: bool,

    #[arg(long)]
    pub no_lowercase: bool,

    #[arg(long)]
    pub no_numbers: bool,

    #[arg(long)]
    pub no_symbols: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Password to check
    pub password: String,

    #[arg(long, default_value_t = 8)]
    pub min_length: usize,

    #[arg(long, default_value_t = 128)]
    pub max_length: usize,

    /// Do not require an uppercase letter
    #[arg(long)]
    pub allow_no_uppercase: bool,

    /// Do not require a lowercase letter
    #[arg(long)]
    pub allow_no_lowercase: bool,

    /// Do not require a digit
    #[arg(long)]
    pub allow_no_numbers: bool,

    /// Require a symbol
    #[arg(long)]
    pub require_symbols: bool,
}

impl From<&ValidateArgs> for PasswordPolicy {
    fn from(args: &ValidateArgs) -> Self {
        PasswordPolicy {
            min_length: args.min_length,
            max_length: args.max_length,
            require_uppercase: !args.allow_no_uppercase,
            require_lowercase: !args.allow_no_lowercase,
            require_numbers: !args.allow_no_numbers,
            require_symbols: args.require_symbols,
        }
    }
}

pub fn execute(cmd: PasswordCommands, ctx: &Context) -> Result<()> {
    match cmd {
        PasswordCommands::Generate(args) => {
            let options = PasswordOptions {
                include_uppercase: !args.no_uppercase,
                include_lowercase: !args.no_lowercase,
                include_numbers: !args.no_numbers,
                include_symbols: !args.no_symbols,
            };
            debug!(length = args.length, count = args.count, "Generating passwords");
            for _ in 0..args.count {
                let password = generate_secure_password(args.length, &options)?;
                print_scalar("password", &password, ctx.format);
            }
        }

        PasswordCommands::Validate(args) => {
            let validate = create_password_validator(PasswordPolicy::from(&args));
            let result = validate(&args.password);

            match ctx.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                OutputFormat::Yaml => {
                    print!("{}", serde_yaml::to_string(&result)?);
                }
                _ => {
                    if result.is_valid {
                        print_success("Password satisfies the policy");
                    }
                    for error in &result.errors {
                        println!("  - {}", error);
                    }
                }
            }

            if !result.is_valid {
                bail!("password violates {} rule(s)", result.errors.len());
            }
        }
    }

    Ok(())
}
