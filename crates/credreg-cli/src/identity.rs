//! # Identity Subcommand
//!
//! - `credreg identity new [--count N]`: print random identities.
//! - `credreg identity check VALUE`: print the canonical form, or fail.

use anyhow::Result;
use clap::{Args, Subcommand};

use credreg_core::{Identity, ValidationError};

/// Arguments for `credreg identity`.
#[derive(Args, Debug)]
pub struct IdentityArgs {
    #[command(subcommand)]
    pub command: IdentityCommand,
}

#[derive(Subcommand, Debug)]
pub enum IdentityCommand {
    /// Generate random identities.
    New {
        /// How many to generate.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=1000))]
        count: u32,
    },
    /// Validate an identity and print its canonical lowercase form.
    Check {
        value: String,
    },
}

/// Execute the identity subcommand.
pub fn run_identity(args: &IdentityArgs) -> Result<u8> {
    match &args.command {
        IdentityCommand::New { count } => {
            for identity in generate(*count) {
                println!("{identity}");
            }
            Ok(0)
        }
        IdentityCommand::Check { value } => match Identity::parse(value.trim()) {
            Ok(identity) => {
                println!("{identity}");
                Ok(0)
            }
            Err(e) => {
                eprintln!("{}", check_failure(&e));
                Ok(1)
            }
        },
    }
}

fn check_failure(err: &ValidationError) -> String {
    err.to_string()
}

fn generate(count: u32) -> Vec<Identity> {
    (0..count).map(|_| Identity::random()).collect()
}
