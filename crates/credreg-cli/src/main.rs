//! # credreg CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use credreg_cli::describe::{run_describe, DescribeArgs};
use credreg_cli::identity::{run_identity, IdentityArgs};
use credreg_cli::serve::{run_serve, ServeArgs};

/// Credential registry: issuer administration, credential issuance and
/// revocation over HTTP.
#[derive(Parser, Debug)]
#[command(name = "credreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the registry HTTP service.
    Serve(ServeArgs),

    /// Write the published address and interface descriptor.
    Describe(DescribeArgs),

    /// Generate or check identities.
    Identity(IdentityArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => match &cli.command {
            // The server logs requests by default.
            Commands::Serve(_) => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
            _ => EnvFilter::new("warn"),
        },
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Serve(args) => run_serve(args),
        Commands::Describe(args) => run_describe(args),
        Commands::Identity(args) => run_identity(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
