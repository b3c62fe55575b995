//! # jsm CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsm_cli::links::{run_links, LinksArgs};
use jsm_cli::tree::{run_build, run_validate, TreeArgs};

/// Schema-driven model toolchain.
///
/// Builds node trees from JSON Schema and instances, validates them with
/// located errors, and inspects hypermedia link resolution.
#[derive(Parser, Debug)]
#[command(name = "jsm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the node tree for an instance and print its value.
    Build(TreeArgs),

    /// Build and validate an instance; exit code 1 when invalid.
    Validate(TreeArgs),

    /// Show the link each hypermedia action would follow.
    Links(LinksArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins when no -v is given.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut out = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Build(args) => run_build(&args, &mut out),
        Commands::Validate(args) => run_validate(&args, &mut out),
        Commands::Links(args) => run_links(&args, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
