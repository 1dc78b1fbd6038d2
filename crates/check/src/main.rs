//! Fission health check CLI.
//!
//! Verifies a cluster is ready for Fission (`check --pre`) or that an
//! installed Fission is healthy (`check`).

// Allow product names without backticks in doc comments
#![allow(clippy::doc_markdown)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::check::CheckCommand;
use commands::version::VersionCommand;

/// Fission cluster diagnostics.
#[derive(Parser)]
#[command(
    name = "fission-check",
    version,
    about = "Fission cluster health checks",
    long_about = "Run health checks against a Kubernetes cluster and the Fission control plane.\n\n\
                  Pre-install checks verify the cluster can run Fission. Post-install checks\n\
                  verify the control plane answers and every Fission component is running.\n\n\
                  Checks run once, concurrently, and only report - nothing is changed."
)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check cluster compatibility or installation health.
    Check(CheckCommand),

    /// Show client and server versions.
    Version(VersionCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info,fission_check=debug")
        } else {
            EnvFilter::new("warn,fission_check=info")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(cmd) => cmd.run().await,
        Commands::Version(cmd) => cmd.run().await,
    }
}
