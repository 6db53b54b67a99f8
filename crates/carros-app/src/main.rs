//! # Carros - Vehicle registration service
//!
//! Entry point: parses the command line, loads configuration, sets up
//! logging and wires the layers together.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  main.rs (this file) - Dependency Injection & Wiring           │
//! │    │                                                            │
//! │    ├── Creates: InMemoryCarRepository (adapter)                │
//! │    ├── Creates: CarRegistrationService (use case)              │
//! │    ├── Creates: CarsEndpoint (JSON-RPC controller)             │
//! │    └── Runs: stdio or TCP server loop                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage:
//!   carros serve [--config <file>] [--bind <addr>]  - Start the RPC server
//!   carros init [dir]                               - Write a default carros.json

mod commands;

use clap::{Parser, Subcommand};
use commands::{InitCommand, ServeCommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "carros")]
#[command(about = "Carros - Vehicle registration RPC service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the registration RPC server
    Serve(ServeCommand),
    /// Write a default configuration file
    Init(InitCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => {
            let config = cmd.load_config()?;
            init_tracing(config.log_filter.as_deref());
            cmd.run(config).await
        }
        Commands::Init(cmd) => {
            init_tracing(None);
            cmd.run()
        }
    }
}

/// Install the global subscriber. Logs go to stderr; stdout may carry RPC.
fn init_tracing(config_filter: Option<&str>) {
    tracing_subscriber::fmt()
        .with_env_filter(resolve_filter(config_filter))
        .with_writer(std::io::stderr)
        .init();
}

/// RUST_LOG wins, then the configured filter, then `info`
fn resolve_filter(config_filter: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| match config_filter {
            Some(filter) => EnvFilter::try_new(filter),
            None => EnvFilter::try_new("info"),
        })
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
