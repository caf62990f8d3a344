//! Charmix CLI
//!
//! Command-line front end for the Charm cipher and the spell checkers.
//!
//! # Usage
//!
//! ```bash
//! # Build a token transfer and check it
//! charmix build-token --tag token:USD --inputs 70,30 --outputs 100 | charmix check
//!
//! # Check a batch of invocations
//! charmix batch --input spells.json
//!
//! # Seal and open a record
//! charmix encrypt --key <64 hex> --nonce <16..32 hex> --input note.txt > note.json
//! charmix decrypt --key <64 hex> --input note.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod config;
mod logging;

use commands::{
    BatchCommand, BuildEscrowCommand, BuildTokenCommand, CheckCommand, DecryptCommand, EncryptCommand,
    FingerprintCommand, HashCommand, InitCommand,
};
use config::CharmixConfig;

/// Charm cipher and spell checker toolkit
#[derive(Parser)]
#[command(name = "charmix")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Charm cipher and spell checker toolkit", long_about = None)]
struct Cli {
    /// Path to configuration file (default: ./charmix.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check one spell invocation
    Check(CheckCommand),

    /// Check many spell invocations
    Batch(BatchCommand),

    /// Hash bytes with the Charm sponge
    Hash(HashCommand),

    /// Seal bytes with the Charm cipher
    Encrypt(EncryptCommand),

    /// Open a sealed record
    Decrypt(DecryptCommand),

    /// Show digests of a transaction
    Fingerprint(FingerprintCommand),

    /// Build a token transaction
    BuildToken(BuildTokenCommand),

    /// Build an escrow transaction
    BuildEscrow(BuildEscrowCommand),

    /// Write a default configuration file
    Init(InitCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = CharmixConfig::resolve(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init(level, cli.json_logs || config.logging.json)?;

    match cli.command {
        Commands::Check(cmd) => cmd.execute(&config),
        Commands::Batch(cmd) => cmd.execute(&config),
        Commands::Hash(cmd) => cmd.execute(),
        Commands::Encrypt(cmd) => cmd.execute(&config),
        Commands::Decrypt(cmd) => cmd.execute(),
        Commands::Fingerprint(cmd) => cmd.execute(&config),
        Commands::BuildToken(cmd) => cmd.execute(&config),
        Commands::BuildEscrow(cmd) => cmd.execute(&config),
        Commands::Init(cmd) => cmd.execute(),
    }
}
