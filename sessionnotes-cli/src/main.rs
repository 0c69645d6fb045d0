//! Session notes command-line client.
//!
//! # Usage
//!
//! ```text
//! sessionnotes config init --url <url> --key <key> [--table <t>] [--validator <fn>] [--timeout-ms <n>]
//! sessionnotes config show [--json]
//! sessionnotes list [--json]
//! sessionnotes add --client <name> [--date YYYY-MM-DD] --notes <text> [--duration <min>]
//! sessionnotes delete <id> [--yes]
//! ```
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG=debug` for
//! request-level detail.

mod commands;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    add::AddArgs, config::ConfigCommand, delete::DeleteArgs, list::ListArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "sessionnotes",
    version,
    about = "Record and review therapy session notes",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage the connection settings in ~/.sessionnotes/config.yaml.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// List stored session notes, newest session first.
    List(ListArgs),

    /// Validate and store a new session note.
    Add(AddArgs),

    /// Delete a session note after confirmation.
    Delete(DeleteArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Config { command } => commands::config::run(command),
        Commands::List(args) => args.run(),
        Commands::Add(args) => args.run(),
        Commands::Delete(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
