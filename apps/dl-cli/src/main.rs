//! # dl
//!
//! Command-line observer for a running devloop daemon.
//!
//! - `dl state` — print the aggregate session state
//! - `dl events` — follow the event log (replay, then live)
//! - `dl trigger <phase> <on|off>` — toggle auto build/sync/deploy
//! - `dl execute --build --deploy` — request a manual run
//! - `dl triggers` — show the auto-trigger flags
//! - `dl emit <file>` — post a JSON event

mod client;
mod commands;
mod sse;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dl_proto::Intent;

use client::DaemonClient;
use commands::control::Toggle;

/// Watch and steer a devloop session.
#[derive(Parser)]
#[command(name = "dl", version, about)]
struct Cli {
    /// Daemon address.
    #[arg(long, default_value = client::DEFAULT_ADDR)]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current session state.
    State {
        /// Print the raw JSON.
        #[arg(long)]
        json: bool,
    },
    /// Follow the event log until the session ends.
    Events {
        /// Print each entry as one line of JSON.
        #[arg(long)]
        json: bool,
        /// Skip entries up to and including this sequence number.
        #[arg(long)]
        after: Option<u64>,
    },
    /// Turn an auto-trigger on or off.
    Trigger {
        /// build, sync, or deploy.
        phase: String,
        #[arg(value_enum)]
        toggle: Toggle,
    },
    /// Request a manual build, sync, and/or deploy.
    Execute {
        #[arg(long)]
        build: bool,
        #[arg(long)]
        sync: bool,
        #[arg(long)]
        deploy: bool,
    },
    /// Show the auto-trigger flags.
    Triggers,
    /// Post a JSON event read from a file (`-` for stdin).
    Emit { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = DaemonClient::new(&cli.addr);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match &cli.command {
            Commands::State { json } => commands::state::execute(&client, *json).await,
            Commands::Events { json, after } => {
                commands::events::execute(&client, *json, *after).await
            }
            Commands::Trigger { phase, toggle } => {
                commands::control::trigger(&client, phase, *toggle).await
            }
            Commands::Execute {
                build,
                sync,
                deploy,
            } => {
                let intent = Intent {
                    build: *build,
                    sync: *sync,
                    deploy: *deploy,
                };
                commands::control::execute(&client, intent).await
            }
            Commands::Triggers => commands::state::triggers(&client).await,
            Commands::Emit { file } => commands::emit::execute(&client, file).await,
        }
    })
}
