//! # dl-daemon
//!
//! Runs one devloop session: the event hub, the control plane, and the
//! HTTP gateway that observers and producers talk to.
//!
//! ## Usage
//!
//! ```text
//! dl-daemon --config devloop.toml
//! dl-daemon --bind 0.0.0.0:50052 --artifact app --artifact worker
//! ```
//!
//! Ctrl-C ends the session: a termination event is appended, every open
//! event stream is closed, and the server shuts down once they drain.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use dl_server::{ControlService, GatewayOptions, ServerConfig};

/// devloop session daemon.
#[derive(Parser)]
#[command(name = "dl-daemon", version, about = "devloop session daemon")]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = "devloop.toml")]
    config: PathBuf,

    /// Address to listen on (overrides `bind` in the config file).
    #[arg(long)]
    bind: Option<String>,

    /// Artifact to track; repeat for several (overrides `session.artifacts`).
    #[arg(long = "artifact")]
    artifacts: Vec<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    let mut config = ServerConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    if !cli.artifacts.is_empty() {
        config.session.artifacts = cli.artifacts;
    }

    let addr = config.bind_addr()?;
    let service = ControlService::from_config(&config);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    tracing::info!("Starting devloop daemon");
    tracing::info!("Config: {}", cli.config.display());

    let on_signal = service.clone();
    dl_server::serve(
        listener,
        service,
        GatewayOptions::from_config(&config),
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for Ctrl-C: {}", e);
                return;
            }
            tracing::info!("Interrupt received, ending session");
            if let Err(e) = on_signal.shutdown("Terminated") {
                tracing::error!("failed to end session cleanly: {}", e);
            }
        },
    )
    .await
    .inspect_err(|e| tracing::error!("serving error: {:?}", e))?;

    tracing::info!("devloop daemon shutting down");
    Ok(())
}

/// Logs go to stderr; `RUST_LOG` refines the defaults.
fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("dl_daemon=info".parse()?)
        .add_directive("dl_server=info".parse()?)
        .add_directive("dl_events=info".parse()?)
        .add_directive("dl_control=info".parse()?);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn repeated_artifacts_collect() {
        let cli = Cli::parse_from([
            "dl-daemon",
            "--artifact",
            "app",
            "--artifact",
            "worker",
            "--bind",
            "0.0.0.0:9000",
        ]);
        assert_eq!(cli.artifacts, vec!["app", "worker"]);
        assert_eq!(cli.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(cli.config, PathBuf::from("devloop.toml"));
        assert!(!cli.log_json);
    }
}
