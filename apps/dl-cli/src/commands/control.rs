// control.rs — `dl trigger` and `dl execute`.

use clap::ValueEnum;
use dl_proto::{Intent, TriggerKind, TriggerState};

use crate::client::DaemonClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for TriggerState {
    fn from(toggle: Toggle) -> Self {
        TriggerState {
            enabled: toggle == Toggle::On,
        }
    }
}

pub async fn trigger(client: &DaemonClient, phase: &str, toggle: Toggle) -> anyhow::Result<()> {
    // Validate locally for a friendlier message; the daemon checks again.
    let kind: TriggerKind = phase.parse()?;
    client.set_trigger(kind.as_str(), toggle.into()).await?;
    println!("auto-{} {}", kind, if toggle == Toggle::On { "enabled" } else { "disabled" });
    Ok(())
}

pub async fn execute(client: &DaemonClient, intent: Intent) -> anyhow::Result<()> {
    if intent.is_empty() {
        anyhow::bail!("nothing to execute: pass at least one of --build, --sync, --deploy");
    }
    client.execute(&intent).await?;
    let kinds: Vec<&str> = intent.kinds().map(TriggerKind::as_str).collect();
    println!("requested {}", kinds.join(", "));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_maps_to_trigger_state() {
        assert_eq!(TriggerState::from(Toggle::On), TriggerState::enabled());
        assert_eq!(TriggerState::from(Toggle::Off), TriggerState::disabled());
    }
}
