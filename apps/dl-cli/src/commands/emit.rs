// emit.rs — `dl emit <file>`: post a JSON event to the daemon.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use dl_proto::Event;

use crate::client::DaemonClient;

pub async fn execute(client: &DaemonClient, file: &Path) -> anyhow::Result<()> {
    let text = read_input(file)?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;

    // Reject malformed events before they reach the daemon.
    match Event::decode(value.clone())? {
        Some(event) => {
            client.emit(&value).await?;
            println!("sent: {}", event.describe());
        }
        None => println!("event is empty; nothing sent"),
    }
    Ok(())
}

/// `-` reads from stdin.
fn read_input(file: &Path) -> anyhow::Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_event_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, r#"{"deployEvent": {"status": "Complete"}}"#).unwrap();

        let text = read_input(&path).unwrap();
        let event = Event::decode_str(&text).unwrap().unwrap();
        assert_eq!(event, Event::deploy("Complete"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_input(&dir.path().join("nope.json")).is_err());
    }
}
