// events.rs — `dl events`: follow the session's event log.
//
// Prints the replayed history, then each live entry as it arrives, until the
// daemon ends the session. If the daemon cuts the stream off for lagging,
// reconnect after the last entry printed so nothing is shown twice.

use dl_proto::LogEntry;

use crate::client::{DaemonClient, StreamItem};

pub async fn execute(client: &DaemonClient, json: bool, after: Option<u64>) -> anyhow::Result<()> {
    let mut resume_after = after;
    loop {
        let mut lagged = None;
        client
            .follow(resume_after, |item| {
                match item {
                    StreamItem::Entry(entry) => {
                        resume_after = Some(entry.sequence);
                        println!("{}", format_entry(&entry, json)?);
                    }
                    StreamItem::Lagged { last_delivered } => lagged = Some(last_delivered),
                }
                Ok(())
            })
            .await?;

        match lagged {
            Some(last_delivered) => {
                eprintln!(
                    "stream fell behind after entry {}; reconnecting",
                    last_delivered.map_or_else(|| "-".to_string(), |s| s.to_string())
                );
                resume_after = last_delivered.or(resume_after);
            }
            None => return Ok(()),
        }
    }
}

pub fn format_entry(entry: &LogEntry, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string(entry)?);
    }
    Ok(format!(
        "{:>5}  {}  {:<22} {}",
        entry.sequence,
        entry.timestamp.format("%H:%M:%S%.3f"),
        entry.event.kind().as_str(),
        entry.entry
    ))
}
