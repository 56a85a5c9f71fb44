// client.rs — HTTP client for the devloop daemon gateway.

use anyhow::{bail, Context, Result};
use dl_proto::{Intent, LogEntry, State, TriggerState, Triggers};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::sse::SseParser;

/// Default daemon address.
pub const DEFAULT_ADDR: &str = "http://127.0.0.1:50052";

/// What the event stream handed back.
#[derive(Debug)]
pub enum StreamItem {
    Entry(LogEntry),
    /// The daemon cut this client off for falling behind.
    Lagged { last_delivered: Option<u64> },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LaggedBody {
    last_delivered: Option<u64>,
}

pub struct DaemonClient {
    base: String,
    http: reqwest::Client,
}

impl DaemonClient {
    pub fn new(addr: &str) -> Self {
        let base = if addr.starts_with("http://") || addr.starts_with("https://") {
            addr.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", addr.trim_end_matches('/'))
        };
        Self {
            base,
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn state(&self) -> Result<State> {
        self.get_json("/v2/state").await
    }

    pub async fn state_raw(&self) -> Result<serde_json::Value> {
        self.get_json("/v2/state").await
    }

    pub async fn triggers(&self) -> Result<Triggers> {
        self.get_json("/v2/triggers").await
    }

    pub async fn execute(&self, intent: &Intent) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/v2/execute"))
            .json(intent)
            .send()
            .await
            .with_context(|| format!("connecting to {}", self.base))?;
        check(resp).await.map(drop)
    }

    pub async fn set_trigger(&self, phase: &str, state: TriggerState) -> Result<()> {
        let resp = self
            .http
            .put(self.url(&format!("/v2/{phase}/auto_execute")))
            .json(&state)
            .send()
            .await
            .with_context(|| format!("connecting to {}", self.base))?;
        check(resp).await.map(drop)
    }

    pub async fn emit(&self, event: &serde_json::Value) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/v2/events"))
            .json(event)
            .send()
            .await
            .with_context(|| format!("connecting to {}", self.base))?;
        check(resp).await.map(drop)
    }

    /// Follow the event stream, calling `on_item` for each entry, until the
    /// daemon ends it. Entries at or before `after` are skipped server-side.
    pub async fn follow<F>(&self, after: Option<u64>, mut on_item: F) -> Result<()>
    where
        F: FnMut(StreamItem) -> Result<()>,
    {
        let mut request = self.http.get(self.url("/v2/events"));
        if let Some(after) = after {
            request = request.query(&[("after", after)]);
        }
        let resp = request
            .send()
            .await
            .with_context(|| format!("connecting to {}", self.base))?;
        let mut resp = check(resp).await?;

        let mut parser = SseParser::new();
        while let Some(chunk) = resp.chunk().await? {
            for message in parser.feed(&chunk) {
                match message.event.as_deref() {
                    Some("lagged") => {
                        let body: LaggedBody = serde_json::from_str(&message.data)
                            .context("decoding lagged notice")?;
                        on_item(StreamItem::Lagged {
                            last_delivered: body.last_delivered,
                        })?;
                        return Ok(());
                    }
                    None | Some("message") => {
                        let entry: LogEntry = serde_json::from_str(&message.data)
                            .context("decoding log entry")?;
                        on_item(StreamItem::Entry(entry))?;
                    }
                    Some(other) => tracing::debug!(event = other, "ignoring unknown stream event"),
                }
            }
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("connecting to {}", self.base))?;
        let resp = check(resp).await?;
        resp.json().await.context("decoding daemon response")
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => bail!("daemon returned {}: {}", status, body.error),
        Err(_) => bail!("daemon returned {}: {}", status, text.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addr_normalization() {
        assert_eq!(
            DaemonClient::new("127.0.0.1:9000").url("/v2/state"),
            "http://127.0.0.1:9000/v2/state"
        );
        assert_eq!(
            DaemonClient::new("http://localhost:50052/").url("/v2/state"),
            "http://localhost:50052/v2/state"
        );
    }
}
