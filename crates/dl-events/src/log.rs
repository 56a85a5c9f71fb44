// log.rs — Append-only in-memory event log.
//
// The log is the source of truth for a session: the aggregate state and
// every subscriber's view are derived from it. Entries are stored behind
// `Arc` so that snapshots and broadcasts share them instead of copying
// payloads. The log itself is not synchronized; `EventHub` owns it behind
// its single-writer lock.

use std::sync::Arc;

use dl_proto::{Event, LogEntry};

/// An append-only, strictly ordered sequence of log entries.
///
/// An entry's `sequence` equals its index, so `len()` is also the sequence
/// the next append will receive.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<Arc<LogEntry>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `event` with the next sequence number and the current time,
    /// store it, and return the stored entry.
    pub fn append(&mut self, event: Event) -> Arc<LogEntry> {
        let entry = Arc::new(LogEntry::new(self.entries.len() as u64, event));
        self.entries.push(Arc::clone(&entry));
        entry
    }

    /// Every entry appended so far, as an independent copy of the index.
    pub fn snapshot(&self) -> Vec<Arc<LogEntry>> {
        self.entries.clone()
    }

    /// Entries with a sequence strictly greater than `after`.
    /// `None` means "from the beginning".
    pub fn entries_since(&self, after: Option<u64>) -> Vec<Arc<LogEntry>> {
        let start = match after {
            Some(seq) => usize::try_from(seq.saturating_add(1)).unwrap_or(usize::MAX),
            None => 0,
        };
        self.entries.get(start..).map(<[_]>::to_vec).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_assigns_consecutive_sequences() {
        let mut log = EventLog::new();
        let e0 = log.append(Event::build("app", "In Progress"));
        let e1 = log.append(Event::build("app", "Complete"));
        assert_eq!(e0.sequence, 0);
        assert_eq!(e1.sequence, 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn snapshot_is_independent_of_later_appends() {
        let mut log = EventLog::new();
        log.append(Event::deploy("In Progress"));
        let snapshot = log.snapshot();
        log.append(Event::deploy("Complete"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(snapshot[0].event, Event::deploy("In Progress"));
    }

    #[test]
    fn entries_since_returns_suffix() {
        let mut log = EventLog::new();
        for i in 0..5 {
            log.append(Event::dev_loop(i, "In Progress"));
        }
        let suffix: Vec<u64> = log.entries_since(Some(2)).iter().map(|e| e.sequence).collect();
        assert_eq!(suffix, vec![3, 4]);
        assert_eq!(log.entries_since(None).len(), 5);
        assert!(log.entries_since(Some(4)).is_empty());
        assert!(log.entries_since(Some(100)).is_empty());
    }

    #[test]
    fn empty_log() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert!(log.snapshot().is_empty());
    }
}
