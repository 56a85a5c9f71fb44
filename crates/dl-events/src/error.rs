// error.rs — Error types for the event hub and its subscriptions.

use thiserror::Error;

/// Errors returned by [`EventHub`](crate::EventHub) operations.
#[derive(Debug, Error)]
pub enum EventsError {
    /// A thread panicked while holding the hub lock.
    #[error("event hub lock poisoned")]
    LockPoisoned,

    /// The session has ended; the log no longer accepts entries.
    #[error("session has ended; no further events are accepted")]
    Closed,
}

/// Errors surfaced to a single subscriber. Never affects the writer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// The subscriber's queue exceeded the configured bound and it was cut
    /// off. Everything up to and including `last_delivered` was received;
    /// resume with [`EventHub::resume_after`](crate::EventHub::resume_after).
    #[error("subscriber fell behind and was disconnected (last delivered: {last_delivered:?})")]
    Lagged { last_delivered: Option<u64> },
}
