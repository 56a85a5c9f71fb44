// broadcast.rs — Fan the log out to independently paced subscribers.
//
// Each subscriber owns a tokio unbounded mpsc queue. Publishing pushes one
// `Arc<LogEntry>` into every queue and never waits on a consumer, so a slow
// or stalled subscriber cannot hold up the writer or anyone else.
//
// Delivery policy:
//   - default: unbounded. Retention is run-scoped, so a subscriber may fall
//     arbitrarily far behind and still receive everything.
//   - `max_pending = Some(n)`: a subscriber with n undelivered entries is
//     removed and marked lagged instead of being sent the next entry. It
//     still drains what was queued, then its `recv` returns
//     `SubscriptionError::Lagged` with the last sequence it received. Nothing
//     is ever dropped silently.
//
// A `Subscription` yields the replay captured at subscribe time first, then
// the live queue. The hub registers the queue while holding its writer lock,
// which is what makes the replay/live boundary gapless and duplicate-free.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use dl_proto::LogEntry;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::{EventsError, SubscriptionError};

/// How the broadcaster treats subscribers that fall behind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastPolicy {
    /// Maximum undelivered entries per subscriber. `None` = unbounded.
    pub max_pending: Option<usize>,
}

impl BroadcastPolicy {
    pub fn unbounded() -> Self {
        Self { max_pending: None }
    }

    pub fn bounded(max_pending: usize) -> Self {
        Self {
            max_pending: Some(max_pending.max(1)),
        }
    }
}

/// State shared between a registered slot and its subscription.
#[derive(Debug, Default)]
struct SubscriberShared {
    pending: AtomicUsize,
    lagged: AtomicBool,
}

struct SubscriberSlot {
    sender: UnboundedSender<Arc<LogEntry>>,
    shared: Arc<SubscriberShared>,
}

struct Registry {
    next_id: u64,
    subscribers: BTreeMap<u64, SubscriberSlot>,
    closed: bool,
}

/// Registry of live subscriber queues. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Broadcaster {
    policy: BroadcastPolicy,
    inner: Arc<Mutex<Registry>>,
}

impl Broadcaster {
    pub fn new(policy: BroadcastPolicy) -> Self {
        Self {
            policy,
            inner: Arc::new(Mutex::new(Registry {
                next_id: 1,
                subscribers: BTreeMap::new(),
                closed: false,
            })),
        }
    }

    pub fn policy(&self) -> BroadcastPolicy {
        self.policy
    }

    /// Register a live queue and pair it with `replay`.
    ///
    /// The caller must hold whatever lock serializes publishing while it
    /// captures `replay` and calls this, or entries could fall between the
    /// two.
    pub(crate) fn register(&self, replay: Vec<Arc<LogEntry>>) -> Result<Subscription, EventsError> {
        let mut registry = self.lock()?;
        if registry.closed {
            return Ok(Subscription::finished(replay));
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(SubscriberShared::default());
        let id = registry.next_id;
        registry.next_id = registry.next_id.saturating_add(1);
        registry.subscribers.insert(
            id,
            SubscriberSlot {
                sender,
                shared: Arc::clone(&shared),
            },
        );
        tracing::debug!(
            subscriber = id,
            replay = replay.len(),
            active = registry.subscribers.len(),
            "subscriber registered"
        );

        Ok(Subscription {
            id: Some(id),
            replay: replay.into(),
            live: Some(receiver),
            shared: Some(shared),
            broadcaster: Some(self.clone()),
            last_delivered: None,
        })
    }

    /// Push `entry` to every live queue without waiting on any consumer.
    pub fn publish(&self, entry: &Arc<LogEntry>) -> Result<(), EventsError> {
        let mut registry = self.lock()?;
        let mut dropped = Vec::new();

        for (id, slot) in &registry.subscribers {
            if let Some(max) = self.policy.max_pending {
                if slot.shared.pending.load(Ordering::Acquire) >= max {
                    slot.shared.lagged.store(true, Ordering::Release);
                    tracing::warn!(
                        subscriber = id,
                        max_pending = max,
                        sequence = entry.sequence,
                        "subscriber fell behind; disconnecting"
                    );
                    dropped.push(*id);
                    continue;
                }
            }

            // Count before sending so the receiver can never decrement first.
            slot.shared.pending.fetch_add(1, Ordering::AcqRel);
            if slot.sender.send(Arc::clone(entry)).is_err() {
                // Receiver already gone; the subscription was dropped.
                dropped.push(*id);
            }
        }

        for id in dropped {
            registry.subscribers.remove(&id);
        }
        Ok(())
    }

    /// Remove one subscriber. Safe to call concurrently with `publish`;
    /// returns whether the subscriber was still registered.
    pub fn unsubscribe(&self, id: u64) -> bool {
        match self.lock() {
            Ok(mut registry) => {
                let removed = registry.subscribers.remove(&id).is_some();
                if removed {
                    tracing::debug!(
                        subscriber = id,
                        active = registry.subscribers.len(),
                        "subscriber released"
                    );
                }
                removed
            }
            Err(_) => false,
        }
    }

    /// End every live stream. Later registrations receive only their replay.
    pub fn close_all(&self) -> Result<usize, EventsError> {
        let mut registry = self.lock()?;
        registry.closed = true;
        let count = registry.subscribers.len();
        registry.subscribers.clear();
        Ok(count)
    }

    pub fn subscriber_count(&self) -> Result<usize, EventsError> {
        Ok(self.lock()?.subscribers.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Registry>, EventsError> {
        self.inner.lock().map_err(|_| EventsError::LockPoisoned)
    }
}

/// One observer's view of the log: replay first, then live entries.
///
/// Dropping a subscription unsubscribes it immediately, without waiting for
/// further log activity.
pub struct Subscription {
    id: Option<u64>,
    replay: VecDeque<Arc<LogEntry>>,
    live: Option<UnboundedReceiver<Arc<LogEntry>>>,
    shared: Option<Arc<SubscriberShared>>,
    broadcaster: Option<Broadcaster>,
    last_delivered: Option<u64>,
}

impl Subscription {
    /// A subscription with only a replay; the stream ends after it.
    pub(crate) fn finished(replay: Vec<Arc<LogEntry>>) -> Self {
        Self {
            id: None,
            replay: replay.into(),
            live: None,
            shared: None,
            broadcaster: None,
            last_delivered: None,
        }
    }

    /// Registry id, or `None` once unsubscribed or for a finished session.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// Sequence of the last entry handed to the consumer.
    pub fn last_delivered(&self) -> Option<u64> {
        self.last_delivered
    }

    /// Replayed entries not yet consumed.
    pub fn replay_remaining(&self) -> usize {
        self.replay.len()
    }

    /// Next entry in order.
    ///
    /// `Ok(None)` means the stream has ended: the session closed or the
    /// subscription was released. `Err(Lagged)` means this subscriber was cut
    /// off after exceeding the queue bound.
    pub async fn recv(&mut self) -> Result<Option<Arc<LogEntry>>, SubscriptionError> {
        if let Some(entry) = self.replay.pop_front() {
            return Ok(Some(self.delivered(entry)));
        }

        let Some(live) = self.live.as_mut() else {
            return Ok(None);
        };
        match live.recv().await {
            Some(entry) => {
                self.mark_received();
                Ok(Some(self.delivered(entry)))
            }
            None => self.end_of_stream(),
        }
    }

    /// Stop delivery and release the queue. Idempotent.
    pub fn unsubscribe(&mut self) {
        if let (Some(id), Some(broadcaster)) = (self.id.take(), self.broadcaster.take()) {
            broadcaster.unsubscribe(id);
        }
        if let Some(mut live) = self.live.take() {
            live.close();
        }
        self.replay.clear();
    }

    fn delivered(&mut self, entry: Arc<LogEntry>) -> Arc<LogEntry> {
        self.last_delivered = Some(entry.sequence);
        entry
    }

    fn mark_received(&self) {
        if let Some(shared) = &self.shared {
            shared.pending.fetch_sub(1, Ordering::AcqRel);
        }
    }

    fn end_of_stream(&mut self) -> Result<Option<Arc<LogEntry>>, SubscriptionError> {
        self.live = None;
        self.id = None;
        self.broadcaster = None;
        let lagged = self
            .shared
            .as_ref()
            .is_some_and(|s| s.lagged.load(Ordering::Acquire));
        if lagged {
            Err(SubscriptionError::Lagged {
                last_delivered: self.last_delivered,
            })
        } else {
            Ok(None)
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("replay_remaining", &self.replay.len())
            .field("last_delivered", &self.last_delivered)
            .finish()
    }
}
