// hub.rs — Single-writer event hub: append, reduce, publish.
//
// All mutation of a session's log and state passes through `EventHub::append`,
// which holds one lock across three steps:
//
//   1. stamp the event into the log (sequence = previous length),
//   2. fold it into the aggregate state,
//   3. push the entry to every live subscriber queue.
//
// `subscribe` takes the same lock to capture the replay prefix and register
// its queue, so a subscriber sees every entry exactly once: entries below the
// captured length come from replay, everything after from the live queue.
//
// Readers never hold the lock for long. `current()` clones an `Arc<State>`
// and `snapshot()` clones a vector of `Arc<LogEntry>`.

use std::sync::{Arc, Mutex, MutexGuard};

use dl_proto::{Event, LogEntry, State, TerminationEvent};

use crate::broadcast::{BroadcastPolicy, Broadcaster, Subscription};
use crate::error::EventsError;
use crate::log::EventLog;
use crate::reducer::StateReducer;

struct HubInner {
    log: EventLog,
    reducer: StateReducer,
    closed: bool,
}

/// Owns one session's event log, its aggregate state, and its subscribers.
pub struct EventHub {
    inner: Mutex<HubInner>,
    broadcaster: Broadcaster,
}

impl EventHub {
    pub fn new(initial: State, policy: BroadcastPolicy) -> Self {
        Self {
            inner: Mutex::new(HubInner {
                log: EventLog::new(),
                reducer: StateReducer::new(initial),
                closed: false,
            }),
            broadcaster: Broadcaster::new(policy),
        }
    }

    /// Record `event`, fold it into the state, and deliver it to every live
    /// subscriber. Returns the stored entry.
    ///
    /// Never waits on a subscriber. Fails with [`EventsError::Closed`] once
    /// the session has been shut down.
    pub fn append(&self, event: Event) -> Result<Arc<LogEntry>, EventsError> {
        let mut inner = self.lock()?;
        if inner.closed {
            return Err(EventsError::Closed);
        }
        Self::append_locked(&mut inner, &self.broadcaster, event)
    }

    fn append_locked(
        inner: &mut HubInner,
        broadcaster: &Broadcaster,
        event: Event,
    ) -> Result<Arc<LogEntry>, EventsError> {
        let entry = inner.log.append(event);
        inner.reducer.apply(&entry.event);
        broadcaster.publish(&entry)?;
        tracing::debug!(
            sequence = entry.sequence,
            kind = entry.event.kind().as_str(),
            "event appended"
        );
        Ok(entry)
    }

    /// The aggregate state as of the latest append.
    pub fn current(&self) -> Result<Arc<State>, EventsError> {
        Ok(self.lock()?.reducer.current())
    }

    /// Every entry appended so far.
    pub fn snapshot(&self) -> Result<Vec<Arc<LogEntry>>, EventsError> {
        Ok(self.lock()?.log.snapshot())
    }

    /// Entries with a sequence strictly greater than `after`.
    pub fn entries_since(&self, after: Option<u64>) -> Result<Vec<Arc<LogEntry>>, EventsError> {
        Ok(self.lock()?.log.entries_since(after))
    }

    pub fn len(&self) -> Result<usize, EventsError> {
        Ok(self.lock()?.log.len())
    }

    pub fn is_empty(&self) -> Result<bool, EventsError> {
        Ok(self.lock()?.log.is_empty())
    }

    /// Replay the full log, then follow live appends.
    pub fn subscribe(&self) -> Result<Subscription, EventsError> {
        self.resume_after(None)
    }

    /// Replay entries after `after`, then follow live appends. Used by a
    /// subscriber that lagged or reconnected and already holds a prefix.
    ///
    /// A resume point at or past the end of the log cannot have come from
    /// this session (a client reconnecting across a daemon restart, say), so
    /// it is treated as stale and the full log is replayed.
    pub fn resume_after(&self, after: Option<u64>) -> Result<Subscription, EventsError> {
        let inner = self.lock()?;
        let len = inner.log.len() as u64;
        let after = match after {
            Some(seq) if seq >= len => {
                tracing::warn!(
                    after = seq,
                    len,
                    "resume point beyond log end; replaying from start"
                );
                None
            }
            other => other,
        };
        let replay = inner.log.entries_since(after);
        // Registration happens under the writer lock: nothing can be
        // appended between capturing `replay` and the queue going live.
        let subscription = self.broadcaster.register(replay)?;
        drop(inner);
        Ok(subscription)
    }

    /// End the session: append a termination entry, refuse further appends,
    /// and end every live stream once it drains.
    ///
    /// Calling `shutdown` on a closed hub is a no-op returning `None`.
    pub fn shutdown(
        &self,
        termination: TerminationEvent,
    ) -> Result<Option<Arc<LogEntry>>, EventsError> {
        let mut inner = self.lock()?;
        if inner.closed {
            return Ok(None);
        }
        let entry = Self::append_locked(&mut inner, &self.broadcaster, termination.into())?;
        inner.closed = true;
        let released = self.broadcaster.close_all()?;
        tracing::info!(
            sequence = entry.sequence,
            subscribers = released,
            status = %entry.event.describe(),
            "session closed"
        );
        Ok(Some(entry))
    }

    pub fn is_closed(&self) -> Result<bool, EventsError> {
        Ok(self.lock()?.closed)
    }

    pub fn subscriber_count(&self) -> Result<usize, EventsError> {
        self.broadcaster.subscriber_count()
    }

    pub fn policy(&self) -> BroadcastPolicy {
        self.broadcaster.policy()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HubInner>, EventsError> {
        self.inner.lock().map_err(|_| EventsError::LockPoisoned)
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(State::default(), BroadcastPolicy::default())
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("EventHub");
        if let Ok(inner) = self.inner.try_lock() {
            s.field("len", &inner.log.len()).field("closed", &inner.closed);
        }
        s.field("policy", &self.broadcaster.policy()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubscriptionError;
    use crate::reducer::fold;
    use dl_proto::lifecycle::{
        CANCELED, COMPLETE, FAILED, IN_PROGRESS, NOT_STARTED, PENDING, STARTED, SUCCEEDED,
        TERMINATED,
    };
    use dl_proto::{ActionableErr, Metadata, PortForwardEvent, SessionSeed, StatusCode};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{BTreeMap, BTreeSet};

    fn termination(status: &str) -> TerminationEvent {
        TerminationEvent {
            status: status.to_string(),
            actionable_err: None,
        }
    }

    async fn drain(sub: &mut Subscription) -> Vec<u64> {
        let mut seen = Vec::new();
        while let Some(entry) = sub.recv().await.unwrap() {
            seen.push(entry.sequence);
        }
        seen
    }

    #[test]
    fn append_updates_state_and_log_together() {
        let hub = EventHub::default();
        let entry = hub.append(Event::build("app", "In Progress")).unwrap();
        assert_eq!(entry.sequence, 0);
        assert_eq!(hub.len().unwrap(), 1);
        assert_eq!(
            hub.current().unwrap().build_state.artifacts["app"],
            "In Progress"
        );
    }

    #[test]
    fn snapshot_state_is_unaffected_by_later_appends() {
        let hub = EventHub::default();
        hub.append(Event::deploy("In Progress")).unwrap();
        let before = hub.current().unwrap();
        hub.append(Event::deploy("Complete")).unwrap();

        assert_eq!(before.deploy_state.status, "In Progress");
        assert_eq!(hub.current().unwrap().deploy_state.status, "Complete");
    }

    #[test]
    fn state_equals_fold_of_log() {
        let hub = EventHub::default();
        hub.append(Event::build("app", "In Progress")).unwrap();
        hub.append(Event::build_failed(
            "app",
            ActionableErr::new(StatusCode::BuildPushAccessDenied, "denied"),
        ))
        .unwrap();
        hub.append(Event::resource_status("deployment/app", "Succeeded"))
            .unwrap();
        hub.append(Event::file_sync("app", 3, "Complete")).unwrap();

        let log = hub.snapshot().unwrap();
        let folded = fold(State::default(), log.iter().map(|e| &e.event));
        assert_eq!(*hub.current().unwrap(), folded);
    }

    #[tokio::test]
    async fn subscriber_sees_replay_then_live_without_gaps() {
        let hub = EventHub::default();
        for i in 0..3 {
            hub.append(Event::dev_loop(i, "In Progress")).unwrap();
        }
        let mut sub = hub.subscribe().unwrap();
        assert_eq!(sub.replay_remaining(), 3);
        for i in 3..6 {
            hub.append(Event::dev_loop(i, "In Progress")).unwrap();
        }
        hub.shutdown(termination("Completed")).unwrap();

        assert_eq!(drain(&mut sub).await, (0..7).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn concurrent_writers_and_subscribers_see_one_order() {
        let hub = Arc::new(EventHub::default());
        hub.append(Event::deploy("Not Started")).unwrap();

        let mut writers = Vec::new();
        for w in 0..4 {
            let hub = Arc::clone(&hub);
            writers.push(std::thread::spawn(move || {
                for i in 0..250 {
                    hub.append(Event::dev_loop(w * 1_000 + i, "In Progress"))
                        .unwrap();
                }
            }));
        }

        // Subscribe while the writers race; each subscriber must still see
        // a contiguous, duplicate-free sequence from 0.
        let mut early = hub.subscribe().unwrap();
        std::thread::yield_now();
        let mut late = hub.subscribe().unwrap();

        for writer in writers {
            writer.join().unwrap();
        }
        hub.shutdown(termination("Completed")).unwrap();

        let total = hub.len().unwrap() as u64;
        assert_eq!(total, 1_002);
        assert_eq!(drain(&mut early).await, (0..total).collect::<Vec<_>>());
        assert_eq!(drain(&mut late).await, (0..total).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn subscribers_share_the_same_suffix() {
        let hub = EventHub::default();
        hub.append(Event::status_check("In Progress")).unwrap();
        let mut a = hub.subscribe().unwrap();
        hub.append(Event::status_check("Succeeded")).unwrap();
        let mut b = hub.subscribe().unwrap();
        hub.append(Event::deploy("Complete")).unwrap();
        hub.shutdown(termination("Completed")).unwrap();

        let seen_a = drain(&mut a).await;
        let seen_b = drain(&mut b).await;
        assert_eq!(seen_a, vec![0, 1, 2, 3]);
        assert_eq!(seen_a, seen_b);
    }

    #[tokio::test]
    async fn unsubscribe_mid_stream_leaves_others_untouched() {
        let hub = EventHub::default();
        let mut keep = hub.subscribe().unwrap();
        let mut leave = hub.subscribe().unwrap();
        assert_eq!(hub.subscriber_count().unwrap(), 2);

        hub.append(Event::build("app", "In Progress")).unwrap();
        assert_eq!(leave.recv().await.unwrap().unwrap().sequence, 0);
        let before = hub.current().unwrap();
        leave.unsubscribe();
        assert_eq!(hub.subscriber_count().unwrap(), 1);
        assert_eq!(hub.current().unwrap(), before);
        assert_eq!(hub.len().unwrap(), 1);

        hub.append(Event::build("app", "Complete")).unwrap();
        hub.shutdown(termination("Completed")).unwrap();

        assert_eq!(drain(&mut keep).await, vec![0, 1, 2]);
        assert_eq!(leave.recv().await, Ok(None));
    }

    #[tokio::test]
    async fn lagged_subscriber_can_resume() {
        let hub = EventHub::new(State::default(), BroadcastPolicy::bounded(2));
        let mut sub = hub.subscribe().unwrap();
        for i in 0..5 {
            hub.append(Event::dev_loop(i, "In Progress")).unwrap();
        }

        let mut seen = Vec::new();
        let resume_point = loop {
            match sub.recv().await {
                Ok(Some(entry)) => seen.push(entry.sequence),
                Ok(None) => panic!("stream ended without lag"),
                Err(SubscriptionError::Lagged { last_delivered }) => break last_delivered,
            }
        };
        assert_eq!(seen, vec![0, 1]);
        assert_eq!(resume_point, Some(1));

        let mut resumed = hub.resume_after(resume_point).unwrap();
        hub.shutdown(termination("Completed")).unwrap();
        seen.extend(drain(&mut resumed).await);
        assert_eq!(seen, (0..6).collect::<Vec<_>>());
    }

    /// Event drawn from a small vocabulary so that keys collide often.
    fn random_event(rng: &mut StdRng) -> Event {
        let statuses = [IN_PROGRESS, COMPLETE, FAILED, PENDING, SUCCEEDED, CANCELED];
        let status = statuses[rng.gen_range(0..statuses.len())];
        let name = ["app", "worker", "db"][rng.gen_range(0..3)];
        match rng.gen_range(0..10) {
            0 => Event::meta("meta", Metadata::default()),
            1 => Event::build(name, status),
            2 => Event::deploy(status),
            3 => PortForwardEvent {
                local_port: rng.gen_range(8000..8004),
                container_name: name.into(),
                ..Default::default()
            }
            .into(),
            4 => Event::status_check(status),
            5 => Event::resource_status(format!("deployment/{}", name), status),
            6 => Event::file_sync(name, rng.gen_range(0..5), status),
            7 => {
                let lifecycle = if rng.gen_bool(0.5) { STARTED } else { TERMINATED };
                Event::debugging_container(lifecycle, name, "c", "ns")
            }
            8 => Event::dev_loop(rng.gen_range(0..10), status),
            _ => Event::termination(status),
        }
    }

    /// Last-writer-wins bookkeeping kept per key, by hand.
    #[derive(Debug, Default)]
    struct Expected {
        artifacts: BTreeMap<String, String>,
        deploy_status: Option<String>,
        deploy_code: Option<StatusCode>,
        ports: BTreeMap<i32, String>,
        resources: BTreeMap<String, String>,
        file_sync: Option<String>,
        debugging: BTreeSet<String>,
        saw_meta: bool,
    }

    impl Expected {
        fn record(&mut self, event: &Event) {
            match event {
                Event::Meta(_) => self.saw_meta = true,
                Event::Build(e) => {
                    self.artifacts.insert(e.artifact.clone(), e.status.clone());
                }
                Event::Deploy(e) => {
                    self.deploy_status = Some(e.status.clone());
                    match e.status.as_str() {
                        COMPLETE | SUCCEEDED => self.deploy_code = Some(StatusCode::DeploySuccess),
                        FAILED => self.deploy_code = Some(StatusCode::DeployUnknown),
                        CANCELED => self.deploy_code = Some(StatusCode::DeployCancelled),
                        _ => {}
                    }
                }
                Event::PortForward(e) => {
                    self.ports.insert(e.local_port, e.container_name.clone());
                }
                Event::ResourceStatusCheck(e) => {
                    self.resources.insert(e.resource.clone(), e.status.clone());
                }
                Event::FileSync(e) => self.file_sync = Some(e.status.clone()),
                Event::DebuggingContainer(e) if e.status == STARTED => {
                    self.debugging.insert(e.pod_name.clone());
                }
                Event::DebuggingContainer(e) => {
                    self.debugging.remove(&e.pod_name);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn current_state_matches_hand_tracked_expectation_for_random_sequences() {
        let seed_state = || {
            State::initial(&SessionSeed {
                artifacts: vec!["app".to_string()],
                ..Default::default()
            })
        };

        for seed in 0..32u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let hub = EventHub::new(seed_state(), BroadcastPolicy::default());
            let mut expected = Expected::default();
            expected
                .artifacts
                .insert("app".to_string(), NOT_STARTED.to_string());

            for _ in 0..rng.gen_range(0..64) {
                let event = random_event(&mut rng);
                expected.record(&event);
                hub.append(event).unwrap();
            }

            let state = hub.current().unwrap();
            let log = hub.snapshot().unwrap();
            let sequences: Vec<u64> = log.iter().map(|e| e.sequence).collect();
            assert_eq!(sequences, (0..log.len() as u64).collect::<Vec<_>>());
            assert_eq!(
                *state,
                fold(seed_state(), log.iter().map(|e| &e.event)),
                "seed {}",
                seed
            );

            assert_eq!(state.build_state.artifacts, expected.artifacts, "seed {}", seed);
            assert_eq!(
                state.deploy_state.status,
                expected.deploy_status.as_deref().unwrap_or(NOT_STARTED),
                "seed {}",
                seed
            );
            assert_eq!(
                state.deploy_state.status_code,
                expected.deploy_code.unwrap_or(StatusCode::Ok),
                "seed {}",
                seed
            );
            let ports: BTreeMap<i32, String> = state
                .forwarded_ports
                .iter()
                .map(|(port, fwd)| (*port, fwd.container_name.clone()))
                .collect();
            assert_eq!(ports, expected.ports, "seed {}", seed);
            assert_eq!(
                state.status_check_state.resources, expected.resources,
                "seed {}",
                seed
            );
            assert_eq!(
                state.file_sync_state.status,
                expected.file_sync.as_deref().unwrap_or(NOT_STARTED),
                "seed {}",
                seed
            );
            let pods: BTreeSet<String> = state
                .debugging_containers
                .iter()
                .map(|c| c.pod_name.clone())
                .collect();
            assert_eq!(pods.len(), state.debugging_containers.len(), "seed {}", seed);
            assert_eq!(pods, expected.debugging, "seed {}", seed);
            assert_eq!(state.metadata.is_some(), expected.saw_meta, "seed {}", seed);
        }
    }

    #[tokio::test]
    async fn resume_point_past_the_end_replays_everything() {
        let hub = EventHub::default();
        for i in 0..3 {
            hub.append(Event::dev_loop(i, "In Progress")).unwrap();
        }
        let mut sub = hub.resume_after(Some(100)).unwrap();
        assert_eq!(sub.replay_remaining(), 3);
        hub.append(Event::dev_loop(3, "In Progress")).unwrap();
        hub.shutdown(termination("Completed")).unwrap();

        assert_eq!(drain(&mut sub).await, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn resume_from_last_entry_replays_nothing() {
        let hub = EventHub::default();
        for i in 0..3 {
            hub.append(Event::dev_loop(i, "In Progress")).unwrap();
        }
        let mut sub = hub.resume_after(Some(2)).unwrap();
        assert_eq!(sub.replay_remaining(), 0);
        hub.shutdown(termination("Completed")).unwrap();

        assert_eq!(drain(&mut sub).await, vec![3]);
    }

    #[tokio::test]
    async fn resume_on_empty_log_starts_at_zero() {
        let hub = EventHub::default();
        let mut sub = hub.resume_after(Some(0)).unwrap();
        hub.append(Event::deploy("In Progress")).unwrap();
        hub.shutdown(termination("Completed")).unwrap();

        assert_eq!(drain(&mut sub).await, vec![0, 1]);
    }

    #[tokio::test]
    async fn shutdown_closes_hub() {
        let hub = EventHub::default();
        let mut sub = hub.subscribe().unwrap();

        let entry = hub.shutdown(termination("Completed")).unwrap().unwrap();
        assert!(matches!(entry.event, Event::Termination(_)));
        assert!(hub.is_closed().unwrap());
        assert!(matches!(
            hub.append(Event::deploy("Complete")),
            Err(EventsError::Closed)
        ));
        assert!(hub.shutdown(termination("Completed")).unwrap().is_none());

        assert_eq!(drain(&mut sub).await, vec![0]);

        // Subscribing after close replays the full log and then ends.
        let mut late = hub.subscribe().unwrap();
        assert_eq!(drain(&mut late).await, vec![0]);
        assert_eq!(hub.subscriber_count().unwrap(), 0);
    }
}
