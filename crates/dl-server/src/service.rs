// service.rs — The control service façade.
//
// Transport-independent entry points for observers and producers. The HTTP
// gateway is a thin adapter over these methods; tests drive them directly.
//
// State readers get the reducer's snapshot with the control plane's trigger
// flags overlaid. Trigger changes never enter the event log, so the overlay is
// what makes an `auto_build(false)` visible to the next `get_state`.

use std::sync::Arc;

use dl_control::ControlPlane;
use dl_events::{EventHub, Subscription};
use dl_proto::{
    Event, Intent, LogEntry, State, TerminationEvent, TriggerKind, TriggerState, Triggers,
};
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Empty acknowledgement returned by control calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {}

/// Shared handle to one session's hub and control plane. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ControlService {
    hub: Arc<EventHub>,
    control: Arc<ControlPlane>,
}

impl ControlService {
    pub fn new(hub: Arc<EventHub>, control: Arc<ControlPlane>) -> Self {
        Self { hub, control }
    }

    /// Build a fresh session from the `[session]` and `[events]` config.
    pub fn from_config(config: &ServerConfig) -> Self {
        let initial = State::initial(&config.session);
        let hub = EventHub::new(initial, config.events.policy());
        let control = ControlPlane::new(config.session.triggers());
        tracing::info!(
            artifacts = config.session.artifacts.len(),
            max_pending = ?config.events.max_pending,
            "session started"
        );
        Self::new(Arc::new(hub), Arc::new(control))
    }

    pub fn hub(&self) -> &Arc<EventHub> {
        &self.hub
    }

    pub fn control(&self) -> &Arc<ControlPlane> {
        &self.control
    }

    /// Current aggregate state, with live trigger flags.
    pub fn get_state(&self) -> Result<State, ServerError> {
        let snapshot = self.hub.current()?;
        let triggers = self.control.triggers()?;
        let mut state = State::clone(&snapshot);
        overlay_triggers(&mut state, triggers);
        Ok(state)
    }

    /// Replay the log, then follow it live.
    pub fn events(&self) -> Result<Subscription, ServerError> {
        Ok(self.hub.subscribe()?)
    }

    /// Replay entries after `after`, then follow live. For reconnecting
    /// observers that already hold a prefix.
    pub fn events_after(&self, after: Option<u64>) -> Result<Subscription, ServerError> {
        Ok(self.hub.resume_after(after)?)
    }

    pub fn execute(&self, intent: Intent) -> Result<Ack, ServerError> {
        self.control.submit_intent(intent)?;
        Ok(Ack {})
    }

    pub fn auto_build(&self, request: TriggerState) -> Result<Ack, ServerError> {
        self.set(TriggerKind::Build, request)
    }

    pub fn auto_sync(&self, request: TriggerState) -> Result<Ack, ServerError> {
        self.set(TriggerKind::Sync, request)
    }

    pub fn auto_deploy(&self, request: TriggerState) -> Result<Ack, ServerError> {
        self.set(TriggerKind::Deploy, request)
    }

    /// Set a trigger by phase name (`build`, `sync`, `deploy`).
    pub fn set_trigger(&self, phase: &str, request: TriggerState) -> Result<Ack, ServerError> {
        self.control.set_trigger(phase, request.enabled)?;
        Ok(Ack {})
    }

    pub fn triggers(&self) -> Result<Triggers, ServerError> {
        Ok(self.control.triggers()?)
    }

    /// Accept an event from an external producer. An unset event is
    /// acknowledged and otherwise ignored.
    pub fn handle(&self, event: Option<Event>) -> Result<Ack, ServerError> {
        match event {
            Some(event) => {
                self.hub.append(event)?;
            }
            None => tracing::debug!("ignoring unset event"),
        }
        Ok(Ack {})
    }

    /// Append an event from an in-process subsystem.
    pub fn append(&self, event: Event) -> Result<Arc<LogEntry>, ServerError> {
        Ok(self.hub.append(event)?)
    }

    /// End the session: record termination and close every live stream.
    pub fn shutdown(&self, status: &str) -> Result<Option<Arc<LogEntry>>, ServerError> {
        let termination = TerminationEvent {
            status: status.to_string(),
            actionable_err: None,
        };
        Ok(self.hub.shutdown(termination)?)
    }

    fn set(&self, kind: TriggerKind, request: TriggerState) -> Result<Ack, ServerError> {
        self.control.set(kind, request.enabled)?;
        Ok(Ack {})
    }
}

fn overlay_triggers(state: &mut State, triggers: Triggers) {
    state.build_state.auto_trigger = triggers.build;
    state.file_sync_state.auto_trigger = triggers.sync;
    state.deploy_state.auto_trigger = triggers.deploy;
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_events::fold;
    use dl_proto::lifecycle::COMPLETE;
    use dl_proto::SessionSeed;

    fn service() -> ControlService {
        let config = ServerConfig {
            session: SessionSeed {
                artifacts: vec!["app".to_string(), "worker".to_string()],
                ..SessionSeed::default()
            },
            ..ServerConfig::default()
        };
        ControlService::from_config(&config)
    }

    #[test]
    fn initial_state_from_config() {
        let state = service().get_state().unwrap();
        assert_eq!(state.build_state.artifacts["app"], "Not Started");
        assert_eq!(state.build_state.artifacts["worker"], "Not Started");
        assert!(state.build_state.auto_trigger);
    }

    #[test]
    fn auto_build_reflects_without_append() {
        let svc = service();
        svc.auto_build(TriggerState::disabled()).unwrap();
        assert!(!svc.get_state().unwrap().build_state.auto_trigger);
        assert_eq!(svc.hub().len().unwrap(), 0);

        svc.auto_build(TriggerState::enabled()).unwrap();
        assert!(svc.get_state().unwrap().build_state.auto_trigger);
    }

    #[test]
    fn trigger_overlay_leaves_fold_intact() {
        let svc = service();
        svc.auto_deploy(TriggerState::disabled()).unwrap();
        svc.handle(Some(Event::deploy("In Progress"))).unwrap();

        let log = svc.hub().snapshot().unwrap();
        let seed = SessionSeed {
            artifacts: vec!["app".to_string(), "worker".to_string()],
            ..SessionSeed::default()
        };
        let folded = fold(State::initial(&seed), log.iter().map(|e| &e.event));
        assert_eq!(*svc.hub().current().unwrap(), folded);
        assert!(!svc.get_state().unwrap().deploy_state.auto_trigger);
    }

    #[test]
    fn build_progress_for_one_artifact() {
        let svc = service();
        svc.handle(Some(Event::build("app", "In Progress"))).unwrap();
        svc.handle(Some(Event::build("app", COMPLETE))).unwrap();

        let state = svc.get_state().unwrap();
        assert_eq!(state.build_state.artifacts["app"], COMPLETE);
        assert_eq!(state.build_state.artifacts["worker"], "Not Started");
    }

    #[test]
    fn set_trigger_unknown_phase() {
        let err = service()
            .set_trigger("test", TriggerState::enabled())
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidArgument(_)));
    }

    #[test]
    fn execute_keeps_latest_per_kind() {
        let svc = service();
        svc.execute(Intent::only(TriggerKind::Build)).unwrap();
        let first = svc.control().pending_submission(TriggerKind::Build).unwrap();
        svc.execute(Intent::only(TriggerKind::Build)).unwrap();
        let second = svc.control().pending_submission(TriggerKind::Build).unwrap();

        assert_ne!(first, second);
        assert_eq!(svc.control().consume_intent().unwrap(), Intent::only(TriggerKind::Build));
        assert!(svc.control().consume_intent().unwrap().is_empty());
    }

    #[test]
    fn unset_event_is_ignored() {
        let svc = service();
        assert_eq!(svc.handle(None).unwrap(), Ack {});
        assert_eq!(svc.hub().len().unwrap(), 0);
    }

    #[tokio::test]
    async fn shutdown_ends_streams_and_rejects_events() {
        let svc = service();
        let mut sub = svc.events().unwrap();
        svc.handle(Some(Event::deploy("In Progress"))).unwrap();
        svc.shutdown("Completed").unwrap();

        let first = sub.recv().await.unwrap().unwrap();
        assert_eq!(first.event, Event::deploy("In Progress"));
        let last = sub.recv().await.unwrap().unwrap();
        assert!(matches!(last.event, Event::Termination(_)));
        assert!(sub.recv().await.unwrap().is_none());

        let err = svc.handle(Some(Event::deploy("Complete"))).unwrap_err();
        assert!(matches!(err, ServerError::Closed));
    }
}
