// reducer.rs — Fold events into the aggregate State.
//
// `reduce` is total: every variant has a defined effect and none of them
// validates lifecycle order. A "Complete" deploy with no prior "In Progress"
// is recorded as-is, and a resource that reports two terminal statuses keeps
// whichever arrived last. Producers are not trusted to be well-behaved, and
// the reducer must never panic on their input.

use std::sync::Arc;

use dl_proto::{ActionableErr, Event, Lifecycle, State, StatusCode};

/// Apply one event to a state value, returning the successor.
pub fn reduce(state: &State, event: &Event) -> State {
    let mut next = state.clone();
    apply(&mut next, event);
    next
}

/// Fold a sequence of events onto `initial`.
pub fn fold<'a>(initial: State, events: impl IntoIterator<Item = &'a Event>) -> State {
    events.into_iter().fold(initial, |mut state, event| {
        apply(&mut state, event);
        state
    })
}

/// In-place form of [`reduce`].
pub fn apply(state: &mut State, event: &Event) {
    match event {
        Event::Meta(e) => {
            state.metadata = Some(e.metadata.clone());
        }
        Event::Build(e) => {
            state
                .build_state
                .artifacts
                .insert(e.artifact.clone(), e.status.clone());
            state.build_state.status_code = phase_code(
                state.build_state.status_code,
                &e.status,
                e.actionable_err.as_ref(),
                PhaseCodes::BUILD,
            );
        }
        Event::Deploy(e) => {
            state.deploy_state.status = e.status.clone();
            state.deploy_state.status_code = phase_code(
                state.deploy_state.status_code,
                &e.status,
                e.actionable_err.as_ref(),
                PhaseCodes::DEPLOY,
            );
        }
        Event::PortForward(e) => {
            state.forwarded_ports.insert(e.local_port, e.clone());
        }
        Event::StatusCheck(e) => {
            state.status_check_state.status = e.status.clone();
            state.status_check_state.status_code = phase_code(
                state.status_check_state.status_code,
                &e.status,
                e.actionable_err.as_ref(),
                PhaseCodes::STATUS_CHECK,
            );
        }
        Event::ResourceStatusCheck(e) => {
            state
                .status_check_state
                .resources
                .insert(e.resource.clone(), e.status.clone());
        }
        Event::FileSync(e) => {
            state.file_sync_state.status = e.status.clone();
        }
        Event::DebuggingContainer(e) => {
            let containers = &mut state.debugging_containers;
            match Lifecycle::classify(&e.status) {
                Lifecycle::Started => {
                    match containers.iter_mut().find(|c| c.identity() == e.identity()) {
                        Some(existing) => *existing = e.clone(),
                        None => containers.push(e.clone()),
                    }
                }
                Lifecycle::Terminated => {
                    containers.retain(|c| c.identity() != e.identity());
                }
                _ => {}
            }
        }
        // Boundaries and termination are for subscribers; iteration
        // counters travel in the event itself.
        Event::DevLoop(_) | Event::Termination(_) => {}
    }
}

/// Codes a phase reports on success, unexplained failure, and cancellation.
struct PhaseCodes {
    success: StatusCode,
    unknown: StatusCode,
    cancelled: StatusCode,
}

impl PhaseCodes {
    const BUILD: PhaseCodes = PhaseCodes {
        success: StatusCode::BuildSuccess,
        unknown: StatusCode::BuildUnknown,
        cancelled: StatusCode::BuildCancelled,
    };
    const DEPLOY: PhaseCodes = PhaseCodes {
        success: StatusCode::DeploySuccess,
        unknown: StatusCode::DeployUnknown,
        cancelled: StatusCode::DeployCancelled,
    };
    const STATUS_CHECK: PhaseCodes = PhaseCodes {
        success: StatusCode::StatuscheckSuccess,
        unknown: StatusCode::StatuscheckUnknown,
        cancelled: StatusCode::StatuscheckUserCancelled,
    };
}

/// An attached error always wins; otherwise terminal statuses map to the
/// phase's codes and non-terminal ones keep the current code.
fn phase_code(
    current: StatusCode,
    status: &str,
    err: Option<&ActionableErr>,
    codes: PhaseCodes,
) -> StatusCode {
    if let Some(err) = err {
        return err.err_code;
    }
    match Lifecycle::classify(status) {
        Lifecycle::Succeeded => codes.success,
        Lifecycle::Failed => codes.unknown,
        Lifecycle::Canceled => codes.cancelled,
        _ => current,
    }
}

/// Owner of the live aggregate.
///
/// Readers get an `Arc<State>` that never changes underneath them; applying
/// an event while a reader still holds the previous snapshot clones it first
/// (`Arc::make_mut`), so a reader can never observe a half-applied event.
#[derive(Debug)]
pub struct StateReducer {
    current: Arc<State>,
}

impl StateReducer {
    pub fn new(initial: State) -> Self {
        Self {
            current: Arc::new(initial),
        }
    }

    pub fn apply(&mut self, event: &Event) {
        apply(Arc::make_mut(&mut self.current), event);
    }

    /// Immutable point-in-time snapshot.
    pub fn current(&self) -> Arc<State> {
        Arc::clone(&self.current)
    }
}
