// event.rs — The event union and its payloads.
//
// Every lifecycle occurrence in the observed pipeline is one `Event`.
// On the wire an event is an object with exactly one variant key, e.g.
//   {"buildEvent": {"artifact": "app", "status": "In Progress"}}
// An object with no variant key means "no variant set"; `Event::decode`
// reports that as `Ok(None)` so callers can ignore it without treating it
// as malformed input.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProtoError;
use crate::lifecycle::Lifecycle;
use crate::status::{BuildType, BuilderType, ClusterType, DeployerType, StatusCode, SuggestionCode};

// ── Errors as data ───────────────────────────────────────────────

/// One remediation hint for a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Suggestion {
    pub suggestion_code: SuggestionCode,
    pub action: String,
}

/// A failure reported by a subsystem, with suggested fixes.
///
/// The hub never interprets these; it stores and republishes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionableErr {
    pub err_code: StatusCode,
    pub message: String,
    pub suggestions: Vec<Suggestion>,
}

impl ActionableErr {
    pub fn new(err_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            err_code,
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    /// Append a suggestion and return self (builder pattern).
    pub fn with_suggestion(mut self, code: SuggestionCode, action: impl Into<String>) -> Self {
        self.suggestions.push(Suggestion {
            suggestion_code: code,
            action: action.into(),
        });
        self
    }
}

// ── Session metadata ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageBuilder {
    #[serde(rename = "type")]
    pub builder_type: BuilderType,
    pub count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildMetadata {
    pub number_of_artifacts: i32,
    pub builders: Vec<ImageBuilder>,
    #[serde(rename = "type")]
    pub build_type: BuildType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Deployer {
    #[serde(rename = "type")]
    pub deployer_type: DeployerType,
    pub count: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeployMetadata {
    pub deployers: Vec<Deployer>,
    pub cluster: ClusterType,
}

/// Composition of the build/deploy pipeline for this session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    pub build: BuildMetadata,
    pub deploy: DeployMetadata,
    pub run_id: String,
}

// ── Event payloads ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetaEvent {
    pub entry: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildEvent {
    pub artifact: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_err: Option<ActionableErr>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeployEvent {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_err: Option<ActionableErr>,
}

/// A port forwarded from a cluster resource to the local machine.
///
/// `local_port` identifies the forward; re-forwarding the same local port
/// replaces the previous entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PortForwardEvent {
    pub local_port: i32,
    pub pod_name: String,
    pub container_name: String,
    pub namespace: String,
    pub port_name: String,
    pub resource_type: String,
    pub resource_name: String,
    pub address: String,
    pub target_port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_err: Option<ActionableErr>,
}

/// Aggregate status of the post-deploy status check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusCheckEvent {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_err: Option<ActionableErr>,
}

/// Status check progress for one deployed resource (e.g. `deployment/web`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceStatusCheckEvent {
    pub resource: String,
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_err: Option<ActionableErr>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileSyncEvent {
    pub file_count: i32,
    pub image: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_err: Option<ActionableErr>,
}

/// A container configured for debugging started or terminated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DebuggingContainerEvent {
    pub status: String,
    pub pod_name: String,
    pub container_name: String,
    pub namespace: String,
    pub artifact: String,
    pub runtime: String,
    pub working_dir: String,
    pub debug_ports: BTreeMap<String, u32>,
}

impl DebuggingContainerEvent {
    /// `(pod, container, namespace)` — two events describe the same
    /// container iff their identities are equal.
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.pod_name, &self.container_name, &self.namespace)
    }
}

/// Start or end of one dev-loop iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DevLoopEvent {
    pub iteration: i32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_err: Option<ActionableErr>,
}

/// The session is over; no further events follow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TerminationEvent {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actionable_err: Option<ActionableErr>,
}

// ── The union ────────────────────────────────────────────────────

/// One lifecycle occurrence. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    #[serde(rename = "metaEvent")]
    Meta(MetaEvent),
    #[serde(rename = "buildEvent")]
    Build(BuildEvent),
    #[serde(rename = "deployEvent")]
    Deploy(DeployEvent),
    #[serde(rename = "portEvent")]
    PortForward(PortForwardEvent),
    #[serde(rename = "statusCheckEvent")]
    StatusCheck(StatusCheckEvent),
    #[serde(rename = "resourceStatusCheckEvent")]
    ResourceStatusCheck(ResourceStatusCheckEvent),
    #[serde(rename = "fileSyncEvent")]
    FileSync(FileSyncEvent),
    #[serde(rename = "debuggingContainerEvent")]
    DebuggingContainer(DebuggingContainerEvent),
    #[serde(rename = "devLoopEvent")]
    DevLoop(DevLoopEvent),
    #[serde(rename = "terminationEvent")]
    Termination(TerminationEvent),
}

/// Payload-free discriminant of [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Meta,
    Build,
    Deploy,
    PortForward,
    StatusCheck,
    ResourceStatusCheck,
    FileSync,
    DebuggingContainer,
    DevLoop,
    Termination,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Meta => "meta",
            EventKind::Build => "build",
            EventKind::Deploy => "deploy",
            EventKind::PortForward => "port_forward",
            EventKind::StatusCheck => "status_check",
            EventKind::ResourceStatusCheck => "resource_status_check",
            EventKind::FileSync => "file_sync",
            EventKind::DebuggingContainer => "debugging_container",
            EventKind::DevLoop => "dev_loop",
            EventKind::Termination => "termination",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Event {
    /// Decode a JSON event object.
    ///
    /// Returns `Ok(None)` for `null` or `{}` — an event with no variant set.
    pub fn decode(value: serde_json::Value) -> Result<Option<Event>, ProtoError> {
        match &value {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::Object(map) if map.is_empty() => return Ok(None),
            _ => {}
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    pub fn decode_str(s: &str) -> Result<Option<Event>, ProtoError> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::decode(value)
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Meta(_) => EventKind::Meta,
            Event::Build(_) => EventKind::Build,
            Event::Deploy(_) => EventKind::Deploy,
            Event::PortForward(_) => EventKind::PortForward,
            Event::StatusCheck(_) => EventKind::StatusCheck,
            Event::ResourceStatusCheck(_) => EventKind::ResourceStatusCheck,
            Event::FileSync(_) => EventKind::FileSync,
            Event::DebuggingContainer(_) => EventKind::DebuggingContainer,
            Event::DevLoop(_) => EventKind::DevLoop,
            Event::Termination(_) => EventKind::Termination,
        }
    }

    /// The failure attached to this event, if any.
    pub fn actionable_err(&self) -> Option<&ActionableErr> {
        match self {
            Event::Build(e) => e.actionable_err.as_ref(),
            Event::Deploy(e) => e.actionable_err.as_ref(),
            Event::PortForward(e) => e.actionable_err.as_ref(),
            Event::StatusCheck(e) => e.actionable_err.as_ref(),
            Event::ResourceStatusCheck(e) => e.actionable_err.as_ref(),
            Event::FileSync(e) => e.actionable_err.as_ref(),
            Event::DevLoop(e) => e.actionable_err.as_ref(),
            Event::Termination(e) => e.actionable_err.as_ref(),
            Event::Meta(_) | Event::DebuggingContainer(_) => None,
        }
    }

    /// Human-readable one-line description, stored as the log entry text.
    pub fn describe(&self) -> String {
        let base = match self {
            Event::Meta(e) if !e.entry.is_empty() => e.entry.clone(),
            Event::Meta(_) => "Session metadata recorded".to_string(),
            Event::Build(e) => format!("Build {} for artifact {}", verb(&e.status), e.artifact),
            Event::Deploy(e) => format!("Deploy {}", verb(&e.status)),
            Event::PortForward(e) if !e.resource_name.is_empty() => format!(
                "Forwarding {}/{} port {} to local port {}",
                e.resource_type, e.resource_name, e.target_port, e.local_port
            ),
            Event::PortForward(e) => format!(
                "Forwarding container {} to local port {}",
                e.container_name, e.local_port
            ),
            Event::StatusCheck(e) => format!("Status check {}", verb(&e.status)),
            Event::ResourceStatusCheck(e) if !e.message.is_empty() => format!(
                "Resource {} status {}: {}",
                e.resource,
                verb(&e.status),
                e.message
            ),
            Event::ResourceStatusCheck(e) => {
                format!("Resource {} status {}", e.resource, verb(&e.status))
            }
            Event::FileSync(e) => format!(
                "File sync {} for {} file(s) in {}",
                verb(&e.status),
                e.file_count,
                e.image
            ),
            Event::DebuggingContainer(e) => format!(
                "Debuggable container {}: pod/{}:{} in namespace {}",
                verb(&e.status),
                e.pod_name,
                e.container_name,
                e.namespace
            ),
            Event::DevLoop(e) => format!("Dev loop iteration {} {}", e.iteration, verb(&e.status)),
            Event::Termination(_) => "Session terminated".to_string(),
        };

        match self.actionable_err() {
            Some(err) if !err.message.is_empty() => format!("{}: {}", base, err.message),
            _ => base,
        }
    }

    // ── Constructors used by producers and tests ──

    pub fn meta(entry: impl Into<String>, metadata: Metadata) -> Self {
        Event::Meta(MetaEvent {
            entry: entry.into(),
            metadata,
        })
    }

    pub fn build(artifact: impl Into<String>, status: impl Into<String>) -> Self {
        Event::Build(BuildEvent {
            artifact: artifact.into(),
            status: status.into(),
            actionable_err: None,
        })
    }

    pub fn build_failed(artifact: impl Into<String>, err: ActionableErr) -> Self {
        Event::Build(BuildEvent {
            artifact: artifact.into(),
            status: crate::lifecycle::FAILED.to_string(),
            actionable_err: Some(err),
        })
    }

    pub fn deploy(status: impl Into<String>) -> Self {
        Event::Deploy(DeployEvent {
            status: status.into(),
            actionable_err: None,
        })
    }

    pub fn deploy_failed(err: ActionableErr) -> Self {
        Event::Deploy(DeployEvent {
            status: crate::lifecycle::FAILED.to_string(),
            actionable_err: Some(err),
        })
    }

    pub fn status_check(status: impl Into<String>) -> Self {
        Event::StatusCheck(StatusCheckEvent {
            status: status.into(),
            ..Default::default()
        })
    }

    pub fn resource_status(resource: impl Into<String>, status: impl Into<String>) -> Self {
        Event::ResourceStatusCheck(ResourceStatusCheckEvent {
            resource: resource.into(),
            status: status.into(),
            ..Default::default()
        })
    }

    pub fn file_sync(image: impl Into<String>, file_count: i32, status: impl Into<String>) -> Self {
        Event::FileSync(FileSyncEvent {
            file_count,
            image: image.into(),
            status: status.into(),
            actionable_err: None,
        })
    }

    pub fn debugging_container(
        status: impl Into<String>,
        pod_name: impl Into<String>,
        container_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Event::DebuggingContainer(DebuggingContainerEvent {
            status: status.into(),
            pod_name: pod_name.into(),
            container_name: container_name.into(),
            namespace: namespace.into(),
            ..Default::default()
        })
    }

    pub fn dev_loop(iteration: i32, status: impl Into<String>) -> Self {
        Event::DevLoop(DevLoopEvent {
            iteration,
            status: status.into(),
            actionable_err: None,
        })
    }

    pub fn termination(status: impl Into<String>) -> Self {
        Event::Termination(TerminationEvent {
            status: status.into(),
            actionable_err: None,
        })
    }
}

/// Past-tense phrase for a status string, used in entry descriptions.
fn verb(status: &str) -> String {
    match Lifecycle::classify(status) {
        Lifecycle::NotStarted => "not started".to_string(),
        Lifecycle::InProgress | Lifecycle::Started => "started".to_string(),
        Lifecycle::Pending => "pending".to_string(),
        Lifecycle::Succeeded => "completed".to_string(),
        Lifecycle::Failed => "failed".to_string(),
        Lifecycle::Terminated => "terminated".to_string(),
        Lifecycle::Canceled => "canceled".to_string(),
        Lifecycle::Other => status.to_lowercase(),
    }
}

macro_rules! impl_from_payload {
    ($($payload:ident => $variant:ident),+ $(,)?) => {
        $(
            impl From<$payload> for Event {
                fn from(e: $payload) -> Self {
                    Event::$variant(e)
                }
            }
        )+
    };
}

impl_from_payload! {
    MetaEvent => Meta,
    BuildEvent => Build,
    DeployEvent => Deploy,
    PortForwardEvent => PortForward,
    StatusCheckEvent => StatusCheck,
    ResourceStatusCheckEvent => ResourceStatusCheck,
    FileSyncEvent => FileSync,
    DebuggingContainerEvent => DebuggingContainer,
    DevLoopEvent => DevLoop,
    TerminationEvent => Termination,
}

// ── Log entries ──────────────────────────────────────────────────

/// One record in the event log.
///
/// `sequence` is the append position (0-based) and is the only ordering key.
/// `timestamp` is advisory; two entries may share one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub event: Event,
    pub entry: String,
}

impl LogEntry {
    /// Stamp an event with the current time and its description.
    pub fn new(sequence: u64, event: Event) -> Self {
        let entry = event.describe();
        Self {
            sequence,
            timestamp: Utc::now(),
            event,
            entry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle;

    #[test]
    fn wire_form_has_single_variant_key() {
        let event = Event::build("app", lifecycle::IN_PROGRESS);
        let json = serde_json::to_value(&event).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(json["buildEvent"]["artifact"], "app");
        assert_eq!(json["buildEvent"]["status"], "In Progress");
        // No error attached → key omitted entirely.
        assert!(json["buildEvent"].get("actionableErr").is_none());
    }

    #[test]
    fn decode_empty_object_is_unset() {
        assert_eq!(Event::decode(serde_json::json!({})).unwrap(), None);
        assert_eq!(Event::decode(serde_json::Value::Null).unwrap(), None);
        assert_eq!(Event::decode_str("{}").unwrap(), None);
    }

    #[test]
    fn decode_fills_missing_fields_with_defaults() {
        let event = Event::decode(serde_json::json!({
            "portEvent": { "localPort": 8080, "containerName": "web" }
        }))
        .unwrap()
        .unwrap();
        match event {
            Event::PortForward(pf) => {
                assert_eq!(pf.local_port, 8080);
                assert_eq!(pf.container_name, "web");
                assert!(pf.namespace.is_empty());
            }
            other => panic!("expected port event, got {:?}", other.kind()),
        }
    }

    #[test]
    fn decode_rejects_unknown_variant() {
        let err = Event::decode(serde_json::json!({ "launchEvent": {} })).unwrap_err();
        assert!(matches!(err, ProtoError::MalformedEvent(_)));
    }

    #[test]
    fn actionable_err_carries_numeric_codes() {
        let err = ActionableErr::new(StatusCode::BuildDockerDaemonNotRunning, "daemon down")
            .with_suggestion(SuggestionCode::CheckDockerRunning, "Start the docker daemon");
        let json = serde_json::to_value(Event::build_failed("app", err)).unwrap();
        let wire_err = &json["buildEvent"]["actionableErr"];
        assert_eq!(wire_err["errCode"], 103);
        assert_eq!(wire_err["suggestions"][0]["suggestionCode"], 106);
    }

    #[test]
    fn descriptions_read_naturally() {
        assert_eq!(
            Event::build("app", "InProgress").describe(),
            "Build started for artifact app"
        );
        assert_eq!(Event::deploy(lifecycle::COMPLETE).describe(), "Deploy completed");
        assert_eq!(
            Event::deploy_failed(ActionableErr::new(StatusCode::DeployHelmUserErr, "bad chart"))
                .describe(),
            "Deploy failed: bad chart"
        );
        assert_eq!(
            Event::dev_loop(3, lifecycle::SUCCEEDED).describe(),
            "Dev loop iteration 3 completed"
        );
    }

    #[test]
    fn event_kinds() {
        assert_eq!(Event::termination("Canceled").kind(), EventKind::Termination);
        assert_eq!(
            Event::resource_status("deployment/web", "Pending").kind().as_str(),
            "resource_status_check"
        );
        let from_payload: Event = FileSyncEvent::default().into();
        assert_eq!(from_payload.kind(), EventKind::FileSync);
    }

    #[test]
    fn log_entry_uses_event_description() {
        let entry = LogEntry::new(7, Event::build("app", lifecycle::COMPLETE));
        assert_eq!(entry.sequence, 7);
        assert_eq!(entry.entry, "Build completed for artifact app");
    }
}
