// state.rs — The aggregate state folded from the event log.
//
// `State` is a plain value. The event hub owns the live copy and hands out
// `Arc<State>` snapshots, so nothing outside the reducer ever mutates one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::control::Triggers;
use crate::event::{DebuggingContainerEvent, Metadata, PortForwardEvent};
use crate::lifecycle::NOT_STARTED;
use crate::status::StatusCode;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildState {
    /// Artifact name → latest build status string.
    pub artifacts: BTreeMap<String, String>,
    pub auto_trigger: bool,
    pub status_code: StatusCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployState {
    pub status: String,
    pub auto_trigger: bool,
    pub status_code: StatusCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCheckState {
    pub status: String,
    /// Resource name (e.g. `deployment/web`) → latest status string.
    pub resources: BTreeMap<String, String>,
    pub status_code: StatusCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSyncState {
    pub status: String,
    pub auto_trigger: bool,
}

/// The single canonical summary of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub build_state: BuildState,
    pub deploy_state: DeployState,
    /// Local port → most recent forward for that port.
    pub forwarded_ports: BTreeMap<i32, PortForwardEvent>,
    pub status_check_state: StatusCheckState,
    pub file_sync_state: FileSyncState,
    pub debugging_containers: Vec<DebuggingContainerEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// What the session knows before any event arrives.
///
/// Deserializes straight from the `[session]` table of the daemon config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSeed {
    /// Artifacts the pipeline will build, reported as "Not Started" until
    /// their first build event.
    #[serde(default)]
    pub artifacts: Vec<String>,

    #[serde(default = "default_true")]
    pub auto_build: bool,

    #[serde(default = "default_true")]
    pub auto_sync: bool,

    #[serde(default = "default_true")]
    pub auto_deploy: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SessionSeed {
    fn default() -> Self {
        Self {
            artifacts: Vec::new(),
            auto_build: true,
            auto_sync: true,
            auto_deploy: true,
        }
    }
}

impl SessionSeed {
    /// The control-plane flags this seed starts the session with.
    pub fn triggers(&self) -> Triggers {
        Triggers {
            build: self.auto_build,
            sync: self.auto_sync,
            deploy: self.auto_deploy,
        }
    }
}

impl State {
    /// The identity of the fold: the state before the first log entry.
    pub fn initial(seed: &SessionSeed) -> Self {
        Self {
            build_state: BuildState {
                artifacts: seed
                    .artifacts
                    .iter()
                    .map(|a| (a.clone(), NOT_STARTED.to_string()))
                    .collect(),
                auto_trigger: seed.auto_build,
                status_code: StatusCode::Ok,
            },
            deploy_state: DeployState {
                status: NOT_STARTED.to_string(),
                auto_trigger: seed.auto_deploy,
                status_code: StatusCode::Ok,
            },
            forwarded_ports: BTreeMap::new(),
            status_check_state: StatusCheckState {
                status: NOT_STARTED.to_string(),
                resources: BTreeMap::new(),
                status_code: StatusCode::Ok,
            },
            file_sync_state: FileSyncState {
                status: NOT_STARTED.to_string(),
                auto_trigger: seed.auto_sync,
            },
            debugging_containers: Vec::new(),
            metadata: None,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        State::initial(&SessionSeed::default())
    }
}
