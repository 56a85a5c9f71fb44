// control.rs — Control-plane inputs: trigger flags and one-shot intents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProtoError;

/// The three pipeline phases that can run automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Build,
    Sync,
    Deploy,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 3] = [TriggerKind::Build, TriggerKind::Sync, TriggerKind::Deploy];

    pub fn as_str(self) -> &'static str {
        match self {
            TriggerKind::Build => "build",
            TriggerKind::Sync => "sync",
            TriggerKind::Deploy => "deploy",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "build" => Ok(TriggerKind::Build),
            "sync" => Ok(TriggerKind::Sync),
            "deploy" => Ok(TriggerKind::Deploy),
            _ => Err(ProtoError::UnknownTrigger(s.to_string())),
        }
    }
}

/// Request body for toggling one trigger flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerState {
    pub enabled: bool,
}

impl TriggerState {
    pub fn enabled() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

/// Current value of all three trigger flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triggers {
    pub build: bool,
    pub sync: bool,
    pub deploy: bool,
}

impl Triggers {
    pub fn get(&self, kind: TriggerKind) -> bool {
        match kind {
            TriggerKind::Build => self.build,
            TriggerKind::Sync => self.sync,
            TriggerKind::Deploy => self.deploy,
        }
    }

    pub fn set(&mut self, kind: TriggerKind, enabled: bool) {
        match kind {
            TriggerKind::Build => self.build = enabled,
            TriggerKind::Sync => self.sync = enabled,
            TriggerKind::Deploy => self.deploy = enabled,
        }
    }
}

impl Default for Triggers {
    fn default() -> Self {
        Self {
            build: true,
            sync: true,
            deploy: true,
        }
    }
}

/// A one-shot request to run some phases once, regardless of triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intent {
    pub build: bool,
    pub sync: bool,
    pub deploy: bool,
}

impl Intent {
    pub fn only(kind: TriggerKind) -> Self {
        let mut intent = Intent::default();
        intent.set(kind, true);
        intent
    }

    pub fn requests(&self, kind: TriggerKind) -> bool {
        match kind {
            TriggerKind::Build => self.build,
            TriggerKind::Sync => self.sync,
            TriggerKind::Deploy => self.deploy,
        }
    }

    pub fn set(&mut self, kind: TriggerKind, requested: bool) {
        match kind {
            TriggerKind::Build => self.build = requested,
            TriggerKind::Sync => self.sync = requested,
            TriggerKind::Deploy => self.deploy = requested,
        }
    }

    /// Requested kinds, in build → sync → deploy order.
    pub fn kinds(&self) -> impl Iterator<Item = TriggerKind> + '_ {
        TriggerKind::ALL.into_iter().filter(|k| self.requests(*k))
    }

    pub fn is_empty(&self) -> bool {
        !(self.build || self.sync || self.deploy)
    }
}
