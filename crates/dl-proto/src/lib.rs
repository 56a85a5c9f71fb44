//! # dl-proto
//!
//! Data model shared by every devloop crate.
//!
//! Subsystems (builders, deployers, the file syncer, the status checker)
//! describe what they are doing as [`Event`]s. The event hub records each one
//! as a [`LogEntry`] and folds it into the aggregate [`State`]. Observers read
//! both, and steer the pipeline through [`TriggerState`] and [`Intent`].
//!
//! ## Key components
//!
//! - [`StatusCode`] / [`SuggestionCode`] — numeric error taxonomy; the numbers
//!   are the wire contract and never change
//! - [`Event`] — closed union of the ten event kinds
//! - [`LogEntry`] — one sequenced, timestamped event in the log
//! - [`State`] — the aggregate folded from the log
//! - [`Intent`], [`TriggerKind`], [`Triggers`] — control-plane inputs

pub mod control;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod state;
pub mod status;

pub use control::{Intent, TriggerKind, TriggerState, Triggers};
pub use error::ProtoError;
pub use event::{
    ActionableErr, BuildEvent, BuildMetadata, DebuggingContainerEvent, DeployEvent,
    DeployMetadata, Deployer, DevLoopEvent, Event, EventKind, FileSyncEvent, ImageBuilder,
    LogEntry, MetaEvent, Metadata, PortForwardEvent, ResourceStatusCheckEvent, StatusCheckEvent,
    Suggestion, TerminationEvent,
};
pub use lifecycle::Lifecycle;
pub use state::{BuildState, DeployState, FileSyncState, SessionSeed, State, StatusCheckState};
pub use status::{
    BuildType, BuilderType, ClusterType, DeployerType, StatusBand, StatusCode, SuggestionCode,
};
