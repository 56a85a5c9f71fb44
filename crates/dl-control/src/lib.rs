//! # dl-control
//!
//! The control plane of a devloop session: auto-trigger flags for build,
//! sync, and deploy, plus the slots holding manual execute requests until
//! the executor picks them up.
//!
//! None of this goes through the event log. Trigger changes are visible to
//! state readers because the service overlays them on each state snapshot.

pub mod error;
pub mod plane;

pub use error::ControlError;
pub use plane::ControlPlane;
