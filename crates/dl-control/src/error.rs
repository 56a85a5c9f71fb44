// error.rs — Errors returned by the control plane.

use thiserror::Error;

use dl_proto::ProtoError;

#[derive(Debug, Error)]
pub enum ControlError {
    /// The request named something the control plane does not know.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("control plane lock poisoned")]
    LockPoisoned,
}

impl From<ProtoError> for ControlError {
    fn from(err: ProtoError) -> Self {
        ControlError::InvalidArgument(err.to_string())
    }
}
