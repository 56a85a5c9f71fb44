// error.rs — Error types for decoding protocol values.

use thiserror::Error;

/// Errors that can occur while decoding wire values.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// A trigger name other than `build`, `sync`, or `deploy`.
    #[error("unknown trigger '{0}' (expected build, sync, or deploy)")]
    UnknownTrigger(String),

    /// An event body was not a valid event object.
    #[error("malformed event: {0}")]
    MalformedEvent(#[from] serde_json::Error),
}
