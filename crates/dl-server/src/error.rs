// error.rs — Service errors and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dl_control::ControlError;
use dl_events::EventsError;
use dl_proto::ProtoError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The caller named an unknown trigger or phase.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A request body could not be decoded.
    #[error("invalid request body: {0}")]
    Decode(String),

    /// The session has ended; nothing more can be appended.
    #[error("session has ended")]
    Closed,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerError::InvalidArgument(_) => "invalid_argument",
            ServerError::Decode(_) => "decode",
            ServerError::Closed => "closed",
            ServerError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::InvalidArgument(_) | ServerError::Decode(_) => StatusCode::BAD_REQUEST,
            ServerError::Closed => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EventsError> for ServerError {
    fn from(err: EventsError) -> Self {
        match err {
            EventsError::Closed => ServerError::Closed,
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<ControlError> for ServerError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::InvalidArgument(msg) => ServerError::InvalidArgument(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<ProtoError> for ServerError {
    fn from(err: ProtoError) -> Self {
        match err {
            ProtoError::UnknownTrigger(_) => ServerError::InvalidArgument(err.to_string()),
            ProtoError::MalformedEvent(_) => ServerError::Decode(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}
