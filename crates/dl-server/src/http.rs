// http.rs — HTTP/JSON gateway over the control service.
//
// Routes (all JSON, camelCase fields):
//   GET  /v2/state                  aggregate state
//   GET  /v2/events                 SSE: replay, then live entries
//   POST /v2/events                 submit an event ({} is ignored)
//   POST /v2/execute                request a build/sync/deploy run
//   PUT  /v2/{phase}/auto_execute   toggle an auto-trigger
//   GET  /v2/triggers               current trigger flags
//
// The SSE stream carries one `LogEntry` per message with `id` set to its
// sequence. A reconnecting client may pass `Last-Event-ID` (or `?after=`) to
// skip what it already has. A subscriber cut off for lagging receives a
// final `lagged` event naming its last delivered sequence.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use dl_events::SubscriptionError;
use dl_proto::{Event, Intent, TriggerState, Triggers};
use serde::Deserialize;
use tokio_stream::Stream;
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::service::{Ack, ControlService};

/// Name of the final SSE event sent to a lagging subscriber.
pub const LAGGED_EVENT: &str = "lagged";

/// Gateway options that are not part of the service itself.
#[derive(Debug, Clone, Copy)]
pub struct GatewayOptions {
    pub keep_alive: Duration,
    pub cors: bool,
}

impl GatewayOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            keep_alive: config.events.keep_alive(),
            cors: config.cors,
        }
    }
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self::from_config(&ServerConfig::default())
    }
}

#[derive(Clone)]
struct AppState {
    service: ControlService,
    keep_alive: Duration,
}

/// Build the gateway router.
pub fn router(service: ControlService, options: GatewayOptions) -> Router {
    let app = AppState {
        service,
        keep_alive: options.keep_alive,
    };

    let router = Router::new()
        .route("/v2/state", get(get_state))
        .route("/v2/events", get(stream_events).post(handle_event))
        .route("/v2/execute", post(execute))
        .route("/v2/{phase}/auto_execute", put(auto_execute))
        .route("/v2/triggers", get(get_triggers))
        .with_state(app);

    if options.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn get_state(State(app): State<AppState>) -> Result<Json<dl_proto::State>, ServerError> {
    Ok(Json(app.service.get_state()?))
}

#[derive(Debug, Default, Deserialize)]
struct EventsQuery {
    after: Option<u64>,
}

async fn stream_events(
    State(app): State<AppState>,
    Query(query): Query<EventsQuery>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, ServerError> {
    let after = query.after.or_else(|| last_event_id(&headers));
    let mut subscription = app.service.events_after(after)?;
    tracing::debug!(after = ?after, "event stream opened");

    let stream = async_stream::stream! {
        loop {
            match subscription.recv().await {
                Ok(Some(entry)) => {
                    match SseEvent::default()
                        .id(entry.sequence.to_string())
                        .json_data(&*entry)
                    {
                        Ok(message) => yield Ok::<_, Infallible>(message),
                        Err(e) => {
                            tracing::error!(
                                sequence = entry.sequence,
                                error = %e,
                                "failed to encode entry"
                            );
                            break;
                        }
                    }
                }
                Ok(None) => break,
                Err(SubscriptionError::Lagged { last_delivered }) => {
                    let data = serde_json::json!({ "lastDelivered": last_delivered });
                    yield Ok(SseEvent::default().event(LAGGED_EVENT).data(data.to_string()));
                    break;
                }
            }
        }
        tracing::debug!("event stream closed");
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(app.keep_alive)))
}

fn last_event_id(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("last-event-id")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

async fn handle_event(
    State(app): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<Ack>, ServerError> {
    let Json(value) = body.map_err(decode_error)?;
    let event = Event::decode(value)?;
    Ok(Json(app.service.handle(event)?))
}

async fn execute(
    State(app): State<AppState>,
    body: Result<Json<Intent>, JsonRejection>,
) -> Result<Json<Ack>, ServerError> {
    let Json(intent) = body.map_err(decode_error)?;
    Ok(Json(app.service.execute(intent)?))
}

async fn auto_execute(
    State(app): State<AppState>,
    Path(phase): Path<String>,
    body: Result<Json<TriggerState>, JsonRejection>,
) -> Result<Json<Ack>, ServerError> {
    let Json(request) = body.map_err(decode_error)?;
    Ok(Json(app.service.set_trigger(&phase, request)?))
}

async fn get_triggers(State(app): State<AppState>) -> Result<Json<Triggers>, ServerError> {
    Ok(Json(app.service.triggers()?))
}

fn decode_error(rejection: JsonRejection) -> ServerError {
    ServerError::Decode(rejection.body_text())
}
