//! # dl-server
//!
//! The devloop control service and its HTTP gateway.
//!
//! [`ControlService`] ties one session's [`EventHub`](dl_events::EventHub)
//! to its [`ControlPlane`](dl_control::ControlPlane) and exposes the
//! observer and producer operations. [`http::router`] serves those
//! operations as JSON over HTTP, with the event log streamed as SSE.
//! [`ServerConfig`] is the daemon's `devloop.toml`.

pub mod config;
pub mod error;
pub mod http;
pub mod service;

use std::future::Future;

pub use config::{ConfigError, EventsConfig, ServerConfig};
pub use error::ServerError;
pub use http::{router, GatewayOptions};
pub use service::{Ack, ControlService};

/// Serve the gateway on `listener` until `shutdown` resolves.
///
/// In-flight event streams keep the server alive during graceful shutdown,
/// so `shutdown` should end the session before it resolves.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    service: ControlService,
    options: GatewayOptions,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(service, options);
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, cors = options.cors, "gateway listening");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
