//! HTTP server for the audio streaming proxy
//!
//! Routes:
//! - `GET /` plain-text status message
//! - `GET /stream?url=...&format=...` audio relay from the extraction tool

use axum::{
    Router,
    body::Body,
    extract::{RawQuery, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{RadioError, Result};

use super::extractor::Extractor;
use super::relay::{FinishReason, StreamLifecycle, relay};
use super::request::StreamRequest;

/// Body of `GET /`
pub const STATUS_MESSAGE: &str = "Wave Radio Proxy is running. Use /stream?url=...";

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Extraction tool used for every stream
    pub extractor: Extractor,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            extractor: Extractor::new(config.extractor.clone()),
        }
    }
}

/// The streaming proxy server
pub struct ProxyServer {
    config: Config,
}

impl ProxyServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Bind the listener and serve until Ctrl+C or SIGTERM
    pub async fn serve(&self) -> Result<()> {
        let app = create_router(Arc::new(AppState::from_config(&self.config)));
        let addr = self.config.server.listen_addr()?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| RadioError::Server(format!("Failed to bind to {addr}: {e}")))?;

        tracing::info!("Wave Radio Proxy listening on port {}", addr.port());
        tracing::info!(
            "Extraction tool: {}",
            self.config.extractor.program.display()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| RadioError::Server(format!("Server error: {e}")))?;

        tracing::info!("Proxy server shut down gracefully");
        Ok(())
    }
}

/// Create the router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(status_handler))
        .route("/stream", get(stream_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn status_handler() -> &'static str {
    STATUS_MESSAGE
}

/// Validate the request, start the extraction tool and hand its stdout to
/// the response body.
async fn stream_handler(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let (mut lifecycle, stream) = StreamLifecycle::new(Uuid::new_v4());
    let span = tracing::info_span!("stream", stream_id = %lifecycle.id());

    let request = match StreamRequest::from_query(
        query.as_deref(),
        &state.extractor.config().default_format,
    ) {
        Ok(request) => request,
        Err(e) => {
            span.in_scope(|| tracing::warn!(reason = e.category(), "Rejected stream request: {e}"));
            lifecycle.finish(FinishReason::Rejected);
            return e.into_response();
        }
    };

    span.in_scope(|| {
        tracing::info!(
            url = %request.source_url,
            format = %request.format,
            "Starting stream"
        )
    });
    lifecycle.begin_streaming();

    match state.extractor.spawn(&request) {
        Ok(child) => {
            let config = state.extractor.config();
            tokio::spawn(
                relay(lifecycle, child, config.relay_chunk_bytes, config.exit_grace())
                    .instrument(span),
            );
        }
        Err(e) => {
            // Empty audio body
            span.in_scope(|| tracing::error!("{e}"));
            lifecycle.finish(FinishReason::SpawnFailed);
        }
    }

    audio_response(Body::from_stream(stream))
}

fn audio_response(body: Body) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        ],
        body,
    )
        .into_response()
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        },
    }
}
