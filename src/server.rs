//! HTTP surface for the search service.
//!
//! ## Endpoints
//!
//! - `POST /api/search`: search, extract and answer (`{query, max_results?}`)
//! - `GET /api/llm-status`: per-provider availability
//! - `GET /health`: liveness and crate version
//!
//! Errors are returned as `{"detail": "..."}`. A blank query is a `400`;
//! any other failure, including a panicking handler, is a `500` with a fixed
//! message and details go to the log.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use sift_search::ContentSource;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::coordinator::RequestCoordinator;
use crate::error::SiftError;

/// Message returned for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

/// Body of `POST /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    pub query: String,
    /// Requested result count; defaulted and clamped by the search config.
    #[serde(default)]
    pub max_results: Option<usize>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the server answers.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Error body returned with any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub detail: String,
}

impl IntoResponse for SiftError {
    fn into_response(self) -> Response {
        let (status, detail) = if self.is_client_error() {
            (StatusCode::BAD_REQUEST, "Query parameter cannot be empty".to_owned())
        } else {
            tracing::error!(error = %self, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_ERROR_MESSAGE.to_owned(),
            )
        };
        (status, Json(ErrorResponse { detail })).into_response()
    }
}

/// Build the application router over a shared coordinator.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn router<S>(coordinator: Arc<RequestCoordinator<S>>, allowed_origins: &[String]) -> Router
where
    S: ContentSource + 'static,
{
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", post(handle_search::<S>))
        .route("/api/llm-status", get(handle_llm_status::<S>))
        .route("/health", get(handle_health))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(coordinator)
}

/// Turn a handler panic into the generic `500` body.
fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned());
    tracing::error!(panic = %message, "request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: INTERNAL_ERROR_MESSAGE.to_owned(),
        }),
    )
        .into_response()
}

// ---------------------------------------------------------------------------
// SiftServer
// ---------------------------------------------------------------------------

/// The search HTTP server running in a background task.
pub struct SiftServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl SiftServer {
    /// Start serving `coordinator` on `{config.host}:{config.port}`.
    ///
    /// Use port `0` for auto-assign.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Server`] if the TCP listener cannot bind.
    pub async fn start<S>(
        coordinator: Arc<RequestCoordinator<S>>,
        config: &ServerConfig,
    ) -> crate::error::Result<Self>
    where
        S: ContentSource + 'static,
    {
        let app = router(coordinator, &config.allowed_origins);

        let bind_addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| SiftError::Server(format!("bind to {bind_addr} failed: {e}")))?;

        let addr = listener
            .local_addr()
            .map_err(|e| SiftError::Server(format!("failed to get local addr: {e}")))?;

        info!("search server listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("search server error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SiftServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// `POST /api/search`
async fn handle_search<S: ContentSource + 'static>(
    State(coordinator): State<Arc<RequestCoordinator<S>>>,
    Json(request): Json<SearchRequest>,
) -> Response {
    tracing::debug!(query = %request.query, max_results = ?request.max_results, "search request");
    match coordinator.search(&request.query, request.max_results).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => e.into_response(),
    }
}

/// `GET /api/llm-status`
async fn handle_llm_status<S: ContentSource + 'static>(
    State(coordinator): State<Arc<RequestCoordinator<S>>>,
) -> Json<BTreeMap<String, bool>> {
    Json(coordinator.provider_status().await)
}

/// `GET /health`
async fn handle_health() -> Json<HealthResponse> {
    Json(health())
}

fn health() -> HealthResponse {
    HealthResponse {
        status: "healthy".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    }
}
