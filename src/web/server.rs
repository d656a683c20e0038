//! Axum HTTP server for the mini-app manifest.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderName, Method, header},
    response::IntoResponse,
    routing::get,
};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ServerError;
use crate::manifest::{MANIFEST_CACHE_CONTROL, ManifestBuilder};
use crate::web::types::HealthResponse;

pub const MANIFEST_PATH: &str = "/.well-known/farcaster.json";
const SERVER_NAME: &str = "manifest";

/// The manifest body depends on the request origin, so shared caches must
/// key on the forwarding headers as well as the CORS preflight ones.
const VARY_HEADERS: [HeaderName; 6] = [
    header::ORIGIN,
    header::ACCESS_CONTROL_REQUEST_METHOD,
    header::ACCESS_CONTROL_REQUEST_HEADERS,
    header::HOST,
    HeaderName::from_static("x-forwarded-host"),
    HeaderName::from_static("x-forwarded-proto"),
];

/// Shared state for all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub manifest: ManifestBuilder,
}

impl AppState {
    pub fn new(manifest: ManifestBuilder) -> Self {
        Self { manifest }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    // Hosts fetch the manifest cross-origin from arbitrary clients.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .vary(VARY_HEADERS);

    Router::new()
        .route(MANIFEST_PATH, get(manifest_handler))
        .route("/api/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Running server. Dropping the handle shuts the server down.
#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    /// Actual bound address (useful when binding to port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests to drain.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        let _ = self.shutdown_tx.send(());
        self.task.await.map_err(|e| ServerError::Serve {
            name: SERVER_NAME.to_string(),
            reason: format!("server task panicked: {}", e),
        })?
    }
}

/// Bind `addr` and serve in a background task.
pub async fn start_server(
    addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<ServerHandle, ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::StartupFailed {
            name: SERVER_NAME.to_string(),
            reason: format!("Failed to bind to {}: {}", addr, e),
        })?;
    let bound_addr = listener
        .local_addr()
        .map_err(|e| ServerError::StartupFailed {
            name: SERVER_NAME.to_string(),
            reason: format!("Failed to get local addr: {}", e),
        })?;

    let app = router(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("Manifest server shutting down");
            })
            .await
            .map_err(|e| {
                tracing::error!("Manifest server error: {}", e);
                ServerError::Serve {
                    name: SERVER_NAME.to_string(),
                    reason: e.to_string(),
                }
            })
    });

    tracing::info!("Manifest server listening on http://{}", bound_addr);
    Ok(ServerHandle {
        addr: bound_addr,
        shutdown_tx,
        task,
    })
}

async fn manifest_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let origin = request_origin(&headers);
    let manifest = state.manifest.build(origin.as_deref());
    (
        [(header::CACHE_CONTROL, MANIFEST_CACHE_CONTROL)],
        Json(manifest),
    )
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVER_NAME,
    })
}

/// `scheme://host` the client used, honouring proxy forwarding headers.
fn request_origin(headers: &HeaderMap) -> Option<String> {
    let host = first_header_value(headers, "x-forwarded-host")
        .or_else(|| first_header_value(headers, header::HOST.as_str()))?;
    let proto = first_header_value(headers, "x-forwarded-proto").unwrap_or("http");
    Some(format!("{}://{}", proto, host))
}

fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
