//! HTTP API: health check, update submission, dashboard history.
//!
//! Malformed bodies are rejected by the JSON extractor before a handler
//! runs. Storage faults become 500 responses; the server keeps serving.

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::error::HushError;
use crate::service::{HealthResponse, HushService, ModelUpdatePayload, UpdateResponse};
use crate::storage::DashboardSnapshot;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<HushService>,
}

type HandlerError = (StatusCode, String);

fn internal_error(err: anyhow::Error) -> HandlerError {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

/// Run blocking store work off the async runtime
async fn run_blocking<T, F>(f: F) -> Result<T, HandlerError>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| internal_error(HushError::Server(e.to_string()).into()))?
        .map_err(internal_error)
}

async fn handle_root() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

async fn handle_submit_update(
    State(state): State<AppState>,
    Json(payload): Json<ModelUpdatePayload>,
) -> Result<Json<UpdateResponse>, HandlerError> {
    let service = Arc::clone(&state.service);
    let response = run_blocking(move || service.submit_update(payload)).await?;
    Ok(Json(response))
}

async fn handle_dashboard_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<DashboardSnapshot>>, HandlerError> {
    let service = Arc::clone(&state.service);
    let snapshots = run_blocking(move || service.dashboard_data()).await?;
    Ok(Json(snapshots))
}

/// Build the API router
///
/// CORS allows every origin, method, and header, with credentials.
pub fn router(service: Arc<HushService>) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/v1/submit-update", post(handle_submit_update))
        .route("/v1/dashboard-data", get(handle_dashboard_data))
        .layer(CorsLayer::very_permissive())
        .with_state(AppState { service })
}

/// Bootstrap the store and serve until Ctrl+C or SIGTERM
///
/// Bootstrap failures abort startup. In-flight requests complete before
/// the server exits.
pub async fn run_server(config: &Config) -> Result<()> {
    tracing::info!("Server starting up...");
    let service = Arc::new(HushService::from_config(config)?);
    service.bootstrap()?;

    let app = router(service);
    let listener = TcpListener::bind(config.server.bind_addr.as_str())
        .await
        .map_err(|e| {
            HushError::Server(format!(
                "failed to bind {}: {}",
                config.server.bind_addr, e
            ))
        })?;
    tracing::info!(
        "HUSH backend listening on {} (db={}, noise_scale={}, Ctrl+C/SIGTERM to stop)",
        config.server.bind_addr,
        config.storage.db_path,
        config.privacy.noise_scale
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl+C: {}", e);
        }
    }
}
