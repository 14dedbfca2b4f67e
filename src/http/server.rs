use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use super::types::ScanResponse;
use crate::scan::engine::ScanEngine;

#[derive(Clone)]
struct AppState {
    engine: Arc<ScanEngine>,
}

/// Builds the service router. Kept separate from [`start_server`] so tests
/// can drive the routes without binding a socket.
pub fn router(engine: Arc<ScanEngine>) -> Router {
    let state = AppState { engine };

    Router::new()
        .route("/api/v1/invoice-scan", get(scan_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, engine: Arc<ScanEngine>) -> anyhow::Result<()> {
    let app = router(engine);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("invoice scan API listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct ScanParams {
    url: String,
}

/// One scan request end to end. Accepted documents answer 200, rejected
/// ones 400, and every fetch/extract/empty-content failure 500 with the
/// same envelope shape.
async fn scan_handler(
    State(state): State<AppState>,
    Query(params): Query<ScanParams>,
) -> impl IntoResponse {
    let scan_id = Uuid::new_v4();
    info!(target: "http", %scan_id, url = %params.url, "scan request received");

    match state.engine.scan_url(&params.url).await {
        Ok(outcome) => {
            let status = if outcome.rejected {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::OK
            };
            info!(target: "http", %scan_id, rejected = outcome.rejected, "scan completed");
            (status, Json(ScanResponse::from_outcome(&outcome)))
        }
        Err(e) => {
            error!(target: "http", %scan_id, url = %params.url, "scan failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScanResponse::failure(e)),
            )
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
