use std::path::Path;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use gamehub_core::catalog::{Catalog, CatalogError};

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// `None` when the catalog file is missing or invalid.
    pub catalog: Option<CatalogInfo>,
}

#[derive(Serialize)]
pub struct CatalogInfo {
    pub games: usize,
}

/// Read and validate the catalog file the client will fetch.
pub async fn read_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::Unreadable(e.to_string()))?;
    Catalog::from_json(&body)
}

/// GET /health: server status plus the size of the served catalog.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let catalog = read_catalog(&state.config.catalog_path())
        .await
        .ok()
        .map(|c| CatalogInfo { games: c.len() });

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        catalog,
    })
}

/// GET /ready: ready once the catalog file exists and parses.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, String) {
    match read_catalog(&state.config.catalog_path()).await {
        Ok(_) => (StatusCode::OK, "ready".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "catalog not servable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("not ready: {e}"),
            )
        },
    }
}
