//! Shared state and service endpoints (health, readiness, status, metrics).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;

use super::error::ApiError;
use crate::items::{ItemRepository, ItemStats};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Whether the service is ready to take traffic.
    pub ready: Arc<AtomicBool>,
    /// Item store.
    pub items: Arc<dyn ItemRepository>,
    /// Prometheus render handle, if a recorder was installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state around an item store.
    pub fn new(items: Arc<dyn ItemRepository>) -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(false)),
            items,
            prometheus: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether service is ready.
    pub ready: bool,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Item counts.
    pub stats: ItemStats,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 if ready, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.is_ready();
    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(ReadyResponse { ready }))
}

/// Status handler - returns service status and item counts.
pub async fn status(State(state): State<AppState>) -> Result<Json<StatusResponse>, ApiError> {
    let stats = state
        .items
        .stats()
        .map_err(|e| ApiError::from_store("Failed to compute item stats", e))?;

    let status = if state.is_ready() { "running" } else { "starting" };

    Ok(Json(StatusResponse { status, stats }))
}

/// Prometheus exposition.
pub async fn prometheus_metrics(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = state.prometheus.as_ref().ok_or(ApiError::MetricsDisabled)?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}

/// Fallback for unknown routes.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::InMemoryItemStore;

    #[test]
    fn app_state_ready_toggle() {
        let state = AppState::new(Arc::new(InMemoryItemStore::new()));
        assert!(!state.is_ready());

        state.set_ready(true);
        assert!(state.is_ready());

        state.set_ready(false);
        assert!(!state.is_ready());
    }

    #[test]
    fn clones_share_the_store() {
        let state = AppState::new(Arc::new(InMemoryItemStore::seeded()));
        let clone = state.clone();

        clone.items.delete("1").unwrap();
        assert_eq!(state.items.list().unwrap().len(), 1);
    }
}
