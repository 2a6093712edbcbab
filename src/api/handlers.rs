//! HTTP request handlers for the exposition surface.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::debug;

use crate::app::AppState;
use crate::infra::{PROMETHEUS_CONTENT_TYPE, render_families};

/// Evaluate every registered collector and render the text exposition page.
///
/// Failing collectors are omitted from the page; the response is still 200.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let outcome = state.registry.gather().await;
    debug!(
        families = outcome.families.len(),
        failed = outcome.failed.len(),
        "Scrape complete"
    );
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        render_families(&outcome.families),
    )
}

/// Process liveness probe. Independent of the node.
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe: ready once the node answered within the readiness window.
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
