//! HTTP routing configuration.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::app::AppState;

use super::handlers::{liveness_handler, metrics_handler, readiness_handler};

/// Create the exposition router.
///
/// No request timeout layer is applied: a scrape is bounded by the node
/// client's per-attempt timeout and retry count.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let middleware = ServiceBuilder::new().layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
    );

    let health_routes = Router::new()
        .route("/live", get(liveness_handler))
        .route("/ready", get(readiness_handler));

    Router::new()
        .route("/metrics", get(metrics_handler))
        .nest("/health", health_routes)
        .layer(middleware)
        .with_state(app_state)
}
