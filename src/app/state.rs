//! Application state management.
//!
//! This module provides the shared application state that is
//! accessible to all request handlers via Axum's State extractor.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::Heartbeat;

use super::registry::CollectorRegistry;

/// Shared application state for the exposition server.
///
/// The registry is immutable after startup; the heartbeat is the only value
/// written while serving, and it is atomic.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<CollectorRegistry>,
    pub heartbeat: Arc<Heartbeat>,
    /// Maximum heartbeat age for `/health/ready` to report ready.
    pub readiness_window: Duration,
}

impl AppState {
    /// Creates a new `AppState` sharing the registry's heartbeat.
    #[must_use]
    pub fn new(registry: CollectorRegistry, readiness_window: Duration) -> Self {
        let heartbeat = Arc::clone(registry.heartbeat());
        Self {
            registry: Arc::new(registry),
            heartbeat,
            readiness_window,
        }
    }

    /// Whether the node answered successfully within the readiness window.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.heartbeat
            .seconds_since_success()
            .is_some_and(|age| age <= self.readiness_window.as_secs_f64())
    }
}
