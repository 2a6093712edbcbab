//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::domain::{NodeClient, NodeError};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, every request fails.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
    /// Simulated latency in milliseconds.
    pub latency_ms: Option<u64>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
            latency_ms: None,
        }
    }

    /// Adds simulated latency.
    #[must_use]
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency_ms = Some(ms);
        self
    }
}

#[derive(Debug, Clone)]
enum CannedResponse {
    Body(String),
    Failure(String),
}

/// Mock node client for testing.
///
/// Serves canned bodies per URI. Unknown URIs answer like a node returning
/// 404, wrapped the way the real client reports exhausted retries.
///
/// # Example
///
/// ```
/// use lnd_rest_exporter::test_utils::MockNodeClient;
///
/// let mock = MockNodeClient::new()
///     .with_response("/v1/getinfo", r#"{"num_peers": 3}"#)
///     .with_failure("/v1/channels", "connection reset");
/// assert_eq!(mock.call_count(), 0);
/// ```
pub struct MockNodeClient {
    responses: HashMap<String, CannedResponse>,
    config: MockConfig,
    calls: Mutex<HashMap<String, u64>>,
    call_count: AtomicU64,
}

impl MockNodeClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            responses: HashMap::new(),
            config,
            calls: Mutex::new(HashMap::new()),
            call_count: AtomicU64::new(0),
        }
    }

    /// Creates a mock whose every request fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Serve `body` for `uri`.
    #[must_use]
    pub fn with_response(mut self, uri: impl Into<String>, body: impl Into<String>) -> Self {
        self.responses
            .insert(uri.into(), CannedResponse::Body(body.into()));
        self
    }

    /// Fail every request to `uri`.
    #[must_use]
    pub fn with_failure(mut self, uri: impl Into<String>, message: impl Into<String>) -> Self {
        self.responses
            .insert(uri.into(), CannedResponse::Failure(message.into()));
        self
    }

    /// Gets the number of requests made to any URI.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Gets the number of requests made to `uri`.
    pub fn calls_to(&self, uri: &str) -> u64 {
        self.calls.lock().unwrap().get(uri).copied().unwrap_or(0)
    }

    fn record_call(&self, uri: &str) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.calls.lock().unwrap().entry(uri.to_string()).or_insert(0) += 1;
    }

    fn exhausted(uri: &str, source: NodeError) -> NodeError {
        NodeError::RequestExhausted {
            uri: uri.to_string(),
            attempts: 1,
            source: Box::new(source),
        }
    }
}

impl Default for MockNodeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NodeClient for MockNodeClient {
    async fn get(&self, uri: &str) -> Result<String, NodeError> {
        self.record_call(uri);

        if let Some(ms) = self.config.latency_ms {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock node error".to_string());
            return Err(Self::exhausted(uri, NodeError::Transport(msg)));
        }

        match self.responses.get(uri) {
            Some(CannedResponse::Body(body)) => Ok(body.clone()),
            Some(CannedResponse::Failure(msg)) => {
                Err(Self::exhausted(uri, NodeError::Transport(msg.clone())))
            }
            None => Err(Self::exhausted(
                uri,
                NodeError::http_status(404, uri, "Not Found"),
            )),
        }
    }
}
