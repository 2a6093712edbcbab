//! REST client for LND.
//!
//! Every attempt opens a fresh connection: the idle pool is disabled and each
//! request carries `Connection: close`, so a socket the node already dropped
//! is never reused. The per-attempt timeout bounds the whole cycle, connect
//! through the last byte of the body.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, instrument, warn};

use crate::domain::{AppError, Heartbeat, NodeClient, NodeError};

/// Header LND's REST gateway reads the hex macaroon from.
pub const MACAROON_HEADER: &str = "Grpc-Metadata-macaroon";

/// Bounded retry behaviour for node requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, at least 1.
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Also sleep `retry_delay` after the last failed attempt before giving up.
    pub sleep_after_final_failure: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            retry_delay: Duration::from_secs(10),
            sleep_after_final_failure: false,
        }
    }
}

impl RetryPolicy {
    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    fn should_sleep_after(&self, attempt: u32) -> bool {
        attempt < self.attempts() || self.sleep_after_final_failure
    }
}

/// Configuration for the LND REST client
#[derive(Debug)]
pub struct LndClientConfig {
    pub host: String,
    pub port: u16,
    /// `false` talks plain HTTP; only useful against local test servers.
    pub tls: bool,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub credential: SecretString,
}

impl LndClientConfig {
    pub fn new(host: impl Into<String>, port: u16, credential: SecretString) -> Self {
        Self {
            host: host.into(),
            port,
            tls: true,
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            credential,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.tls { "https" } else { "http" };
        format!("{}://{}:{}", scheme, self.host, self.port)
    }
}

/// LND REST client with bounded timeouts and retries.
pub struct LndRestClient {
    http_client: Client,
    base_url: String,
    credential: SecretString,
    timeout: Duration,
    retry: RetryPolicy,
    heartbeat: Arc<Heartbeat>,
}

impl LndRestClient {
    /// Create a client that records successful fetches into `heartbeat`.
    pub fn new(config: LndClientConfig, heartbeat: Arc<Heartbeat>) -> Result<Self, AppError> {
        // LND ships a self-signed certificate; the macaroon is the trust anchor.
        let http_client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url();
        info!(
            base_url = %base_url,
            timeout = ?config.timeout,
            max_retries = config.retry.max_retries,
            "Created LND REST client"
        );

        Ok(Self {
            http_client,
            base_url,
            credential: config.credential,
            timeout: config.timeout,
            retry: config.retry,
            heartbeat,
        })
    }

    /// Execute a single GET on a fresh connection.
    async fn get_once(&self, uri: &str) -> Result<String, NodeError> {
        let url = format!("{}{}", self.base_url, uri);

        let response = self
            .http_client
            .get(&url)
            .header(MACAROON_HEADER, self.credential.expose_secret())
            .header(header::CONNECTION, "close")
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        if status.as_u16() >= 400 {
            return Err(NodeError::http_status(status.as_u16(), uri, &body));
        }

        Ok(body)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> NodeError {
        if err.is_timeout() {
            NodeError::Timeout(format!("no complete response within {:?}", self.timeout))
        } else {
            NodeError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl NodeClient for LndRestClient {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn get(&self, uri: &str) -> Result<String, NodeError> {
        let attempts = self.retry.attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.get_once(uri).await {
                Ok(body) => {
                    self.heartbeat.record_success();
                    debug!(attempt = attempt, bytes = body.len(), "LND request succeeded");
                    return Ok(body);
                }
                Err(e) => {
                    warn!(
                        attempt = attempt,
                        max_attempts = attempts,
                        error = %e,
                        "LND request failed"
                    );
                    last_error = Some(e);
                    if self.retry.should_sleep_after(attempt) {
                        tokio::time::sleep(self.retry.retry_delay).await;
                    }
                }
            }
        }

        Err(NodeError::RequestExhausted {
            uri: uri.to_string(),
            attempts,
            source: Box::new(
                last_error.unwrap_or_else(|| NodeError::Transport("no attempt made".to_string())),
            ),
        })
    }
}
