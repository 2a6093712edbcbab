//! Scrape-time collectors.
//!
//! Each collector performs exactly one node round trip per scrape. Nothing
//! is cached between scrapes or shared between collectors that hit the same
//! endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::{
    ChannelsResponse, Collector, MetricFamily, NodeClient, NodeError, ParsedCommand,
    PaymentsResponse, Sample, coerce_to_f64,
};

pub const CHANNELS_ENDPOINT: &str = "/v1/channels";
pub const PAYMENTS_ENDPOINT: &str = "/v1/payments?include_incomplete=true";

pub const PENDING_HTLCS_METRIC: &str = "pending_htlcs";
pub const FAILED_PAYMENTS_METRIC: &str = "failed_payments";

/// Build the collector a resolved command binds to.
///
/// Built-in collectors report under their fixed metric names; `label` only
/// names user-declared path queries.
pub fn build_collector(
    label: &str,
    command_text: &str,
    command: ParsedCommand,
    client: Arc<dyn NodeClient>,
) -> Arc<dyn Collector> {
    match command {
        ParsedCommand::PathQuery { endpoint, key_path } => Arc::new(PathQueryGauge::new(
            label,
            command_text,
            endpoint,
            key_path,
            client,
        )),
        ParsedCommand::BuiltinHtlc => Arc::new(HtlcCollector::new(client)),
        ParsedCommand::BuiltinFailedPayments => Arc::new(FailedPaymentsCollector::new(client)),
    }
}

/// A single unlabeled gauge bound to an endpoint and key path.
pub struct PathQueryGauge {
    name: String,
    help: String,
    endpoint: String,
    key_path: Vec<String>,
    dotted_path: String,
    client: Arc<dyn NodeClient>,
}

impl PathQueryGauge {
    pub fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        endpoint: impl Into<String>,
        key_path: Vec<String>,
        client: Arc<dyn NodeClient>,
    ) -> Self {
        let dotted_path = key_path.join(".");
        Self {
            name: name.into(),
            help: help.into(),
            endpoint: endpoint.into(),
            key_path,
            dotted_path,
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn key_path(&self) -> &[String] {
        &self.key_path
    }

    /// Fetch and coerce the current value.
    pub async fn value(&self) -> Result<f64, NodeError> {
        let raw = self
            .client
            .fetch_path(&self.endpoint, &self.key_path)
            .await?;
        coerce_to_f64(&raw, &self.dotted_path)
    }
}

#[async_trait]
impl Collector for PathQueryGauge {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(metric = %self.name, endpoint = %self.endpoint))]
    async fn collect(&self) -> Result<MetricFamily, NodeError> {
        let value = self.value().await?;
        Ok(MetricFamily::new(&self.name, &self.help).with_sample(Sample::unlabeled(value)))
    }
}

/// Pending HTLC count per channel, labeled by short channel id.
pub struct HtlcCollector {
    client: Arc<dyn NodeClient>,
}

impl HtlcCollector {
    pub fn new(client: Arc<dyn NodeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Collector for HtlcCollector {
    fn name(&self) -> &str {
        PENDING_HTLCS_METRIC
    }

    #[instrument(skip(self))]
    async fn collect(&self) -> Result<MetricFamily, NodeError> {
        let body = self.client.get(CHANNELS_ENDPOINT).await?;
        let response: ChannelsResponse = serde_json::from_str(&body)?;

        let mut family = MetricFamily::new(PENDING_HTLCS_METRIC, "pending HTLCs");
        for channel in &response.channels {
            family.samples.push(Sample::labeled(
                "scid",
                channel.short_channel_id().to_string(),
                channel.pending_htlcs.len() as f64,
            ));
        }
        debug!(channels = family.samples.len(), "Collected pending HTLCs");
        Ok(family)
    }
}

/// Number of payments whose status is `FAILED`.
pub struct FailedPaymentsCollector {
    client: Arc<dyn NodeClient>,
}

impl FailedPaymentsCollector {
    pub fn new(client: Arc<dyn NodeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Collector for FailedPaymentsCollector {
    fn name(&self) -> &str {
        FAILED_PAYMENTS_METRIC
    }

    #[instrument(skip(self))]
    async fn collect(&self) -> Result<MetricFamily, NodeError> {
        let body = self.client.get(PAYMENTS_ENDPOINT).await?;
        let response: PaymentsResponse = serde_json::from_str(&body)?;

        let failed = response.payments.iter().filter(|p| p.is_failed()).count();
        Ok(
            MetricFamily::new(FAILED_PAYMENTS_METRIC, "Number of payments with status FAILED")
                .with_sample(Sample::unlabeled(failed as f64)),
        )
    }
}
