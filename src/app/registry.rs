//! Registry of scrape-time collectors.
//!
//! Built once at startup from the metrics specification and immutable
//! afterwards. A scrape evaluates every collector in registration order;
//! one failing collector is logged and omitted without affecting the rest.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    Collector, ConfigError, Heartbeat, MetricFamily, NodeClient, ParsedCommand, Sample,
};

use super::collectors::build_collector;
use super::resolver::resolve_command;
use super::spec::parse_metrics_spec;

pub const LAST_SUCCESS_METRIC: &str = "lnd_exporter_last_success_timestamp";
pub const COLLECTOR_ERRORS_METRIC: &str = "lnd_exporter_collector_errors";

const RESERVED_NAMES: [&str; 2] = [LAST_SUCCESS_METRIC, COLLECTOR_ERRORS_METRIC];

/// Everything one scrape produced.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub families: Vec<MetricFamily>,
    /// Names of collectors whose family was omitted from this scrape.
    pub failed: Vec<String>,
}

pub struct CollectorRegistry {
    collectors: Vec<Arc<dyn Collector>>,
    heartbeat: Arc<Heartbeat>,
}

impl CollectorRegistry {
    #[must_use]
    pub fn new(heartbeat: Arc<Heartbeat>) -> Self {
        Self {
            collectors: Vec::new(),
            heartbeat,
        }
    }

    /// Parse, resolve and register every entry of `spec`.
    ///
    /// # Errors
    /// Fails on the first unsupported command, invalid metric name, or
    /// duplicate label/metric name. Nothing is partially registered.
    pub fn from_spec(
        spec: &str,
        client: Arc<dyn NodeClient>,
        heartbeat: Arc<Heartbeat>,
    ) -> Result<Self, ConfigError> {
        let mut registry = Self::new(heartbeat);
        let mut labels = HashSet::new();

        for entry in parse_metrics_spec(spec) {
            if !labels.insert(entry.label.clone()) {
                return Err(ConfigError::DuplicateMetric(entry.label));
            }
            let command = resolve_command(&entry)?;
            // Built-in labels are only triggers and never exposed.
            if matches!(command, ParsedCommand::PathQuery { .. }) {
                validate_metric_name(&entry.label)?;
            }
            let collector =
                build_collector(&entry.label, &entry.command, command, Arc::clone(&client));
            registry.register(collector)?;
            info!(label = %entry.label, command = %entry.command, "Metric created");
        }

        Ok(registry)
    }

    /// Register a collector under its own name.
    ///
    /// # Errors
    /// Returns [`ConfigError::DuplicateMetric`] if the name is taken or
    /// reserved for the exporter's own gauges.
    pub fn register(&mut self, collector: Arc<dyn Collector>) -> Result<(), ConfigError> {
        let name = collector.name();
        validate_metric_name(name)?;
        if RESERVED_NAMES.contains(&name) || self.collectors.iter().any(|c| c.name() == name) {
            return Err(ConfigError::DuplicateMetric(name.to_string()));
        }
        self.collectors.push(collector);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collectors.is_empty()
    }

    /// Registered metric names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    #[must_use]
    pub fn heartbeat(&self) -> &Arc<Heartbeat> {
        &self.heartbeat
    }

    /// Evaluate every collector once, then append the exporter's own gauges.
    pub async fn gather(&self) -> ScrapeOutcome {
        let mut families = Vec::with_capacity(self.collectors.len() + RESERVED_NAMES.len());
        let mut failed = Vec::new();

        for collector in &self.collectors {
            match collector.collect().await {
                Ok(family) => families.push(family),
                Err(e) => {
                    warn!(metric = %collector.name(), error = %e, "Collector failed, omitting from scrape");
                    failed.push(collector.name().to_string());
                }
            }
        }

        families.push(
            MetricFamily::new(
                LAST_SUCCESS_METRIC,
                "Unix timestamp of last successful LND data fetch by the exporter",
            )
            .with_sample(Sample::unlabeled(self.heartbeat.gauge_value())),
        );
        families.push(
            MetricFamily::new(
                COLLECTOR_ERRORS_METRIC,
                "Number of collectors omitted from this scrape because they failed",
            )
            .with_sample(Sample::unlabeled(failed.len() as f64)),
        );

        ScrapeOutcome { families, failed }
    }
}

/// Prometheus metric names: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
fn validate_metric_name(name: &str) -> Result<(), ConfigError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_' || first == ':')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: "METRICS".to_string(),
            message: format!("'{}' is not a valid metric name", name),
        })
    }
}
