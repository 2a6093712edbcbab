//! Logging setup and Prometheus text rendering.
//!
//! Scrape output is rendered from a fresh, non-global `PrometheusRecorder`
//! per scrape, so a family that failed this time is absent instead of
//! repeating a stale value.

use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::MetricFamily;

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Install the global tracing subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`); `json` selects the JSON
/// formatter for log shippers.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(json: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    }
}

/// Render gauge families in the Prometheus text format.
#[must_use]
pub fn render_families(families: &[MetricFamily]) -> String {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        for family in families {
            metrics::describe_gauge!(family.name.clone(), family.help.clone());
            for sample in &family.samples {
                let labels: Vec<Label> = sample
                    .labels
                    .iter()
                    .map(|(key, value)| Label::new(key.clone(), value.clone()))
                    .collect();
                metrics::gauge!(family.name.clone(), labels).set(sample.value);
            }
        }
    });

    handle.render()
}
