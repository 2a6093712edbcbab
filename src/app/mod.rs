//! Application layer: specification handling, collectors and shared state.

pub mod collectors;
pub mod config;
pub mod registry;
pub mod resolver;
pub mod server;
pub mod spec;
pub mod state;

pub use collectors::{FailedPaymentsCollector, HtlcCollector, PathQueryGauge, build_collector};
pub use config::ExporterConfig;
pub use registry::{CollectorRegistry, ScrapeOutcome};
pub use resolver::{parse_command, resolve_command};
pub use server::spawn_server;
pub use spec::{DEFAULT_METRICS_SPEC, parse_metrics_spec};
pub use state::AppState;
