//! LND REST Exporter
//!
//! Turns a Lightning node's REST telemetry into Prometheus gauges that are
//! computed fresh on every scrape.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   API Layer                  │
//! │     /metrics exposition, health probes       │
//! ├─────────────────────────────────────────────┤
//! │               Application Layer              │
//! │  spec parsing, command resolution, registry  │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │   Traits, types, errors, key-path descent    │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │   LND REST client, logging, text rendering   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Metrics specification
//!
//! Metrics are declared as whitespace-separated `label=command` tokens:
//!
//! ```text
//! lnd_peers=parse("/v1/getinfo","num_peers")
//! lnd_local_balance_channels=parse("/v1/balance/channels","local_balance.sat")
//! htlcs=PENDING_HTLCS
//! failed=FAILED_PAYMENTS
//! ```
//!
//! `parse` binds a gauge named by the label to a key path inside an
//! endpoint's JSON body. `PENDING_HTLCS` and `FAILED_PAYMENTS` enable the
//! built-in `pending_htlcs{scid}` and `failed_payments` families; their
//! label only triggers them.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lnd_rest_exporter::api::create_router;
//! use lnd_rest_exporter::app::{AppState, CollectorRegistry, ExporterConfig};
//! use lnd_rest_exporter::domain::Heartbeat;
//! use lnd_rest_exporter::infra::LndRestClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ExporterConfig::from_env()?;
//!     let heartbeat = Arc::new(Heartbeat::new());
//!     let client = Arc::new(LndRestClient::new(config.lnd_client_config(), Arc::clone(&heartbeat))?);
//!     let registry = CollectorRegistry::from_spec(&config.metrics_spec, client, heartbeat)?;
//!
//!     let state = Arc::new(AppState::new(registry, config.readiness_window()));
//!     let listener = tokio::net::TcpListener::bind(config.metrics_addr()).await?;
//!     axum::serve(listener, create_router(state)).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
