//! Infrastructure layer implementations.

pub mod lnd;
pub mod observability;

pub use lnd::{LndClientConfig, LndRestClient, MACAROON_HEADER, RetryPolicy};
pub use observability::{PROMETHEUS_CONTENT_TYPE, init_tracing, render_families};
