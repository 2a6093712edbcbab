//! LND node client implementations.

pub mod rest;

pub use rest::{LndClientConfig, LndRestClient, MACAROON_HEADER, RetryPolicy};
