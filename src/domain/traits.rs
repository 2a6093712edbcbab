//! Domain traits defining contracts for external systems.

use async_trait::async_trait;
use serde_json::Value;

use super::error::NodeError;
use super::path::descend_key_path;
use super::types::MetricFamily;

/// REST access to a Lightning node.
///
/// Implementations own retry and timeout policy; callers see either a body
/// or the error that ended the last attempt.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// GET `uri` (path plus query) and return the decoded body.
    async fn get(&self, uri: &str) -> Result<String, NodeError>;

    /// GET `uri` and parse the body as JSON.
    async fn fetch_json(&self, uri: &str) -> Result<Value, NodeError> {
        let body = self.get(uri).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET `endpoint` and descend the dotted `key_path` into the JSON body.
    async fn fetch_path(&self, endpoint: &str, key_path: &[String]) -> Result<Value, NodeError> {
        let data = self.fetch_json(endpoint).await?;
        descend_key_path(data, key_path)
    }
}

/// A unit producing one gauge family on every scrape.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Exposed metric name. Unique across a registry.
    fn name(&self) -> &str;

    /// Fetch fresh data from the node and build this scrape's samples.
    async fn collect(&self) -> Result<MetricFamily, NodeError>;
}
