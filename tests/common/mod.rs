//! A stand-in LND REST server bound to a random local port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
};
use secrecy::SecretString;

use lnd_rest_exporter::domain::Heartbeat;
use lnd_rest_exporter::infra::{LndClientConfig, LndRestClient, MACAROON_HEADER, RetryPolicy};

pub const TEST_MACAROON: &str = "0201036c6e6402f801030a10";

#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: format!("{{\"error\":\"{}\"}}", status),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Requests seen by the fake node.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path_and_query: String,
    pub macaroon: Option<String>,
    pub connection: Option<String>,
}

#[derive(Default)]
pub struct FakeNode {
    /// Replies per path-and-query, served in order; the last one repeats.
    routes: Mutex<HashMap<String, Vec<Reply>>>,
    hits: AtomicU32,
    seen: Mutex<Vec<SeenRequest>>,
}

impl FakeNode {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn route(self: &Arc<Self>, path_and_query: &str, replies: Vec<Reply>) -> Arc<Self> {
        self.routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), replies);
        Arc::clone(self)
    }

    pub fn hits(&self) -> u32 {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    fn next_reply(&self, path_and_query: &str) -> Reply {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(path_and_query) {
            Some(replies) if replies.len() > 1 => replies.remove(0),
            Some(replies) if replies.len() == 1 => replies[0].clone(),
            _ => Reply::status(StatusCode::NOT_FOUND),
        }
    }
}

async fn handle(
    State(node): State<Arc<FakeNode>>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    node.hits.fetch_add(1, Ordering::SeqCst);

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    node.seen.lock().unwrap().push(SeenRequest {
        path_and_query: path_and_query.clone(),
        macaroon: header_value(MACAROON_HEADER),
        connection: header_value("connection"),
    });

    let reply = node.next_reply(&path_and_query);
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (reply.status, reply.body)
}

pub fn fake_node_router(node: Arc<FakeNode>) -> Router {
    Router::new().fallback(handle).with_state(node)
}

/// Serve `node` on 127.0.0.1 and return its address.
pub async fn spawn_fake_node(node: Arc<FakeNode>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = fake_node_router(node);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A plain-HTTP client for the fake node.
pub fn client_for(
    addr: SocketAddr,
    timeout: Duration,
    retry: RetryPolicy,
    heartbeat: Arc<Heartbeat>,
) -> LndRestClient {
    let mut config = LndClientConfig::new(
        addr.ip().to_string(),
        addr.port(),
        SecretString::from(TEST_MACAROON),
    );
    config.tls = false;
    config.timeout = timeout;
    config.retry = retry;
    LndRestClient::new(config, heartbeat).unwrap()
}

pub fn no_delay_retries(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        retry_delay: Duration::ZERO,
        sleep_after_final_failure: false,
    }
}
