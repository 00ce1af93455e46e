//! Shared utilities for gateway integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use media_gateway::config::GatewayConfig;
use media_gateway::http::GatewayServer;
use media_gateway::lifecycle::Shutdown;

/// One request as observed by the mock upstream.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Handle onto a running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }

    pub fn last_received(&self) -> ReceivedRequest {
        self.received()
            .last()
            .cloned()
            .expect("upstream received no request")
    }
}

#[derive(Clone)]
struct UpstreamState {
    status: u16,
    response_headers: Vec<(String, String)>,
    body: &'static str,
    delay: std::time::Duration,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

/// Start a mock upstream that records every request and answers with a
/// fixed status, headers, and body.
pub async fn start_mock_upstream(
    status: u16,
    response_headers: &[(&str, &str)],
    body: &'static str,
) -> MockUpstream {
    start_upstream(status, response_headers, body, std::time::Duration::ZERO).await
}

/// Start a mock upstream that stalls for `delay` before answering 200.
pub async fn start_stalled_upstream(delay: std::time::Duration) -> MockUpstream {
    start_upstream(200, &[], "late", delay).await
}

async fn start_upstream(
    status: u16,
    response_headers: &[(&str, &str)],
    body: &'static str,
    delay: std::time::Duration,
) -> MockUpstream {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = UpstreamState {
        status,
        response_headers: response_headers
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect(),
        body,
        delay,
        received: received.clone(),
    };

    let app = Router::new().fallback(upstream_handler).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, received }
}

async fn upstream_handler(State(state): State<UpstreamState>, request: Request) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let headers = request
        .headers()
        .iter()
        .map(|(n, v)| {
            (
                n.as_str().to_string(),
                v.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = axum::body::to_bytes(request.into_body(), 1024 * 1024)
        .await
        .unwrap_or_default()
        .to_vec();

    state.received.lock().unwrap().push(ReceivedRequest {
        method,
        path,
        query,
        headers,
        body,
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let mut response = Response::new(Body::from(state.body));
    *response.status_mut() = StatusCode::from_u16(state.status).unwrap();
    for (name, value) in &state.response_headers {
        response.headers_mut().insert(
            axum::http::HeaderName::try_from(name.as_str()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    response
}

/// Start a gateway pointed at `upstream_base`, bound to an ephemeral port.
/// The returned shutdown coordinator stops the server when triggered.
pub async fn start_gateway(upstream_base: &str) -> (SocketAddr, Shutdown) {
    start_gateway_with_request_timeout(upstream_base, 5).await
}

/// Start a gateway with an explicit upstream request timeout.
pub async fn start_gateway_with_request_timeout(
    upstream_base: &str,
    request_secs: u64,
) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = upstream_base.to_string();
    config.timeouts.connect_secs = 1;
    config.timeouts.request_secs = request_secs;
    config.observability.metrics_enabled = false;

    let server = GatewayServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown: broadcast::Receiver<()> = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
