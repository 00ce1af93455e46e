//! HTTP server setup and the media proxy handler.
//!
//! # Responsibilities
//! - Create Axum Router for the `/media` namespace
//! - Wire up middleware (tracing, timeout, request ID)
//! - Answer CORS preflight locally
//! - Forward everything else to the upstream API, once, with no retries
//! - Relay upstream status/headers/body with CORS decoration
//! - Translate transport failures into 502 JSON responses

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{
    build_target_url, forwards_body, sanitize_headers, MakeRequestUuid, X_REQUEST_ID,
};
use crate::http::response;
use crate::observability::metrics;

/// Extra seconds the server-side timeout backstop waits beyond the upstream
/// client timeout. The client must always time out first so a stalled
/// upstream surfaces as a 502 JSON error, never as the layer's bare 408.
const TIMEOUT_BACKSTOP_MARGIN_SECS: u64 = 5;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upstream base URL, env-resolved at startup.
    pub upstream_base: Arc<str>,
    /// Shared upstream client with configured timeouts.
    pub client: reqwest::Client,
}

/// HTTP server for the media gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new gateway server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .build()?;

        let state = AppState {
            upstream_base: Arc::from(config.upstream.base_url.as_str()),
            client,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/media", any(media_handler))
            .route("/media/{*path}", any(media_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs + TIMEOUT_BACKSTOP_MARGIN_SECS,
                    ))),
            )
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "media gateway starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("media gateway stopped");
        Ok(())
    }
}

/// Media proxy handler.
///
/// Preflight requests are answered locally; everything else is forwarded to
/// the upstream exactly once. Forwarding failures become 502 responses, never
/// unhandled faults.
async fn media_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().clone();
    let method_str = method.to_string();

    if method == Method::OPTIONS {
        metrics::record_request(&method_str, 204, start_time);
        return response::preflight();
    }

    let subpath = request
        .uri()
        .path()
        .strip_prefix("/media")
        .unwrap_or_default()
        .trim_start_matches('/')
        .to_string();
    let target = build_target_url(
        &state.upstream_base,
        &subpath,
        request.uri().query(),
    );

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        target = %target,
        "forwarding media request"
    );

    let headers = sanitize_headers(request.headers());

    let mut upstream_request = state
        .client
        .request(method.clone(), &target)
        .headers(headers);
    if forwards_body(&method) {
        let body = request.into_body().into_data_stream();
        upstream_request = upstream_request.body(reqwest::Body::wrap_stream(body));
    }

    match upstream_request.send().await {
        Ok(upstream) => {
            let status = upstream.status();
            let headers = upstream.headers().clone();
            metrics::record_request(&method_str, status.as_u16(), start_time);

            tracing::debug!(
                request_id = %request_id,
                status = %status,
                "relaying upstream response"
            );

            response::relay(status, &headers, Body::from_stream(upstream.bytes_stream()))
                .into_response()
        }
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                target = %target,
                error = %e,
                "upstream request failed"
            );
            metrics::record_request(&method_str, 502, start_time);
            response::bad_gateway(&e)
        }
    }
}
