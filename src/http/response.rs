//! Response construction and transformation.
//!
//! # Responsibilities
//! - Answer CORS preflight requests without touching the upstream
//! - Decorate relayed upstream responses with CORS headers
//! - Translate upstream transport failures into a 502 JSON payload
//!
//! # Design Decisions
//! - Upstream cache-control headers pass through untouched; no default
//!   cache policy is injected (the origin owns caching)
//! - Reason phrases are not relayed; they do not exist in HTTP/2 and the
//!   Rust HTTP stack derives them from the status code

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use serde_json::json;

const ALLOW_ORIGIN: HeaderValue = HeaderValue::from_static("*");
const ALLOW_METHODS: HeaderValue = HeaderValue::from_static("GET, HEAD, OPTIONS");
const ALLOW_HEADERS: HeaderValue = HeaderValue::from_static("Content-Type");
const MAX_AGE: HeaderValue = HeaderValue::from_static("86400");

/// Add the permissive CORS headers every gateway response carries.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN);
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, ALLOW_METHODS);
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS);
}

/// Static 204 response for CORS preflight requests.
pub fn preflight() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    apply_cors(response.headers_mut());
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_MAX_AGE, MAX_AGE);
    response
}

/// Relay an upstream response: status and headers copied, CORS headers
/// added, body handed through as-is.
pub fn relay(status: StatusCode, upstream_headers: &HeaderMap, body: Body) -> Response {
    let mut headers = upstream_headers.clone();
    apply_cors(&mut headers);

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// 502 JSON response for an upstream transport failure.
pub fn bad_gateway(error: &dyn std::fmt::Display) -> Response {
    let body = json!({
        "error": "Failed to proxy request",
        "message": error.to_string(),
    });

    let mut response = Response::new(Body::from(body.to_string()));
    *response.status_mut() = StatusCode::BAD_GATEWAY;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN);
    response
}
