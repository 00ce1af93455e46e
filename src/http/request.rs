//! Inbound request preparation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Strip headers that must not cross the proxy boundary
//! - Build the upstream target URL from the inbound path and query
//! - Decide whether the inbound body is forwarded
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Header filtering works on lowercase names; `HeaderName` guarantees
//!   lowercase, so no per-header case folding is needed
//! - Original request preserved for logging; a sanitized copy is forwarded

use axum::http::{HeaderMap, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header names that are never forwarded upstream.
const BLOCKED_NAMES: [&str; 2] = ["host", "connection"];

/// Header name prefixes that are never forwarded upstream.
///
/// `cache-control` and `pragma` would let the client bypass upstream caching;
/// `cf-` headers are edge-injected and meaningless to the origin.
const BLOCKED_PREFIXES: [&str; 3] = ["cache-control", "pragma", "cf-"];

/// UUID v4 request ID generator for `SetRequestIdLayer`.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Whether a header survives the proxy boundary.
pub fn is_forwardable(name: &str) -> bool {
    !(BLOCKED_NAMES.contains(&name)
        || BLOCKED_PREFIXES.iter().any(|p| name.starts_with(p)))
}

/// Copy the forwardable subset of the inbound headers.
pub fn sanitize_headers(headers: &HeaderMap) -> HeaderMap {
    let mut sanitized = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_forwardable(name.as_str()) {
            sanitized.append(name.clone(), value.clone());
        }
    }
    sanitized
}

/// Build the upstream target URL for a `/media` request.
///
/// An empty sub-path targets the bare `/media` endpoint with no trailing
/// slash. The query string, when present, is appended verbatim.
pub fn build_target_url(base: &str, subpath: &str, query: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    let mut target = if subpath.is_empty() {
        format!("{base}/media")
    } else {
        format!("{base}/media/{subpath}")
    };
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Whether the inbound body accompanies the forwarded request.
/// GET and HEAD requests are forwarded bodiless.
pub fn forwards_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}
