//! End-to-end tests for the media proxy gateway.

use reqwest::Method;

mod common;

#[tokio::test]
async fn preflight_is_answered_without_forwarding() {
    let upstream = common::start_mock_upstream(200, &[], "never").await;
    let (gateway, shutdown) = common::start_gateway(&upstream.base_url()).await;

    let client = reqwest::Client::new();
    let response = client
        .request(Method::OPTIONS, format!("http://{gateway}/media/pets/42.jpg?w=64"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 204);
    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, HEAD, OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type"
    );
    assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");

    assert!(upstream.received().is_empty(), "preflight must not reach upstream");

    shutdown.trigger();
}

#[tokio::test]
async fn forwards_path_query_and_filters_headers() {
    let upstream =
        common::start_mock_upstream(200, &[("content-type", "image/png")], "png-bytes").await;
    let (gateway, shutdown) = common::start_gateway(&upstream.base_url()).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{gateway}/media/a/b?x=1"))
        .header("cache-control", "no-cache")
        .header("pragma", "no-cache")
        .header("cf-ray", "abc123")
        .header("x-portal-session", "s-1")
        .header("accept", "image/webp")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "png-bytes");

    let seen = upstream.last_received();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, "/media/a/b");
    assert_eq!(seen.query.as_deref(), Some("x=1"));

    assert!(seen.header("cache-control").is_none());
    assert!(seen.header("pragma").is_none());
    assert!(seen.header("cf-ray").is_none());
    assert_eq!(seen.header("x-portal-session"), Some("s-1"));
    assert_eq!(seen.header("accept"), Some("image/webp"));

    shutdown.trigger();
}

#[tokio::test]
async fn bare_media_path_has_no_trailing_slash() {
    let upstream = common::start_mock_upstream(200, &[], "listing").await;
    let (gateway, shutdown) = common::start_gateway(&upstream.base_url()).await;

    let response = reqwest::get(format!("http://{gateway}/media"))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert_eq!(upstream.last_received().path, "/media");

    shutdown.trigger();
}

#[tokio::test]
async fn upstream_headers_and_status_are_relayed_with_cors() {
    let upstream = common::start_mock_upstream(
        404,
        &[("cache-control", "max-age=3600"), ("content-type", "text/plain")],
        "not here",
    )
    .await;
    let (gateway, shutdown) = common::start_gateway(&upstream.base_url()).await;

    let response = reqwest::get(format!("http://{gateway}/media/gone.jpg"))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let headers = response.headers();
    // Upstream cache policy passes through untouched.
    assert_eq!(headers.get("cache-control").unwrap(), "max-age=3600");
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, HEAD, OPTIONS"
    );
    assert!(headers.get("access-control-max-age").is_none());
    assert_eq!(response.text().await.unwrap(), "not here");

    shutdown.trigger();
}

#[tokio::test]
async fn post_body_reaches_upstream() {
    let upstream = common::start_mock_upstream(201, &[], "created").await;
    let (gateway, shutdown) = common::start_gateway(&upstream.base_url()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{gateway}/media/avatars"))
        .body("fake-image-bytes")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let seen = upstream.last_received();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.body, b"fake-image-bytes");

    shutdown.trigger();
}

#[tokio::test]
async fn get_forwards_without_body() {
    let upstream = common::start_mock_upstream(200, &[], "ok").await;
    let (gateway, shutdown) = common::start_gateway(&upstream.base_url()).await;

    reqwest::get(format!("http://{gateway}/media/pets/1.jpg"))
        .await
        .unwrap();

    assert!(upstream.last_received().body.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_upstream_becomes_502_json() {
    // Grab a port nothing listens on.
    let throwaway = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = throwaway.local_addr().unwrap();
    drop(throwaway);

    let (gateway, shutdown) = common::start_gateway(&format!("http://{dead_addr}")).await;

    let response = reqwest::get(format!("http://{gateway}/media/pets/1.jpg"))
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to proxy request");
    assert!(body["message"].as_str().unwrap().len() > 0);

    shutdown.trigger();
}

#[tokio::test]
async fn stalled_upstream_becomes_502_json() {
    let upstream = common::start_stalled_upstream(std::time::Duration::from_secs(10)).await;
    let (gateway, shutdown) = common::start_gateway_with_request_timeout(&upstream.base_url(), 1).await;

    let response = reqwest::get(format!("http://{gateway}/media/pets/1.jpg"))
        .await
        .unwrap();

    // The upstream client times out first; the stall surfaces as the
    // gateway's own 502 JSON error, not a bare server-side timeout.
    assert_eq!(response.status(), 502);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Failed to proxy request");
    assert!(body["message"].as_str().unwrap().len() > 0);

    shutdown.trigger();
}

#[tokio::test]
async fn non_media_paths_are_not_served() {
    let upstream = common::start_mock_upstream(200, &[], "ok").await;
    let (gateway, shutdown) = common::start_gateway(&upstream.base_url()).await;

    let response = reqwest::get(format!("http://{gateway}/bookings"))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    assert!(upstream.received().is_empty());

    shutdown.trigger();
}
