mod support;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use undangan::infra::http::{self, HttpState};

use support::Harness;

fn state(harness: &Harness) -> HttpState {
    HttpState {
        content: harness.content.clone(),
        invalidation: harness.trigger.clone(),
        health: harness.store.clone(),
    }
}

async fn send(router: &Router, method: Method, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn content_route_serves_document_with_etag() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    let router = http::build_router(state(&harness));

    let response = send(&router, Method::GET, "/invitations/ayu-bima/content").await;
    assert_eq!(response.status(), StatusCode::OK);
    let etag = response
        .headers()
        .get(header::ETAG)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .expect("etag header");
    assert_eq!(
        response
            .headers()
            .get("x-content-source")
            .and_then(|value| value.to_str().ok()),
        Some("compiled")
    );

    let body: Value = serde_json::from_str(&body_text(response).await).expect("json body");
    assert_eq!(body["profile"]["slug"], "ayu-bima");
    assert_eq!(body["eventDetails"]["holyMatrimony"]["title"], "Akad Nikah");
    assert!(body.get("musicSettings").is_some());

    let served = harness
        .content
        .fetch_content("ayu-bima")
        .await
        .expect("cached");
    assert_eq!(etag, format!("\"{}\"", served.content_hash));
}

#[tokio::test]
async fn matching_etag_returns_not_modified() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    let router = http::build_router(state(&harness));

    let first = send(&router, Method::GET, "/invitations/ayu-bima/content").await;
    let etag = first
        .headers()
        .get(header::ETAG)
        .cloned()
        .expect("etag header");

    let request = Request::builder()
        .method(Method::GET)
        .uri("/invitations/ayu-bima/content")
        .header(header::IF_NONE_MATCH, etag.clone())
        .body(Body::empty())
        .expect("request should build");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");

    assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(response.headers().get(header::ETAG), Some(&etag));
}

#[tokio::test]
async fn unknown_slug_is_404_with_generic_message() {
    let harness = Harness::new();
    let router = http::build_router(state(&harness));

    let response = send(&router, Method::GET, "/invitations/nobody/content").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Invitation not found");
}

#[tokio::test]
async fn source_failure_is_503_without_details() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    harness.store.set_fail_section_reads(true);
    let router = http::build_router(state(&harness));

    let response = send(&router, Method::GET, "/invitations/ayu-bima/content").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_text(response).await;
    assert_eq!(body, "Service temporarily unavailable");
    assert!(!body.contains("section store"));
}

#[tokio::test]
async fn health_reports_store_state() {
    let harness = Harness::new();
    let router = http::build_router(state(&harness));

    let healthy = send(&router, Method::GET, "/_health/db").await;
    assert_eq!(healthy.status(), StatusCode::NO_CONTENT);

    harness.store.set_fail_section_reads(true);
    let unhealthy = send(&router, Method::GET, "/_health/db").await;
    assert_eq!(unhealthy.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn internal_compile_and_invalidate_rebuild_the_row() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    let router = http::build_internal_router(state(&harness));

    let compiled = send(
        &router,
        Method::POST,
        "/internal/invitations/ayu-bima/compile",
    )
    .await;
    assert_eq!(compiled.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(compiled).await).expect("json body");
    assert_eq!(body["slug"], "ayu-bima");
    assert_eq!(body["source"], "compiled");

    let row = harness.store.compiled_row("ayu-bima").expect("row stored");
    assert_eq!(
        row.content_hash.as_deref(),
        body["contentHash"].as_str()
    );

    let invalidated = send(
        &router,
        Method::POST,
        "/internal/invitations/ayu-bima/invalidate",
    )
    .await;
    assert_eq!(invalidated.status(), StatusCode::NO_CONTENT);
    assert!(body_text(invalidated).await.is_empty());
}

#[tokio::test]
async fn internal_routes_are_not_public() {
    let harness = Harness::new();
    harness.register("ayu-bima");
    let public = http::build_router(state(&harness));

    let response = send(
        &public,
        Method::POST,
        "/internal/invitations/ayu-bima/compile",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn internal_compile_of_unknown_slug_is_404() {
    let harness = Harness::new();
    let router = http::build_internal_router(state(&harness));

    let response = send(&router, Method::POST, "/internal/invitations/nobody/compile").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn request_id_is_echoed_or_minted() {
    let harness = Harness::new();
    let router = http::build_router(state(&harness));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/_health/db")
        .header("x-request-id", "edge-1234")
        .body(Body::empty())
        .expect("request should build");
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("edge-1234")
    );

    let minted = send(&router, Method::GET, "/_health/db").await;
    let id = minted
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .expect("minted id");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
