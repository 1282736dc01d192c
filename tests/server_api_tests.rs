use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use httpmock::prelude::*;
use metaview::config::AppConfig;
use metaview::server::app;
use metaview::server::routes::route_request;
use tower::ServiceExt;

fn config() -> AppConfig {
    AppConfig::default()
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request(&config(), "GET", "/api/health", "");
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert!(response.body.contains("\"status\": \"ok\""));
}

#[test]
fn index_page_embeds_default_url() {
    let response = route_request(&config(), "GET", "/", "");
    assert_eq!(response.status_code, 200);
    assert!(response.content_type.starts_with("text/html"));
    assert!(response.body.contains("Metadata Viewer"));
    assert!(response
        .body
        .contains("\"https://www.commerce.gov/sites/default/files/data.json\""));
}

#[test]
fn normalize_endpoint_returns_view() {
    let body = r#"{"dataset":[{"title":"A","modified":"2023-05-10"},{"contactPoint":{"fn":"Jane"}}]}"#;
    let response = route_request(&config(), "POST", "/api/catalog/normalize", body);
    assert_eq!(response.status_code, 200);

    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["status"], "last_updated");
    assert_eq!(payload["dataset_count"], 2);
    assert_eq!(payload["columns"], serde_json::json!(["contactPoint", "modified", "title"]));
    assert_eq!(payload["rows"][0]["contactPoint"], serde_json::Value::Null);
    assert_eq!(payload["rows"][1]["contactPoint"], r#"{"fn":"Jane"}"#);
    assert_eq!(payload["summary_display"], "May 10, 2023");
}

#[test]
fn normalize_endpoint_reports_empty_catalog() {
    let response = route_request(&config(), "POST", "/api/catalog/normalize", r#"{"title":"x"}"#);
    assert_eq!(response.status_code, 200);
    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["status"], "no_datasets");
    assert_eq!(payload["notice"], "No datasets found in the catalog.");
    assert_eq!(payload["summary_date"], serde_json::Value::Null);
}

#[test]
fn normalize_endpoint_rejects_invalid_json() {
    let response = route_request(&config(), "POST", "/api/catalog/normalize", "{not json");
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("Invalid catalog"));
}

#[test]
fn fetch_endpoint_validates_request_body() {
    let response = route_request(&config(), "POST", "/api/catalog/fetch", r#"{"href":"x"}"#);
    assert_eq!(response.status_code, 400);

    let response = route_request(&config(), "POST", "/api/catalog/fetch", r#"{"url":"  "}"#);
    assert_eq!(response.status_code, 400);
    assert!(response.body.contains("url must not be empty"));
}

#[test]
fn fetch_endpoint_loads_remote_catalog() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data.json");
        then.status(200)
            .body(r#"{"dataset":[{"modified":"2022-01-01T00:00:00"},{"modified":"2023-12-31"}]}"#);
    });

    let body = serde_json::json!({ "url": server.url("/data.json") }).to_string();
    let response = route_request(&config(), "POST", "/api/catalog/fetch", &body);
    assert_eq!(response.status_code, 200);
    let payload: serde_json::Value =
        serde_json::from_str(&response.body).expect("response should be valid json");
    assert_eq!(payload["summary_date"], "2023-12-31");
}

#[test]
fn fetch_endpoint_maps_upstream_failure_to_bad_gateway() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data.json");
        then.status(503);
    });

    let body = serde_json::json!({ "url": server.url("/data.json") }).to_string();
    let response = route_request(&config(), "POST", "/api/catalog/fetch", &body);
    assert_eq!(response.status_code, 502);
    assert!(response.body.contains("503"));
}

#[test]
fn unknown_route_is_not_found() {
    let response = route_request(&config(), "DELETE", "/api/catalog?x=1", "");
    assert_eq!(response.status_code, 404);
    assert!(response.body.contains("DELETE /api/catalog"));
}

#[tokio::test]
async fn app_dispatches_through_router() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/catalog/normalize")
        .body(Body::from(r#"{"dataset":[{"modified":"2024-04-05"}]}"#))
        .expect("request should build");

    let response = app(config())
        .oneshot(request)
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let payload: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(payload["summary_display"], "April 05, 2024");
}

#[tokio::test]
async fn app_enforces_body_limit() {
    let config = AppConfig {
        max_body_bytes: 16,
        ..AppConfig::default()
    };
    let request = Request::builder()
        .method("POST")
        .uri("/api/catalog/normalize")
        .body(Body::from(r#"{"dataset":[{"title":"well over sixteen bytes"}]}"#))
        .expect("request should build");

    let response = app(config)
        .oneshot(request)
        .await
        .expect("router should respond");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
