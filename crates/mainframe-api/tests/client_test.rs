#![allow(clippy::unwrap_used)]
// Integration tests for `MainframeClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mainframe_api::{Error, MainframeClient, Method};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MainframeClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MainframeClient::with_client(reqwest::Client::new(), base_url, "/api");
    (server, client)
}

// ── System ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_system_stats() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cpuUsage": 92,
            "ramUsage": 50,
            "ramUsed": "4GB",
            "ramTotal": "8GB"
        })))
        .mount(&server)
        .await;

    let stats = client.system_stats().await.unwrap();
    assert!((stats.cpu_usage - 92.0).abs() < f64::EPSILON);
    assert_eq!(stats.ram_used, "4GB");
}

#[tokio::test]
async fn test_system_stats_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system"))
        .respond_with(ResponseTemplate::new(503).set_body_string("psutil unavailable"))
        .mount(&server)
        .await;

    let result = client.system_stats().await;
    match result {
        Err(Error::Status { status, ref body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "psutil unavailable");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
    assert!(result.unwrap_err().is_transient());
}

#[tokio::test]
async fn test_system_stats_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/system"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client.system_stats().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

// ── Widgets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_widgets() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/buttons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "cpu", "type": "stat", "label": "CPU", "value": "12%"},
            {"id": "maint", "type": "toggle", "label": "Maintenance", "endpoint": "/maint", "toggleState": true},
            {"id": 3, "type": "action", "label": "Ping", "endpoint": "/dummy"}
        ])))
        .mount(&server)
        .await;

    let widgets = client.widgets().await.unwrap();
    assert_eq!(widgets.len(), 3);
    assert_eq!(widgets[1].toggle_state, Some(true));
    assert_eq!(widgets[2].id, "3");
}

#[tokio::test]
async fn test_trigger_posts_without_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/dummy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let url = client.resolve("/dummy").unwrap();
    client.trigger(url).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_set_toggle_sends_enabled_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/maint"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let url = client.resolve("/maint").unwrap();
    client.set_toggle(url, false).await.unwrap();
}

#[tokio::test]
async fn test_call_uses_requested_method_and_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/get-webui"))
        .and(body_json(json!({"host": "ai"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let url = client.resolve("get-webui").unwrap();
    client
        .call(Method::PUT, url, Some(&json!({"host": "ai"})))
        .await
        .unwrap();
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_probe_status_online() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status/10.0.0.2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"online": true})))
        .mount(&server)
        .await;

    let url = client.resolve("/status/10.0.0.2").unwrap();
    let status = client.probe_status(Method::GET, url).await.unwrap();
    assert_eq!(status.online, Some(true));
}

#[tokio::test]
async fn test_probe_status_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/status/nowhere"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = client.resolve("/status/nowhere").unwrap();
    let err = client.probe_status(Method::GET, url).await.unwrap_err();
    assert!(matches!(err, Error::Status { status: 404, .. }));
    assert!(!err.is_transient());
}
