#![allow(clippy::unwrap_used)]
// Widget registry behavior against a mocked backend.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mainframe_core::{
    CoreError, Dashboard, DashboardConfig, MemoryPreferenceStore, Notification, NotificationLevel,
    RecordingLauncher, RedirectOutcome, WidgetKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    server: MockServer,
    dashboard: Dashboard,
    launcher: Arc<RecordingLauncher>,
    notifications: UnboundedReceiver<Notification>,
}

async fn setup(widgets: serde_json::Value) -> Harness {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/buttons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widgets))
        .mount(&server)
        .await;

    let config = DashboardConfig::new(Url::parse(&server.uri()).unwrap());
    let launcher = Arc::new(RecordingLauncher::new());
    let dashboard = Dashboard::new(
        config,
        Arc::new(MemoryPreferenceStore::new()),
        launcher.clone(),
    )
    .unwrap();
    let notifications = dashboard.take_notifications().await.unwrap();
    dashboard.load_widgets().await.unwrap();

    Harness {
        server,
        dashboard,
        launcher,
        notifications,
    }
}

fn drain(rx: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

/// Requests other than the initial widget list fetch.
async fn widget_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() != "/api/buttons")
        .count()
}

fn toggle_state(dashboard: &Dashboard, id: &str) -> bool {
    match dashboard.registry().get(id).unwrap().kind {
        WidgetKind::Toggle { toggle_state, .. } => toggle_state,
        other => panic!("expected toggle, got {other:?}"),
    }
}

// ── Loading ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_failure_clears_loading_and_notifies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/buttons"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = DashboardConfig::new(Url::parse(&server.uri()).unwrap());
    let dashboard = Dashboard::new(
        config,
        Arc::new(MemoryPreferenceStore::new()),
        Arc::new(RecordingLauncher::new()),
    )
    .unwrap();
    let mut rx = dashboard.take_notifications().await.unwrap();

    assert!(dashboard.registry().is_loading());
    assert!(dashboard.load_widgets().await.is_err());
    assert!(!dashboard.registry().is_loading());
    assert!(dashboard.registry().widgets().is_empty());

    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn test_failed_reload_keeps_last_list_and_warns() {
    let mut h = setup(json!([
        {"id": "ping", "type": "action", "label": "Ping", "endpoint": "/dummy"}
    ]))
    .await;
    drain(&mut h.notifications);

    h.server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/buttons"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    assert!(h.dashboard.load_widgets().await.is_err());
    assert_eq!(h.dashboard.registry().widgets().len(), 1);
    assert!(!h.dashboard.registry().is_loading());

    let notes = drain(&mut h.notifications);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Warning);
}

// ── Actions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_action_posts_and_keeps_state() {
    let mut h = setup(json!([
        {"id": "ping", "type": "action", "label": "Ping", "endpoint": "/dummy"}
    ]))
    .await;

    Mock::given(method("POST"))
        .and(path("/api/dummy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&h.server)
        .await;

    let before = h.dashboard.registry().widgets();
    h.dashboard.invoke_action("ping").await.unwrap();
    assert_eq!(*before, *h.dashboard.registry().widgets());

    let levels: Vec<_> = drain(&mut h.notifications).iter().map(|n| n.level).collect();
    assert_eq!(levels, vec![NotificationLevel::Info, NotificationLevel::Success]);
}

#[tokio::test]
async fn test_action_without_endpoint_makes_no_call() {
    let mut h = setup(json!([
        {"id": "noop", "type": "action", "label": "Nothing"}
    ]))
    .await;

    let result = h.dashboard.invoke_action("noop").await;
    assert!(matches!(result, Err(CoreError::MissingEndpoint { .. })));
    assert_eq!(widget_calls(&h.server).await, 0);

    let notes = drain(&mut h.notifications);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert!(notes[0].message.contains("No endpoint configured"));
}

#[tokio::test]
async fn test_unknown_widget_is_treated_as_endpointless_action() {
    let mut h = setup(json!([
        {"id": "g", "type": "gauge", "label": "Gauge", "endpoint": "/dummy"}
    ]))
    .await;

    let result = h.dashboard.invoke("g").await;
    assert!(matches!(result, Err(CoreError::MissingEndpoint { .. })));
    assert_eq!(widget_calls(&h.server).await, 0);
    assert!(drain(&mut h.notifications)[0].message.contains("No endpoint configured"));
}

#[tokio::test]
async fn test_stat_is_not_invocable() {
    let mut h = setup(json!([
        {"id": "up", "type": "stat", "label": "Uptime", "value": "3 days"}
    ]))
    .await;

    let result = h.dashboard.invoke("up").await;
    assert!(matches!(result, Err(CoreError::NotInvocable { ref id, .. }) if id == "up"));
    assert_eq!(widget_calls(&h.server).await, 0);
    assert!(drain(&mut h.notifications).is_empty());
}

#[tokio::test]
async fn test_unknown_kind_keeps_type_name() {
    let h = setup(json!([
        {"id": "g", "type": "gauge", "label": "Gauge"}
    ]))
    .await;

    match h.dashboard.registry().get("g").unwrap().kind {
        WidgetKind::Unknown { type_name } => assert_eq!(type_name, "gauge"),
        other => panic!("expected unknown kind, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_id() {
    let h = setup(json!([])).await;
    let result = h.dashboard.invoke("ghost").await;
    assert!(matches!(result, Err(CoreError::WidgetNotFound { .. })));
}

// ── Toggles ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_success_sets_requested_state() {
    let h = setup(json!([
        {"id": "maint", "type": "toggle", "label": "Maintenance", "endpoint": "/maint", "toggleState": false}
    ]))
    .await;

    Mock::given(method("POST"))
        .and(path("/api/maint"))
        .and(body_json(json!({"enabled": true})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    h.dashboard.invoke_toggle("maint", true).await.unwrap();
    assert!(toggle_state(&h.dashboard, "maint"));
}

#[tokio::test]
async fn test_toggle_failure_leaves_state() {
    let mut h = setup(json!([
        {"id": "maint", "type": "toggle", "label": "Maintenance", "endpoint": "/maint", "toggleState": true}
    ]))
    .await;

    Mock::given(method("POST"))
        .and(path("/api/maint"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let result = h.dashboard.invoke_toggle("maint", false).await;
    assert!(result.is_err());
    assert!(toggle_state(&h.dashboard, "maint"));
    assert!(
        drain(&mut h.notifications)
            .iter()
            .any(|n| n.level == NotificationLevel::Error)
    );
}

#[tokio::test]
async fn test_invoke_flips_current_toggle_state() {
    let h = setup(json!([
        {"id": "maint", "type": "toggle", "label": "Maintenance", "endpoint": "/maint", "toggleState": true}
    ]))
    .await;

    Mock::given(method("POST"))
        .and(path("/api/maint"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    h.dashboard.invoke("maint").await.unwrap();
    assert!(!toggle_state(&h.dashboard, "maint"));
}

#[tokio::test]
async fn test_toggle_without_endpoint_makes_no_call() {
    let mut h = setup(json!([
        {"id": "t", "type": "toggle", "label": "Lonely", "toggleState": false}
    ]))
    .await;

    let result = h.dashboard.invoke_toggle("t", true).await;
    assert!(matches!(result, Err(CoreError::MissingEndpoint { .. })));
    assert!(!toggle_state(&h.dashboard, "t"));
    assert_eq!(widget_calls(&h.server).await, 0);
    assert!(drain(&mut h.notifications)[0].message.contains("No endpoint configured"));
}

// ── Redirects ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_redirect_url_only_opens_without_network() {
    let h = setup(json!([
        {"id": "docs", "type": "redirectButton", "label": "Docs", "redirectUrl": "https://docs.example"}
    ]))
    .await;

    let outcome = h.dashboard.invoke_redirect("docs").await.unwrap();
    assert_eq!(
        outcome,
        RedirectOutcome::Opened {
            url: "https://docs.example".into()
        }
    );
    assert_eq!(h.launcher.opened(), vec!["https://docs.example".to_string()]);
    assert_eq!(widget_calls(&h.server).await, 0);
}

#[tokio::test]
async fn test_invoke_routes_redirects() {
    let h = setup(json!([{
        "id": "nas",
        "type": "redirectButton",
        "label": "NAS",
        "redirectUrl": "https://nas.example",
        "apiEndpoint": "/wake/nas"
    }]))
    .await;

    Mock::given(method("POST"))
        .and(path("/api/wake/nas"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    h.dashboard.invoke("nas").await.unwrap();
    assert_eq!(h.launcher.opened(), vec!["https://nas.example".to_string()]);
}

#[tokio::test]
async fn test_redirect_after_successful_preflight() {
    let h = setup(json!([{
        "id": "ai",
        "type": "redirectButton",
        "label": "AI",
        "redirectUrl": "https://ai.example",
        "apiEndpoint": "/get-webui",
        "apiData": {"wake": true}
    }]))
    .await;

    Mock::given(method("POST"))
        .and(path("/api/get-webui"))
        .and(body_json(json!({"wake": true})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    h.dashboard.invoke_redirect("ai").await.unwrap();
    assert_eq!(h.launcher.opened(), vec!["https://ai.example".to_string()]);
}

#[tokio::test]
async fn test_no_redirect_when_preflight_fails() {
    let mut h = setup(json!([{
        "id": "ai",
        "type": "redirectButton",
        "label": "AI",
        "redirectUrl": "https://ai.example",
        "apiEndpoint": "/get-webui",
        "apiMethod": "GET"
    }]))
    .await;

    Mock::given(method("GET"))
        .and(path("/api/get-webui"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&h.server)
        .await;

    assert!(h.dashboard.invoke_redirect("ai").await.is_err());
    assert!(h.launcher.opened().is_empty());
    assert!(
        drain(&mut h.notifications)
            .iter()
            .any(|n| n.level == NotificationLevel::Error)
    );
}

#[tokio::test]
async fn test_preflight_without_redirect_url() {
    let h = setup(json!([{
        "id": "wake",
        "type": "redirectButton",
        "label": "Wake",
        "apiEndpoint": "/start-ki-server"
    }]))
    .await;

    Mock::given(method("POST"))
        .and(path("/api/start-ki-server"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&h.server)
        .await;

    let outcome = h.dashboard.invoke_redirect("wake").await.unwrap();
    assert_eq!(outcome, RedirectOutcome::Called);
    assert!(h.launcher.opened().is_empty());
}

#[tokio::test]
async fn test_redirect_with_nothing_configured() {
    let mut h = setup(json!([
        {"id": "empty", "type": "redirectButton", "label": "Empty", "buttonText": "Go"}
    ]))
    .await;

    let result = h.dashboard.invoke_redirect("empty").await;
    assert!(matches!(result, Err(CoreError::MissingEndpoint { .. })));
    assert!(h.launcher.opened().is_empty());
    assert_eq!(widget_calls(&h.server).await, 0);
    assert_eq!(drain(&mut h.notifications).len(), 1);
}
