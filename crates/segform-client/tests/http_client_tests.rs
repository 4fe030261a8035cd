//! HTTP-level tests for `SegmentClient` over `HttpTransport`.
//!
//! A wiremock server stands in for the Config API.

use pretty_assertions::assert_eq;
use segform_client::{ClientError, HttpTransport, SegmentClient};
use segform_core::{ConfigValue, DestinationConfig, Rules, ShortId, UpdateMask};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> SegmentClient {
    let transport =
        HttpTransport::with_http_client(&server.uri(), "test-token", reqwest::Client::new());
    SegmentClient::new("acme", Arc::new(transport))
}

// ── Tracking plans ──────────────────────────────────────────────

#[tokio::test]
async fn list_tracking_plans_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces/acme/tracking-plans"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracking_plans": [
                {"name": "workspaces/acme/tracking-plans/rs_1", "display_name": "Web"},
                {"name": "workspaces/acme/tracking-plans/rs_2", "display_name": "iOS"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let plans = client_for(&server).list_tracking_plans().await.unwrap();
    let names: Vec<String> = plans
        .tracking_plans
        .iter()
        .map(|p| p.name.as_ref().unwrap().short_id().to_string())
        .collect();
    assert_eq!(names, vec!["rs_1", "rs_2"]);
}

#[tokio::test]
async fn create_tracking_plan_wraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspaces/acme/tracking-plans/"))
        .and(body_json(json!({
            "tracking_plan": {
                "display_name": "Checkout",
                "rules": {
                    "global": {},
                    "identify": {},
                    "group": {},
                    "identify_traits": [],
                    "group_traits": []
                }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "workspaces/acme/tracking-plans/rs_9",
            "display_name": "Checkout"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let plan = client_for(&server)
        .create_tracking_plan("Checkout", Rules::default())
        .await
        .unwrap();
    assert_eq!(plan.name.unwrap().as_str(), "workspaces/acme/tracking-plans/rs_9");
}

#[tokio::test]
async fn update_tracking_plan_sends_mask() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/workspaces/acme/tracking-plans/rs_9"))
        .and(body_json(json!({
            "tracking_plan": {
                "display_name": "Checkout v2",
                "rules": {
                    "global": {},
                    "identify": {},
                    "group": {},
                    "identify_traits": [],
                    "group_traits": []
                }
            },
            "update_mask": {"paths": ["tracking_plan.display_name"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "workspaces/acme/tracking-plans/rs_9",
            "display_name": "Checkout v2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let plan = segform_core::TrackingPlan {
        display_name: "Checkout v2".to_string(),
        ..Default::default()
    };
    client_for(&server)
        .update_tracking_plan(
            &ShortId::new("rs_9"),
            UpdateMask::new(["tracking_plan.display_name"]),
            plan,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/workspaces/acme/tracking-plans/rs_9"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .delete_tracking_plan(&ShortId::new("rs_9"))
        .await
        .unwrap();
}

// ── Destinations ────────────────────────────────────────────────

#[tokio::test]
async fn create_destination_names_full_resource() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspaces/acme/sources/web/destinations/"))
        .and(body_json(json!({
            "destination": {
                "name": "workspaces/acme/sources/web/destinations/amplitude",
                "enabled": true,
                "connection_mode": "CLOUD",
                "config": [{
                    "name": "workspaces/acme/sources/web/destinations/amplitude/config/apiKey",
                    "display_name": "API Key",
                    "value": "abc",
                    "type": "string"
                }]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "workspaces/acme/sources/web/destinations/amplitude",
            "enabled": true,
            "connection_mode": "CLOUD"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let configs = vec![DestinationConfig {
        name: "workspaces/acme/sources/web/destinations/amplitude/config/apiKey".to_string(),
        display_name: "API Key".to_string(),
        value: Some(ConfigValue::from("abc")),
        config_type: "string".to_string(),
    }];
    let dest = client_for(&server)
        .create_destination("web", "amplitude", "CLOUD", true, configs)
        .await
        .unwrap();
    assert!(dest.enabled);
}

#[tokio::test]
async fn update_destination_sends_config_and_enabled_mask() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/workspaces/acme/sources/web/destinations/amplitude"))
        .and(body_json(json!({
            "destination": {"enabled": false, "config": []},
            "update_mask": {"paths": ["destination.config", "destination.enabled"]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "workspaces/acme/sources/web/destinations/amplitude",
            "enabled": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dest = client_for(&server)
        .update_destination("web", "amplitude", false, Vec::new())
        .await
        .unwrap();
    assert!(!dest.enabled);
}

// ── Source connections ──────────────────────────────────────────

#[tokio::test]
async fn create_source_connection_uses_source_resource_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/workspaces/acme/tracking-plans/rs_9/source-connections/"))
        .and(body_json(json!({"source_name": "workspaces/acme/sources/web"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "source_name": "workspaces/acme/sources/web",
            "tracking_plan_id": "rs_9"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conn = client_for(&server)
        .create_source_connection(&ShortId::new("rs_9"), "web")
        .await
        .unwrap();
    assert_eq!(conn.tracking_plan_id, "rs_9");
}

// ── Errors ──────────────────────────────────────────────────────

#[tokio::test]
async fn not_found_is_reported_with_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces/acme/sources/web/destinations/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"error\":\"not found\"}"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_destination("web", "gone")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    match err {
        ClientError::Remote { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "{\"error\":\"not found\"}");
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_remote_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces/acme/tracking-plans"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client_for(&server).list_tracking_plans().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workspaces/acme/tracking-plans/rs_1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_tracking_plan(&ShortId::new("rs_1"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::Decode {
            context: "tracking plan response",
            ..
        }
    ));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    let transport = HttpTransport::with_http_client(
        "http://127.0.0.1:1",
        "test-token",
        reqwest::Client::new(),
    );
    let client = SegmentClient::new("acme", Arc::new(transport));

    let err = client.list_tracking_plans().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
}
