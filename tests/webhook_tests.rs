//! Webhook receiver tests
//!
//! Covers event dispatch, the fire-and-forget transfer on `call.answered`,
//! rejection of malformed bodies, and optional Ed25519 signature checks.

mod common;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::json;
use tower::util::ServiceExt;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use telnyx_relay::config::DEFAULT_TRANSFER_DESTINATION;
use telnyx_relay::telnyx::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};

use common::{TEST_API_KEY, body_bytes, create_app, create_test_config, post, wait_for_requests};

const ANSWERED: &str =
    r#"{"data":{"event_type":"call.answered","payload":{"call_control_id":"abc123"}}}"#;

async fn reject_everything(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_call_answered_triggers_one_transfer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/calls/abc123/actions/transfer"))
        .and(header("authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(body_json(json!({"to": DEFAULT_TRANSFER_DESTINATION})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"result": "ok"}})))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_app(create_test_config(&server.uri()));
    let response = post(&app, "/webhooks/telnyx", Some(ANSWERED)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");

    wait_for_requests(&server, 1).await;
    server.verify().await;
}

#[tokio::test]
async fn test_call_answered_uses_configured_destination() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/calls/abc123/actions/transfer"))
        .and(body_json(json!({"to": "sip:frontdesk@example.sip.telnyx.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server.uri());
    config.transfer_destination = "sip:frontdesk@example.sip.telnyx.com".to_string();
    let app = create_app(config);

    let response = post(&app, "/webhooks/telnyx", Some(ANSWERED)).await;
    assert_eq!(response.status(), StatusCode::OK);

    wait_for_requests(&server, 1).await;
    server.verify().await;
}

#[tokio::test]
async fn test_failed_transfer_still_acknowledged() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/calls/abc123/actions/transfer"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": [{"code": "90018", "title": "Call has already ended"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_app(create_test_config(&server.uri()));
    let response = post(&app, "/webhooks/telnyx", Some(ANSWERED)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");

    wait_for_requests(&server, 1).await;
    server.verify().await;
}

#[tokio::test]
async fn test_dtmf_received_makes_no_outbound_call() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(create_test_config(&server.uri()));
    let response = post(
        &app,
        "/webhooks/telnyx",
        Some(r#"{"data":{"event_type":"call.dtmf.received","payload":{"call_control_id":"abc123","digit":"5"}}}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dtmf_with_numeric_digit_is_acknowledged() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(create_test_config(&server.uri()));
    let response = post(
        &app,
        "/webhooks/telnyx",
        Some(r#"{"data":{"event_type":"call.dtmf.received","payload":{"digit":5}}}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_event_without_type_is_acknowledged() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(create_test_config(&server.uri()));
    for body in [
        r#"{"data":{"payload":{"call_control_id":"abc123"}}}"#,
        r#"{"data":{"event_type":7,"payload":{}}}"#,
    ] {
        let response = post(&app, "/webhooks/telnyx", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK, "body {body}");
        assert_eq!(body_bytes(response).await, b"ok");
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_event_is_acknowledged_without_action() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(create_test_config(&server.uri()));
    let response = post(
        &app,
        "/webhooks/telnyx",
        Some(r#"{"data":{"event_type":"call.hangup","payload":{"call_control_id":"abc123"}}}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(create_test_config(&server.uri()));
    let response = post(&app, "/webhooks/telnyx", Some("this is not json")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_bytes(response).await, b"invalid signature");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_answered_without_call_id_is_rejected() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(create_test_config(&server.uri()));
    let response = post(
        &app,
        "/webhooks/telnyx",
        Some(r#"{"data":{"event_type":"call.answered","payload":{}}}"#),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_body_without_content_type_is_accepted() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(create_test_config(&server.uri()));
    let request = Request::builder()
        .method("POST")
        .uri("/webhooks/telnyx")
        .body(Body::from(r#"{"data":{"event_type":"call.initiated","payload":{}}}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Signature verification
// =============================================================================

fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[17u8; 32])
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

fn signed_request(body: &str, timestamp: u64) -> Request<Body> {
    let message = format!("{timestamp}|{body}");
    let signature = signing_key().sign(message.as_bytes());

    Request::builder()
        .method("POST")
        .uri("/webhooks/telnyx")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, STANDARD.encode(signature.to_bytes()))
        .header(TIMESTAMP_HEADER, timestamp.to_string())
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn verifying_config(base_url: &str) -> telnyx_relay::ServerConfig {
    let mut config = create_test_config(base_url);
    config.webhook_public_key = Some(STANDARD.encode(signing_key().verifying_key().to_bytes()));
    config
}

#[tokio::test]
async fn test_signed_webhook_is_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/calls/abc123/actions/transfer"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let app = create_app(verifying_config(&server.uri()));
    let response = app
        .oneshot(signed_request(ANSWERED, now_secs()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    wait_for_requests(&server, 1).await;
    server.verify().await;
}

#[tokio::test]
async fn test_unsigned_webhook_is_rejected_when_key_configured() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(verifying_config(&server.uri()));
    let response = post(&app, "/webhooks/telnyx", Some(ANSWERED)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_bytes(response).await, b"invalid signature");

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_signed_webhook_is_rejected() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(verifying_config(&server.uri()));
    let response = app
        .oneshot(signed_request(ANSWERED, now_secs() - 3600))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tampered_webhook_is_rejected() {
    let server = MockServer::start().await;
    reject_everything(&server).await;

    let app = create_app(verifying_config(&server.uri()));
    let mut request = signed_request(ANSWERED, now_secs());
    *request.body_mut() = Body::from(ANSWERED.replace("abc123", "evil456"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
