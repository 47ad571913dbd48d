//! Shared helpers for integration tests
#![allow(dead_code)]

use std::net::TcpListener;
use std::time::Duration;

use axum::{Router, body::Body, http::Request, response::Response};
use tower::util::ServiceExt;
use wiremock::MockServer;

use telnyx_relay::{ServerConfig, routes, state::AppState};

pub const TEST_API_KEY: &str = "test_telnyx_key";
pub const TEST_FROM_NUMBER: &str = "+15550001111";
pub const TEST_CONNECTION_ID: &str = "1494404757140276705";

/// Minimal configuration pointing the Telnyx client at `base_url`
pub fn create_test_config(base_url: &str) -> ServerConfig {
    let mut config = ServerConfig::default();
    config.host = "127.0.0.1".to_string();
    config.telnyx_api_key = TEST_API_KEY.to_string();
    config.telnyx_from_number = TEST_FROM_NUMBER.to_string();
    config.telnyx_connection_id = TEST_CONNECTION_ID.to_string();
    config.telnyx_api_base_url = base_url.to_string();
    config
}

/// The router the binary serves, built from `config`
pub fn create_app(config: ServerConfig) -> Router {
    let app_state = AppState::new(config).expect("test config must be valid");
    routes::create_app(app_state)
}

pub async fn post(app: &Router, uri: &str, body: Option<&str>) -> Response {
    let mut builder = Request::builder().method("POST").uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Find a port nothing is listening on
pub fn find_available_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Poll the mock server until it has seen `count` requests or two seconds pass.
///
/// Needed for fire-and-forget calls that complete after the webhook response.
pub async fn wait_for_requests(server: &MockServer, count: usize) {
    for _ in 0..100 {
        let seen = server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0);
        if seen >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
