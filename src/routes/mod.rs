pub mod api;
pub mod webhooks;

use std::sync::Arc;

use axum::{Router, routing::get};
use http::{HeaderValue, Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::handlers::api::health_check;
use crate::state::AppState;

/// Build the complete application: health check, webhook receiver and
/// call-control gateway, wrapped in CORS and security header layers.
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors_layer = cors_layer(state.config.cors_allowed_origins.as_deref());

    let security_headers = tower::ServiceBuilder::new().layer(SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ));

    Router::new()
        .route("/", get(health_check))
        .merge(webhooks::create_webhook_router())
        .merge(api::create_api_router())
        .with_state(state)
        .layer(cors_layer)
        .layer(security_headers)
}

/// CORS policy from the configured origins
///
/// `None` or `"*"` allows any origin without credentials. Otherwise the value
/// is a comma-separated allow-list and credentials are permitted.
fn cors_layer(origins: Option<&str>) -> CorsLayer {
    match origins {
        None | Some("*") => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(false),
        Some(origins) => {
            // Parse comma-separated origins
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            info!("CORS restricted to {} origin(s)", origins.len());
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true)
        }
    }
}
