use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::calls;
use crate::state::AppState;
use std::sync::Arc;

/// Create the call-control gateway router
///
/// Every route forwards to one Telnyx Call Control action. There is no local
/// authentication; the Telnyx credential is attached by the client.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/calls", post(calls::create_call))
        .route("/api/calls/{call_control_id}/dtmf", post(calls::send_dtmf))
        .route(
            "/api/calls/{call_control_id}/record/start",
            post(calls::record_start),
        )
        .route(
            "/api/calls/{call_control_id}/record/stop",
            post(calls::record_stop),
        )
        .route("/api/calls/{call_control_id}/hangup", post(calls::hangup))
        .layer(TraceLayer::new_for_http())
}
