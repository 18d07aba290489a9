// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chatline_line::{SIGNATURE_HEADER, parse_webhook};
use serde::Serialize;
use tracing::{debug, warn};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// POST {webhook_path}
///
/// Rejects unsigned or badly signed requests with 400 before looking at the
/// body. Verified events are dispatched in order; the response is `200 OK`
/// once all of them were handled.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("webhook request without signature header");
        return (StatusCode::BAD_REQUEST, "missing signature").into_response();
    };
    if let Err(e) = state.verifier.verify(&body, signature) {
        warn!(error = %e, "rejecting webhook request, check the channel secret");
        return (StatusCode::BAD_REQUEST, "invalid signature").into_response();
    }

    let events = match parse_webhook(&body) {
        Ok(events) => events,
        Err(e) => {
            warn!(error = %e, "rejecting malformed webhook body");
            return (StatusCode::BAD_REQUEST, "malformed body").into_response();
        }
    };
    debug!(events = events.len(), "webhook verified");

    state.dispatcher.dispatch(&events).await;
    (StatusCode::OK, "OK").into_response()
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}
