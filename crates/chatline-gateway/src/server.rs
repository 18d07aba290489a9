// SPDX-FileCopyrightText: 2026 Chatline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP server built on axum.
//!
//! Sets up routes, tracing middleware, and shared state.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use chatline_config::model::ServerConfig;
use chatline_core::ChatlineError;
use chatline_line::WebhookVerifier;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::dispatch::EventDispatcher;
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Checks `X-Line-Signature` against the raw body.
    pub verifier: Arc<WebhookVerifier>,
    /// Routes verified events to their handlers.
    pub dispatcher: Arc<EventDispatcher>,
    /// Process start time for uptime calculation.
    pub start_time: Instant,
}

impl GatewayState {
    pub fn new(verifier: WebhookVerifier, dispatcher: EventDispatcher) -> Self {
        Self {
            verifier: Arc::new(verifier),
            dispatcher: Arc::new(dispatcher),
            start_time: Instant::now(),
        }
    }
}

/// Routes:
/// - `POST {webhook_path}` - signed LINE webhook
/// - `GET /health` - liveness probe
pub fn build_router(webhook_path: &str, state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(webhook_path, post(handlers::post_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `host:port` and serves until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), ChatlineError> {
    let app = build_router(&config.webhook_path, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ChatlineError::Channel {
            message: format!("failed to bind webhook server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!(addr = addr.as_str(), path = config.webhook_path.as_str(), "webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| ChatlineError::Channel {
            message: format!("webhook server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("webhook server stopped");
    Ok(())
}
