// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Portal HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the three portals.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tilldesk_core::{SessionBackend, TilldeskError};
use tilldesk_storage::Database;

use crate::handlers;

/// Health state for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Session persistence backend.
    pub backend: Arc<dyn SessionBackend>,
    /// Database handle for query operations.
    pub db: Database,
    /// Name of the browser-session cookie.
    pub cookie_name: String,
    /// Health state for the public endpoint.
    pub health: HealthState,
}

/// Portal server configuration (mirrors ServerConfig from tilldesk-config).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Build the portal router.
///
/// Routes:
/// - GET  /health (public)
/// - GET  /{role}/login, POST /login/{role}, POST /logout/{role}
/// - GET  /{role}/dashboard (page guard: redirect on rejection)
/// - GET  /api/session/{role} (tab-token login lookup)
/// - GET  /api/admin/summary (API guard: 401/403 JSON)
/// - GET  /api/notifications/count (API guard: 401 JSON)
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let portal_routes = Router::new()
        .route("/{role}/login", get(handlers::get_login_page))
        .route("/login/{role}", post(handlers::post_login))
        .route("/logout/{role}", post(handlers::post_logout))
        .route("/{role}/dashboard", get(handlers::get_dashboard))
        .route("/api/session/{role}", get(handlers::get_session_info))
        .route("/api/admin/summary", get(handlers::get_admin_summary))
        .route(
            "/api/notifications/count",
            get(handlers::get_notification_count),
        )
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(portal_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the portal HTTP server and serve until `cancel` fires.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    cancel: CancellationToken,
) -> Result<(), TilldeskError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| TilldeskError::Http {
            message: format!("failed to bind portal server to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("portal server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .map_err(|e| TilldeskError::Http {
            message: format!("portal server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
