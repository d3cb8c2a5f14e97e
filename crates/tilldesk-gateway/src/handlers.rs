// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the portal surface.
//!
//! Every handler follows the same shape: open the browser session, run the
//! relevant guard, do the work, commit the session. Guard rejections return
//! before any work happens.

use axum::extract::{Form, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use tilldesk_core::{LoginData, Role, TilldeskError};
use tilldesk_gate::{require_role, require_role_api, verify_csrf};
use tilldesk_storage::queries::{alerts, inventory, notifications, orders, users};

use crate::auth::{csrf_rejection, require_api, require_page, supplied_csrf, ErrorResponse};
use crate::cookies::{commit_session, open_session, SessionContext};
use crate::server::GatewayState;

/// Sub-role required for the admin management API.
const MANAGEMENT: &str = "management";

/// Request body for POST /login/{role}.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Response body for POST /login/{role}.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Per-tab login token; pass it back to address this login instance.
    pub token: String,
    /// Per-session CSRF token for subsequent form posts.
    pub csrf_token: String,
    pub user_id: i64,
    pub username: String,
}

/// Request body for POST /logout/{role}.
#[derive(Debug, Deserialize)]
pub struct LogoutForm {
    /// Log out only this tab's login instance.
    #[serde(default)]
    pub token: Option<String>,
    /// Scope the logout to one user id.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub csrf_token: Option<String>,
}

/// Response body for GET /{role}/login.
#[derive(Debug, Serialize)]
pub struct LoginPageResponse {
    pub role: Role,
    /// CSRF token the login/logout forms must echo back.
    pub csrf_token: String,
}

/// Response body for GET /{role}/dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub role: Role,
    pub user_id: String,
    pub username: Option<String>,
}

/// Response body for GET /api/admin/summary.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub low_stock: usize,
    pub open_alerts: i64,
    pub pending_orders: i64,
}

/// Query string for GET /api/session/{role}.
#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    /// Per-tab login token; omitted by legacy callers.
    #[serde(default)]
    pub token: Option<String>,
}

/// Query string for GET /api/notifications/count.
#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub recipient_type: String,
    pub recipient_id: i64,
}

/// Response body for GET /api/notifications/count.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

fn internal_error(e: TilldeskError) -> Response {
    tracing::error!(error = %e, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal error".to_string(),
        }),
    )
        .into_response()
}

async fn open(gw: &GatewayState, headers: &HeaderMap) -> Result<SessionContext, Response> {
    open_session(&gw.backend, headers, &gw.cookie_name)
        .await
        .map_err(internal_error)
}

async fn commit(gw: &GatewayState, ctx: &SessionContext, response: Response) -> Response {
    match commit_session(&gw.backend, &gw.cookie_name, ctx, response).await {
        Ok(response) => response,
        Err(e) => internal_error(e),
    }
}

/// GET /health
///
/// Unauthenticated liveness endpoint.
pub async fn get_health(State(gw): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: gw.health.start_time.elapsed().as_secs(),
    })
}

/// GET /{role}/login
///
/// Stand-in for the login page render: opens the browser session and hands
/// out the CSRF token the login form must echo back.
pub async fn get_login_page(
    State(gw): State<GatewayState>,
    Path(role): Path<Role>,
    headers: HeaderMap,
) -> Response {
    let mut ctx = match open(&gw, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };
    let csrf_token = ctx.state.ensure_csrf_secret().to_string();
    let response = Json(LoginPageResponse { role, csrf_token }).into_response();
    commit(&gw, &ctx, response).await
}

/// POST /login/{role}
///
/// Verifies credentials against the users table and creates a login
/// instance for this tab. A failed credential check leaves the session
/// untouched.
pub async fn post_login(
    State(gw): State<GatewayState>,
    Path(role): Path<Role>,
    headers: HeaderMap,
    Form(body): Form<LoginForm>,
) -> Response {
    let mut ctx = match open(&gw, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let user = match users::verify_credentials(
        &gw.db,
        &body.username,
        &role.to_string(),
        &body.password,
    )
    .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(%role, username = body.username, "login rejected");
            return (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse {
                    error: "invalid credentials".to_string(),
                }),
            )
                .into_response();
        }
        Err(e) => return internal_error(e),
    };

    let mut data = LoginData::new()
        .with("user_id", user.id.to_string())
        .with("username", user.username.clone());
    if let Some(email) = &user.email {
        data = data.with("email", email.clone());
    }
    if let Some(sub_role) = &user.sub_role {
        data = data.with("role", sub_role.clone());
    }

    let token = ctx.state.create_login(role, data);
    let csrf_token = ctx.state.ensure_csrf_secret().to_string();
    tracing::info!(%role, user_id = user.id, "login created");

    let response = Json(LoginResponse {
        token,
        csrf_token,
        user_id: user.id,
        username: user.username,
    })
    .into_response();
    commit(&gw, &ctx, response).await
}

/// POST /logout/{role}
///
/// CSRF-guarded. Without a token the whole role is logged out (optionally
/// scoped by user id); with one, only that tab's instance goes.
pub async fn post_logout(
    State(gw): State<GatewayState>,
    Path(role): Path<Role>,
    headers: HeaderMap,
    Form(body): Form<LogoutForm>,
) -> Response {
    let mut ctx = match open(&gw, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    if !verify_csrf(&ctx.state, supplied_csrf(body.csrf_token.as_deref(), &headers)) {
        return csrf_rejection();
    }

    ctx.state
        .clear_login(role, body.user_id.as_deref(), body.token.as_deref());

    let response = StatusCode::NO_CONTENT.into_response();
    commit(&gw, &ctx, response).await
}

/// GET /api/session/{role}
///
/// The login attributes for this tab. With a token, resolves that tab's
/// instance (refreshing its activity clock); without one, falls back to the
/// first-created instance of the role and then the legacy mirror.
pub async fn get_session_info(
    State(gw): State<GatewayState>,
    Path(role): Path<Role>,
    headers: HeaderMap,
    Query(query): Query<SessionQuery>,
) -> Response {
    let mut ctx = match open(&gw, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let response = match ctx.state.get_login(role, query.token.as_deref()) {
        Some(data) => Json(data).into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "authentication required".to_string(),
            }),
        )
            .into_response(),
    };
    // Commit even on miss so the activity refresh of a token hit persists.
    commit(&gw, &ctx, response).await
}

/// GET /{role}/dashboard
///
/// Representative guarded page route: unauthorized requests are redirected
/// to the role's login page before any page logic runs.
pub async fn get_dashboard(
    State(gw): State<GatewayState>,
    Path(role): Path<Role>,
    headers: HeaderMap,
) -> Response {
    let ctx = match open(&gw, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let response = match require_page(require_role(&ctx.state, role), role) {
        Ok(data) => Json(DashboardResponse {
            role,
            user_id: data.user_id().unwrap_or_default().to_string(),
            username: data
                .get("username")
                .and_then(|v| v.as_str())
                .map(String::from),
        })
        .into_response(),
        Err(rejection) => rejection,
    };
    commit(&gw, &ctx, response).await
}

/// GET /api/admin/summary
///
/// Management-only admin API: 401 without an admin login, 403 for admin
/// logins without the management sub-role.
pub async fn get_admin_summary(
    State(gw): State<GatewayState>,
    headers: HeaderMap,
) -> Response {
    let ctx = match open(&gw, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    if let Err(rejection) = require_api(require_role_api(&ctx.state, Role::Admin, MANAGEMENT)) {
        return rejection;
    }

    let low_stock = match inventory::list_low_stock(&gw.db).await {
        Ok(items) => items.len(),
        Err(e) => return internal_error(e),
    };
    let open_alerts = match alerts::open_count(&gw.db).await {
        Ok(count) => count,
        Err(e) => return internal_error(e),
    };
    let pending_orders = match orders::pending_count(&gw.db).await {
        Ok(count) => count,
        Err(e) => return internal_error(e),
    };

    let response = Json(SummaryResponse {
        low_stock,
        open_alerts,
        pending_orders,
    })
    .into_response();
    commit(&gw, &ctx, response).await
}

/// GET /api/notifications/count
///
/// Thin unread counter polled by the notification badge. The caller must be
/// logged in under the recipient's role.
pub async fn get_notification_count(
    State(gw): State<GatewayState>,
    headers: HeaderMap,
    Query(query): Query<CountQuery>,
) -> Response {
    let ctx = match open(&gw, &headers).await {
        Ok(ctx) => ctx,
        Err(response) => return response,
    };

    let Ok(role) = Role::from_str(&query.recipient_type) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("unknown recipient_type `{}`", query.recipient_type),
            }),
        )
            .into_response();
    };

    if let Err(rejection) = require_api(require_role(&ctx.state, role)) {
        return rejection;
    }

    let count = match notifications::unread_count(&gw.db, &query.recipient_type, query.recipient_id)
        .await
    {
        Ok(count) => count,
        Err(e) => return internal_error(e),
    };

    let response = Json(CountResponse { count }).into_response();
    commit(&gw, &ctx, response).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_form_deserializes_from_urlencoded_fields() {
        let form: LoginForm =
            serde_urlencoded_from_str("username=pat&password=hunter2").unwrap();
        assert_eq!(form.username, "pat");
        assert_eq!(form.password, "hunter2");
    }

    #[test]
    fn logout_form_fields_are_all_optional() {
        let form: LogoutForm = serde_urlencoded_from_str("").unwrap();
        assert!(form.token.is_none());
        assert!(form.user_id.is_none());
        assert!(form.csrf_token.is_none());

        let form: LogoutForm =
            serde_urlencoded_from_str("token=abc&user_id=1&csrf_token=x").unwrap();
        assert_eq!(form.token.as_deref(), Some("abc"));
        assert_eq!(form.user_id.as_deref(), Some("1"));
    }

    #[test]
    fn error_response_serializes_with_error_field() {
        let json = serde_json::to_string(&ErrorResponse {
            error: "authentication required".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"error\":\"authentication required\""));
    }

    #[test]
    fn count_response_serializes() {
        let json = serde_json::to_string(&CountResponse { count: 3 }).unwrap();
        assert_eq!(json, "{\"count\":3}");
    }

    // Form extraction in axum goes through serde_urlencoded; decode the same
    // way here without pulling the crate into the dependency list.
    fn serde_urlencoded_from_str<T: serde::de::DeserializeOwned>(
        input: &str,
    ) -> Result<T, serde_json::Error> {
        let mut map = serde_json::Map::new();
        for pair in input.split('&').filter(|p| !p.is_empty()) {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            map.insert(k.to_string(), serde_json::Value::String(v.to_string()));
        }
        serde_json::from_value(serde_json::Value::Object(map))
    }
}
