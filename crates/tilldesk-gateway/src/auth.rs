// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation of gate verdicts into HTTP responses.
//!
//! The gate itself only produces [`AuthResult`]; this module owns the HTTP
//! shape of a rejection. Page routes redirect to the role's login page, API
//! routes answer with a JSON error envelope, CSRF failures get a bare 403.
//! All three are fail-closed: handlers return the rejection before touching
//! any page logic.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use tilldesk_core::{LoginData, Role};
use tilldesk_gate::AuthResult;

/// Error response body for API rejections.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Translate a page-context guard verdict: anything but `Allowed` becomes a
/// redirect to the role's login page.
pub fn require_page(result: AuthResult, role: Role) -> Result<LoginData, Response> {
    match result {
        AuthResult::Allowed(data) => Ok(data),
        _ => Err(Redirect::to(&format!("/{role}/login")).into_response()),
    }
}

/// Translate an API-context guard verdict: 401 for missing authentication,
/// 403 for a sub-role mismatch, both with a JSON error envelope.
pub fn require_api(result: AuthResult) -> Result<LoginData, Response> {
    match result {
        AuthResult::Allowed(data) => Ok(data),
        AuthResult::Unauthorized => Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "authentication required".to_string(),
            }),
        )
            .into_response()),
        AuthResult::Forbidden(reason) => Err((
            StatusCode::FORBIDDEN,
            Json(ErrorResponse { error: reason }),
        )
            .into_response()),
    }
}

/// The response for a failed CSRF check: a bare 403.
pub fn csrf_rejection() -> Response {
    StatusCode::FORBIDDEN.into_response()
}

/// The supplied CSRF token: form field first, `X-CSRF-Token` header as the
/// fallback for AJAX callers.
pub fn supplied_csrf<'a>(form_value: Option<&'a str>, headers: &'a HeaderMap) -> Option<&'a str> {
    form_value.or_else(|| {
        headers
            .get("x-csrf-token")
            .and_then(|v| v.to_str().ok())
    })
}
