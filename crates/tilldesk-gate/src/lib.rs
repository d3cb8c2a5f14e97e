// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access-control gate for the Tilldesk portals.
//!
//! Guards are pure functions over the session's legacy mirror and return a
//! structured [`AuthResult`]; the web layer translates results into redirects
//! or JSON error responses. Nothing here writes an HTTP response or
//! terminates a request, which keeps the gate unit-testable on its own.

use tilldesk_core::{LoginData, Role};
use tilldesk_session::SessionState;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthResult {
    /// Request may proceed; carries the authenticated login data.
    Allowed(LoginData),
    /// No authenticated login for the required role.
    Unauthorized,
    /// Authenticated, but the login lacks the required sub-role.
    Forbidden(String),
}

impl AuthResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthResult::Allowed(_))
    }
}

/// Page guard: the legacy mirror for `role` must hold a login with a
/// `user_id`. Anything else is unauthorized (the web layer redirects to the
/// role's login page).
pub fn require_role(state: &SessionState, role: Role) -> AuthResult {
    match state.mirror.get(&role) {
        Some(data) if data.user_id().is_some() => AuthResult::Allowed(data.clone()),
        _ => AuthResult::Unauthorized,
    }
}

/// API guard: like [`require_role`], but additionally requires the login's
/// `role` attribute to equal `required_sub_role` (e.g. management-only admin
/// endpoints). Unauthenticated maps to 401, wrong sub-role to 403 at the web
/// layer.
pub fn require_role_api(
    state: &SessionState,
    role: Role,
    required_sub_role: &str,
) -> AuthResult {
    match state.mirror.get(&role) {
        Some(data) if data.user_id().is_some() => {
            if data.role() == Some(required_sub_role) {
                AuthResult::Allowed(data.clone())
            } else {
                tracing::debug!(%role, required_sub_role, "sub-role mismatch");
                AuthResult::Forbidden(format!("{required_sub_role} access required"))
            }
        }
        _ => AuthResult::Unauthorized,
    }
}

/// Constant-time comparison of the per-session CSRF secret against the
/// token supplied via form field or `X-CSRF-Token` header.
///
/// A session without a secret rejects everything; so does a missing or
/// mismatched supplied token.
pub fn verify_csrf(state: &SessionState, supplied: Option<&str>) -> bool {
    let Some(secret) = state.csrf_secret.as_deref() else {
        return false;
    };
    let Some(supplied) = supplied else {
        return false;
    };
    ring::constant_time::verify_slices_are_equal(secret.as_bytes(), supplied.as_bytes())
        .is_ok()
}
