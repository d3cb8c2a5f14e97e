// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Browser-session plumbing: cookie in, state load, mutate, state save,
//! cookie out.
//!
//! Every portal handler opens a [`SessionContext`] first and commits it
//! last, so one request sees one consistent load-mutate-save cycle. The
//! backend serializes concurrent cycles for the same session id.

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;

use tilldesk_core::{SessionBackend, SessionId, TilldeskError};
use tilldesk_session::SessionState;

/// One request's view of the browser session.
pub struct SessionContext {
    pub sid: SessionId,
    pub state: SessionState,
    /// True when this request issued the session id and the response must
    /// carry the Set-Cookie header.
    pub issued: bool,
}

/// Extract the session id from the `Cookie` header.
pub fn session_id_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<SessionId> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == cookie_name && !value.is_empty()).then(|| SessionId(value.to_string()))
    })
}

/// Load the session named by the request cookie, or start a fresh one.
pub async fn open_session(
    backend: &Arc<dyn SessionBackend>,
    headers: &HeaderMap,
    cookie_name: &str,
) -> Result<SessionContext, TilldeskError> {
    if let Some(sid) = session_id_from_headers(headers, cookie_name) {
        if let Some(blob) = backend.load(&sid).await? {
            return Ok(SessionContext {
                sid,
                state: SessionState::from_blob(&blob)?,
                issued: false,
            });
        }
        // Cookie names a session the backend no longer has (expired or
        // purged): start over with a fresh id.
    }

    Ok(SessionContext {
        sid: SessionId(uuid::Uuid::new_v4().to_string()),
        state: SessionState::default(),
        issued: true,
    })
}

/// Persist the session and stamp the response with the cookie when this
/// request created the session.
pub async fn commit_session(
    backend: &Arc<dyn SessionBackend>,
    cookie_name: &str,
    ctx: &SessionContext,
    mut response: Response,
) -> Result<Response, TilldeskError> {
    backend.save(&ctx.sid, &ctx.state.to_blob()?).await?;

    if ctx.issued {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            cookie_name,
            ctx.sid.as_str()
        );
        let value = HeaderValue::from_str(&cookie).map_err(|e| TilldeskError::Http {
            message: "session cookie not header-safe".to_string(),
            source: Some(Box::new(e)),
        })?;
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    Ok(response)
}
