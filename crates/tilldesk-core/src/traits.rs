// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend trait for server-side session persistence.

use async_trait::async_trait;

use crate::error::TilldeskError;
use crate::types::SessionId;

/// Key-value persistence for per-browser session state.
///
/// The stored value is an opaque serialized blob owned by the session layer;
/// backends never inspect it. Implementations must serialize concurrent
/// operations on the same session id (the in-memory backend relies on
/// per-entry locking, the SQLite backend on its single writer), so a
/// load-mutate-save cycle within one request never loses updates.
#[async_trait]
pub trait SessionBackend: Send + Sync + 'static {
    /// Load the serialized state for a session, refreshing its idle clock.
    async fn load(&self, sid: &SessionId) -> Result<Option<String>, TilldeskError>;

    /// Persist the serialized state for a session, creating it if absent.
    async fn save(&self, sid: &SessionId, state: &str) -> Result<(), TilldeskError>;

    /// Drop a session entirely. Removing an unknown id is a no-op.
    async fn remove(&self, sid: &SessionId) -> Result<(), TilldeskError>;
}
