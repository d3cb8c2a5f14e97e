// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed session persistence.
//!
//! Serializes concurrent access per session through the database's single
//! writer thread, which is what lets the session layer assume a
//! load-mutate-save cycle never loses updates.

use async_trait::async_trait;

use tilldesk_core::{SessionBackend, SessionId, TilldeskError};

use crate::database::Database;
use crate::queries::sessions;

/// Session backend storing serialized state in the `sessions` table.
#[derive(Clone)]
pub struct SqliteSessionBackend {
    db: Database,
}

impl SqliteSessionBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Delete sessions idle longer than `max_idle_secs`.
    pub async fn purge_stale(&self, max_idle_secs: i64) -> Result<usize, TilldeskError> {
        sessions::purge_stale(&self.db, max_idle_secs).await
    }
}

#[async_trait]
impl SessionBackend for SqliteSessionBackend {
    async fn load(&self, sid: &SessionId) -> Result<Option<String>, TilldeskError> {
        sessions::load_state(&self.db, sid.as_str()).await
    }

    async fn save(&self, sid: &SessionId, state: &str) -> Result<(), TilldeskError> {
        sessions::save_state(&self.db, sid.as_str(), state).await
    }

    async fn remove(&self, sid: &SessionId) -> Result<(), TilldeskError> {
        sessions::delete_state(&self.db, sid.as_str()).await
    }
}
