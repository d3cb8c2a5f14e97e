// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialized session state, keyed by the browser-session cookie id.

use rusqlite::params;
use tilldesk_core::TilldeskError;

use crate::database::{map_tr_err, Database};

/// Load the serialized state for a session id.
pub async fn load_state(db: &Database, id: &str) -> Result<Option<String>, TilldeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT state FROM sessions WHERE id = ?1",
                params![id],
                |row| row.get::<_, String>(0),
            );
            match result {
                Ok(state) => {
                    conn.execute(
                        "UPDATE sessions
                         SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         WHERE id = ?1",
                        params![id],
                    )?;
                    Ok(Some(state))
                }
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or replace the serialized state for a session id.
pub async fn save_state(db: &Database, id: &str, state: &str) -> Result<(), TilldeskError> {
    let id = id.to_string();
    let state = state.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (id, state) VALUES (?1, ?2)
                 ON CONFLICT (id) DO UPDATE
                 SET state = excluded.state,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                params![id, state],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a session. Unknown ids are a no-op.
pub async fn delete_state(db: &Database, id: &str) -> Result<(), TilldeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Delete sessions idle longer than `max_idle_secs`. Returns the count dropped.
pub async fn purge_stale(db: &Database, max_idle_secs: i64) -> Result<usize, TilldeskError> {
    db.connection()
        .call(move |conn| {
            let dropped = conn.execute(
                "DELETE FROM sessions
                 WHERE updated_at < strftime('%Y-%m-%dT%H:%M:%fZ', 'now', ?1)",
                params![format!("-{max_idle_secs} seconds")],
            )?;
            Ok(dropped)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn save_load_delete_round_trips() {
        let (db, _dir) = setup_db().await;

        save_state(&db, "sid-1", r#"{"instances":[]}"#).await.unwrap();
        let loaded = load_state(&db, "sid-1").await.unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"{"instances":[]}"#));

        save_state(&db, "sid-1", r#"{"instances":[1]}"#).await.unwrap();
        let loaded = load_state(&db, "sid-1").await.unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"{"instances":[1]}"#));

        delete_state(&db, "sid-1").await.unwrap();
        assert!(load_state(&db, "sid-1").await.unwrap().is_none());

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn load_of_unknown_session_is_none() {
        let (db, _dir) = setup_db().await;
        assert!(load_state(&db, "missing").await.unwrap().is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn purge_stale_drops_only_idle_sessions() {
        let (db, _dir) = setup_db().await;
        save_state(&db, "fresh", "{}").await.unwrap();
        save_state(&db, "stale", "{}").await.unwrap();

        // Backdate one session's activity clock.
        db.connection()
            .call(|conn| {
                conn.execute(
                    "UPDATE sessions
                     SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now', '-2 hours')
                     WHERE id = 'stale'",
                    [],
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .unwrap();

        let dropped = purge_stale(&db, 3600).await.unwrap();
        assert_eq!(dropped, 1);
        assert!(load_state(&db, "fresh").await.unwrap().is_some());
        assert!(load_state(&db, "stale").await.unwrap().is_none());

        db.close().await.unwrap();
    }
}
