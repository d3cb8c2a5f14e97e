// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use tilldesk_core::TilldeskError;
use tokio_rusqlite::Connection;

use crate::migrations;

/// Handle to the single SQLite connection for the process.
#[derive(Clone)]
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply PRAGMAs, and
    /// run pending migrations.
    pub async fn open(path: &str) -> Result<Self, TilldeskError> {
        let connection = Connection::open(path.to_owned())
            .await
            .map_err(|e| TilldeskError::Storage {
                source: Box::new(e),
            })?;

        connection
            .call(|conn| {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(|e| TilldeskError::Storage {
                        source: Box::new(e),
                    })?;
                conn.pragma_update(None, "synchronous", "NORMAL")
                    .map_err(|e| TilldeskError::Storage {
                        source: Box::new(e),
                    })?;
                conn.pragma_update(None, "foreign_keys", "ON")
                    .map_err(|e| TilldeskError::Storage {
                        source: Box::new(e),
                    })?;
                conn.pragma_update(None, "busy_timeout", 5000)
                    .map_err(|e| TilldeskError::Storage {
                        source: Box::new(e),
                    })?;
                migrations::run_migrations(conn)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err_td)?;

        tracing::info!(path, "database opened");
        Ok(Self { connection })
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Close the connection, flushing pending writes.
    pub async fn close(&self) -> Result<(), TilldeskError> {
        self.connection.clone().close().await.map_err(map_tr_err)
    }
}

/// Map a tokio-rusqlite error into the workspace error type.
pub fn map_tr_err(err: tokio_rusqlite::Error) -> TilldeskError {
    TilldeskError::Storage {
        source: Box::new(err),
    }
}

/// Map a tokio-rusqlite error whose application error is already a
/// `TilldeskError` into the workspace error type.
fn map_tr_err_td(err: tokio_rusqlite::Error<TilldeskError>) -> TilldeskError {
    match err {
        tokio_rusqlite::Error::Error(e) => e,
        other => TilldeskError::Storage {
            source: Box::new(other),
        },
    }
}
