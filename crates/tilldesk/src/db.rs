// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database bootstrap shared by the serve and stock-check commands.

use tilldesk_core::TilldeskError;
use tilldesk_storage::Database;

/// Open the configured database, creating its parent directory if needed.
///
/// A database that cannot be opened aborts the whole command; nothing in
/// this binary runs without storage.
pub async fn open_database(database_path: &str) -> Result<Database, TilldeskError> {
    if let Some(parent) = std::path::Path::new(database_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| TilldeskError::Storage {
            source: Box::new(e),
        })?;
    }
    Database::open(database_path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("var/lib/tilldesk/till.db");
        let db = open_database(nested.to_str().unwrap()).await.unwrap();
        db.close().await.unwrap();
        assert!(nested.exists());
    }
}
