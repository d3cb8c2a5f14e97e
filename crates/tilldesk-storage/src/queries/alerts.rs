// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-stock alert operations.
//!
//! The reorder job's idempotence rests on `unresolved_exists`: at most one
//! unresolved alert of a given type per inventory row.

use rusqlite::params;
use tilldesk_core::TilldeskError;

use crate::database::{map_tr_err, Database};
use crate::models::LowStockAlert;

/// Whether an unresolved alert of `alert_type` exists for the inventory row.
pub async fn unresolved_exists(
    db: &Database,
    inventory_id: i64,
    alert_type: &str,
) -> Result<bool, TilldeskError> {
    let alert_type = alert_type.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT count(*) FROM low_stock_alerts
                 WHERE inventory_id = ?1 AND alert_type = ?2 AND is_resolved = 0",
                params![inventory_id, alert_type],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Create an alert and return its id.
pub async fn create_alert(
    db: &Database,
    inventory_id: i64,
    alert_type: &str,
    resolved: bool,
) -> Result<i64, TilldeskError> {
    let alert_type = alert_type.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO low_stock_alerts (inventory_id, alert_type, is_resolved)
                 VALUES (?1, ?2, ?3)",
                params![inventory_id, alert_type, resolved],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Mark an alert resolved.
pub async fn resolve_alert(db: &Database, id: i64) -> Result<(), TilldeskError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE low_stock_alerts SET is_resolved = 1 WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// List alerts for one inventory row, oldest first.
pub async fn list_for_item(
    db: &Database,
    inventory_id: i64,
) -> Result<Vec<LowStockAlert>, TilldeskError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, inventory_id, alert_type, is_resolved, created_at
                 FROM low_stock_alerts WHERE inventory_id = ?1 ORDER BY id",
            )?;
            let rows = stmt.query_map(params![inventory_id], |row| {
                Ok(LowStockAlert {
                    id: row.get(0)?,
                    inventory_id: row.get(1)?,
                    alert_type: row.get(2)?,
                    is_resolved: row.get(3)?,
                    created_at: row.get(4)?,
                })
            })?;
            let mut alerts = Vec::new();
            for row in rows {
                alerts.push(row?);
            }
            Ok(alerts)
        })
        .await
        .map_err(map_tr_err)
}

/// Count of unresolved alerts across all inventory.
pub async fn open_count(db: &Database) -> Result<i64, TilldeskError> {
    db.connection()
        .call(|conn| {
            let count: i64 = conn.query_row(
                "SELECT count(*) FROM low_stock_alerts WHERE is_resolved = 0",
                [],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}
