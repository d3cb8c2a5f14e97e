// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inventory read model and maintenance operations.

use rusqlite::params;
use tilldesk_core::TilldeskError;

use crate::database::{map_tr_err, Database};
use crate::models::{InventoryItem, LowStockItem};

/// Insert an inventory row and return its id.
pub async fn create_item(
    db: &Database,
    name: &str,
    quantity: i64,
    reorder_threshold: i64,
    supplier_id: i64,
) -> Result<i64, TilldeskError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO inventory (name, quantity, reorder_threshold, supplier_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, quantity, reorder_threshold, supplier_id],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Get an inventory row by id.
pub async fn get_item(db: &Database, id: i64) -> Result<Option<InventoryItem>, TilldeskError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, quantity, reorder_threshold, supplier_id, updated_at
                 FROM inventory WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                Ok(InventoryItem {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    quantity: row.get(2)?,
                    reorder_threshold: row.get(3)?,
                    supplier_id: row.get(4)?,
                    updated_at: row.get(5)?,
                })
            });
            match result {
                Ok(item) => Ok(Some(item)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Set the on-hand quantity for an item.
pub async fn set_quantity(db: &Database, id: i64, quantity: i64) -> Result<(), TilldeskError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE inventory
                 SET quantity = ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![quantity, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All rows currently below their reorder threshold, ordered by id.
///
/// This ordering is the contract the reorder job depends on: rows are
/// processed exactly in the order returned here.
pub async fn list_low_stock(db: &Database) -> Result<Vec<LowStockItem>, TilldeskError> {
    db.connection()
        .call(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, quantity, reorder_threshold, supplier_id
                 FROM inventory WHERE quantity < reorder_threshold ORDER BY id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(LowStockItem {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    quantity: row.get(2)?,
                    reorder_threshold: row.get(3)?,
                    supplier_id: row.get(4)?,
                })
            })?;
            let mut items = Vec::new();
            for row in rows {
                items.push(row?);
            }
            Ok(items)
        })
        .await
        .map_err(map_tr_err)
}
