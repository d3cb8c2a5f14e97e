// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Automated order operations.

use rusqlite::params;
use tilldesk_core::TilldeskError;

use crate::database::{map_tr_err, Database};
use crate::models::AutomatedOrder;

/// Create a pending automated order and return its id.
pub async fn create_automated(
    db: &Database,
    inventory_id: i64,
    supplier_id: i64,
    quantity: i64,
) -> Result<i64, TilldeskError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO automated_orders (inventory_id, supplier_id, quantity, status)
                 VALUES (?1, ?2, ?3, 'pending')",
                params![inventory_id, supplier_id, quantity],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Get an order by id.
pub async fn get_order(db: &Database, id: i64) -> Result<Option<AutomatedOrder>, TilldeskError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, inventory_id, supplier_id, quantity, status, created_at
                 FROM automated_orders WHERE id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                Ok(AutomatedOrder {
                    id: row.get(0)?,
                    inventory_id: row.get(1)?,
                    supplier_id: row.get(2)?,
                    quantity: row.get(3)?,
                    status: row.get(4)?,
                    created_at: row.get(5)?,
                })
            });
            match result {
                Ok(order) => Ok(Some(order)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Move an order to a new status (confirmed, cancelled, completed).
pub async fn set_status(db: &Database, id: i64, status: &str) -> Result<(), TilldeskError> {
    let status = status.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE automated_orders SET status = ?1 WHERE id = ?2",
                params![status, id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Count of orders still pending.
pub async fn pending_count(db: &Database) -> Result<i64, TilldeskError> {
    db.connection()
        .call(|conn| {
            let count: i64 = conn.query_row(
                "SELECT count(*) FROM automated_orders WHERE status = 'pending'",
                [],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::inventory;
    use tempfile::tempdir;

    #[tokio::test]
    async fn automated_order_starts_pending() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        let item_id = inventory::create_item(&db, "item", 5, 20, 3).await.unwrap();

        let order_id = create_automated(&db, item_id, 3, 35).await.unwrap();
        let order = get_order(&db, order_id).await.unwrap().unwrap();
        assert_eq!(order.status, "pending");
        assert_eq!(order.quantity, 35);
        assert_eq!(order.supplier_id, 3);
        assert_eq!(pending_count(&db).await.unwrap(), 1);

        set_status(&db, order_id, "confirmed").await.unwrap();
        let order = get_order(&db, order_id).await.unwrap().unwrap();
        assert_eq!(order.status, "confirmed");
        assert_eq!(pending_count(&db).await.unwrap(), 0);

        db.close().await.unwrap();
    }
}
