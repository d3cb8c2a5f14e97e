// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification operations, including the unread counter polled by the UI.

use rusqlite::params;
use tilldesk_core::TilldeskError;

use crate::database::{map_tr_err, Database};
use crate::models::Notification;

/// Create the notification dispatched alongside an automated order.
pub async fn create_order_notification(
    db: &Database,
    order_id: i64,
    supplier_id: i64,
    item_name: &str,
    quantity: i64,
) -> Result<i64, TilldeskError> {
    let message = format!(
        "New automated order: {quantity} x {item_name} (order #{order_id})"
    );
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO notifications (order_id, recipient_type, recipient_id, message)
                 VALUES (?1, 'supplier', ?2, ?3)",
                params![order_id, supplier_id, message],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Unread notifications for a recipient.
///
/// The `is_read` flag and the `status` column may drift apart (older writers
/// only touched one of them), so a notification counts as unread only when
/// `is_read` is unset AND `status` is not "read".
pub async fn unread_count(
    db: &Database,
    recipient_type: &str,
    recipient_id: i64,
) -> Result<i64, TilldeskError> {
    let recipient_type = recipient_type.to_string();
    db.connection()
        .call(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT count(*) FROM notifications
                 WHERE recipient_type = ?1 AND recipient_id = ?2
                   AND is_read = 0 AND status <> 'read'",
                params![recipient_type, recipient_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}

/// Mark one notification read (sets both flags).
pub async fn mark_read(db: &Database, id: i64) -> Result<(), TilldeskError> {
    db.connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE notifications SET is_read = 1, status = 'read' WHERE id = ?1",
                params![id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// List notifications for a recipient, newest first.
pub async fn list_for_recipient(
    db: &Database,
    recipient_type: &str,
    recipient_id: i64,
) -> Result<Vec<Notification>, TilldeskError> {
    let recipient_type = recipient_type.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, order_id, recipient_type, recipient_id, message, is_read, status, created_at
                 FROM notifications
                 WHERE recipient_type = ?1 AND recipient_id = ?2
                 ORDER BY id DESC",
            )?;
            let rows = stmt.query_map(params![recipient_type, recipient_id], |row| {
                Ok(Notification {
                    id: row.get(0)?,
                    order_id: row.get(1)?,
                    recipient_type: row.get(2)?,
                    recipient_id: row.get(3)?,
                    message: row.get(4)?,
                    is_read: row.get(5)?,
                    status: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?;
            let mut notifications = Vec::new();
            for row in rows {
                notifications.push(row?);
            }
            Ok(notifications)
        })
        .await
        .map_err(map_tr_err)
}
