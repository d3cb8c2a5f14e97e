// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed collaborator implementations.
//!
//! The traits are implemented directly on [`Database`], delegating to the
//! typed query modules, so production wiring is just handing the job four
//! clones of the same handle.

use async_trait::async_trait;

use tilldesk_core::{LowStockItem, TilldeskError};
use tilldesk_storage::queries::{alerts, inventory, notifications, orders};
use tilldesk_storage::Database;

use crate::traits::{AlertStore, InventoryReader, NotificationStore, OrderStore};

#[async_trait]
impl InventoryReader for Database {
    async fn list_low_stock(&self) -> Result<Vec<LowStockItem>, TilldeskError> {
        inventory::list_low_stock(self).await
    }
}

#[async_trait]
impl AlertStore for Database {
    async fn unresolved_exists(
        &self,
        inventory_id: i64,
        alert_type: &str,
    ) -> Result<bool, TilldeskError> {
        alerts::unresolved_exists(self, inventory_id, alert_type).await
    }

    async fn create(
        &self,
        inventory_id: i64,
        alert_type: &str,
        resolved: bool,
    ) -> Result<i64, TilldeskError> {
        alerts::create_alert(self, inventory_id, alert_type, resolved).await
    }
}

#[async_trait]
impl OrderStore for Database {
    async fn create_automated(
        &self,
        inventory_id: i64,
        supplier_id: i64,
        quantity: i64,
    ) -> Result<i64, TilldeskError> {
        orders::create_automated(self, inventory_id, supplier_id, quantity).await
    }
}

#[async_trait]
impl NotificationStore for Database {
    async fn create_order_notification(
        &self,
        order_id: i64,
        supplier_id: i64,
        item_name: &str,
        quantity: i64,
    ) -> Result<i64, TilldeskError> {
        notifications::create_order_notification(self, order_id, supplier_id, item_name, quantity)
            .await
    }

    async fn unread_count(
        &self,
        recipient_type: &str,
        recipient_id: i64,
    ) -> Result<i64, TilldeskError> {
        notifications::unread_count(self, recipient_type, recipient_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::run_stock_check;
    use tempfile::tempdir;
    use tilldesk_storage::queries::{alerts as alert_queries, inventory as inventory_queries};

    #[tokio::test]
    async fn end_to_end_scan_against_sqlite() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();

        let low = inventory_queries::create_item(&db, "Beans", 5, 20, 3)
            .await
            .unwrap();
        inventory_queries::create_item(&db, "Cups", 50, 10, 3)
            .await
            .unwrap();

        let report = run_stock_check(&db, &db, &db, &db).await.unwrap();
        assert_eq!(report.scanned, 1);
        assert_eq!(report.orders_created, 1);

        // Alert landed unresolved; quantity follows the restock law.
        let item_alerts = alert_queries::list_for_item(&db, low).await.unwrap();
        assert_eq!(item_alerts.len(), 1);
        assert!(!item_alerts[0].is_resolved);

        assert_eq!(db.unread_count("supplier", 3).await.unwrap(), 1);

        // Second run: the unresolved alert suppresses everything.
        let report = run_stock_check(&db, &db, &db, &db).await.unwrap();
        assert_eq!(report.orders_created, 0);
        assert_eq!(report.skipped_existing, 1);
        assert_eq!(db.unread_count("supplier", 3).await.unwrap(), 1);

        db.close().await.unwrap();
    }
}
