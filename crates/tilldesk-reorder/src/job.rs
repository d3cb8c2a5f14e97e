// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The low-stock scan: alert, order, notify, one row at a time.
//!
//! Rows are processed independently in the order the inventory read model
//! returns them. A row that fails is logged and skipped; the next scheduled
//! run picks it up again unless its alert already landed, in which case the
//! idempotence guard keeps it quiet until someone resolves the alert. The
//! three writes per row are deliberately not one transaction: a crash
//! between alert and order leaves an alert without an order, which the next
//! run tolerates rather than duplicating.

use tilldesk_core::TilldeskError;

use crate::traits::{AlertStore, InventoryReader, NotificationStore, OrderStore};

/// Alert type written by this job.
pub const REORDER_ALERT: &str = "reorder";

/// Outcome of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StockCheckReport {
    /// Low-stock rows the scan saw.
    pub scanned: usize,
    /// Orders successfully created.
    pub orders_created: usize,
    /// Rows skipped because an unresolved reorder alert already existed.
    pub skipped_existing: usize,
    /// Rows dropped by a persistence failure.
    pub failed: usize,
}

impl StockCheckReport {
    /// The one line the cron entry point prints.
    pub fn summary(&self) -> String {
        format!(
            "Automated stock check completed. Created {} new orders.",
            self.orders_created
        )
    }
}

/// Reorder quantity: restock to double the threshold.
///
/// Positive for every row that qualified as low stock, since
/// `quantity < threshold` implies `2*threshold - quantity > threshold`.
pub fn order_quantity(reorder_threshold: i64, quantity: i64) -> i64 {
    2 * reorder_threshold - quantity
}

/// Run one scan over everything currently below its reorder threshold.
///
/// Only the initial inventory query can fail the run as a whole; per-row
/// persistence failures are logged at warn and the scan moves on.
pub async fn run_stock_check(
    inventory: &dyn InventoryReader,
    alerts: &dyn AlertStore,
    orders: &dyn OrderStore,
    notifications: &dyn NotificationStore,
) -> Result<StockCheckReport, TilldeskError> {
    let items = inventory.list_low_stock().await?;
    let mut report = StockCheckReport {
        scanned: items.len(),
        ..StockCheckReport::default()
    };

    for item in &items {
        match alerts.unresolved_exists(item.id, REORDER_ALERT).await {
            Ok(true) => {
                tracing::debug!(inventory_id = item.id, "unresolved alert exists, skipping");
                report.skipped_existing += 1;
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(inventory_id = item.id, error = %e, "alert lookup failed");
                report.failed += 1;
                continue;
            }
        }

        if let Err(e) = alerts.create(item.id, REORDER_ALERT, false).await {
            tracing::warn!(inventory_id = item.id, error = %e, "alert creation failed");
            report.failed += 1;
            continue;
        }

        let quantity = order_quantity(item.reorder_threshold, item.quantity);
        let order_id = match orders
            .create_automated(item.id, item.supplier_id, quantity)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(inventory_id = item.id, error = %e, "order creation failed");
                report.failed += 1;
                continue;
            }
        };

        report.orders_created += 1;
        tracing::info!(
            inventory_id = item.id,
            order_id,
            quantity,
            supplier_id = item.supplier_id,
            "automated order created"
        );

        if let Err(e) = notifications
            .create_order_notification(order_id, item.supplier_id, &item.name, quantity)
            .await
        {
            // The order stands; only the supplier ping was lost.
            tracing::warn!(order_id, error = %e, "order notification failed");
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockAlerts, MockInventory, MockNotifications, MockOrders};
    use tilldesk_core::LowStockItem;

    fn item(id: i64, quantity: i64, threshold: i64) -> LowStockItem {
        LowStockItem {
            id,
            name: format!("item-{id}"),
            quantity,
            reorder_threshold: threshold,
            supplier_id: 100 + id,
        }
    }

    #[test]
    fn quantity_restocks_to_double_threshold() {
        assert_eq!(order_quantity(20, 5), 35);
        assert_eq!(order_quantity(10, 9), 11);
        // Every qualifying row yields more than one threshold's worth.
        assert!(order_quantity(1, 0) > 0);
    }

    #[tokio::test]
    async fn scan_creates_alert_order_and_notification_per_row() {
        let inventory = MockInventory::new(vec![item(1, 5, 20), item(2, 3, 10)]);
        let alerts = MockAlerts::default();
        let orders = MockOrders::default();
        let notifications = MockNotifications::default();

        let report = run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();

        assert_eq!(report.scanned, 2);
        assert_eq!(report.orders_created, 2);
        assert_eq!(report.skipped_existing, 0);
        assert_eq!(report.failed, 0);

        let created_alerts = alerts.created.lock().unwrap();
        assert_eq!(created_alerts.len(), 2);
        assert_eq!(created_alerts[0], (1, REORDER_ALERT.to_string(), false));

        let created_orders = orders.created.lock().unwrap();
        assert_eq!(created_orders[0], (1, 101, 35));
        assert_eq!(created_orders[1], (2, 102, 17));

        let sent = notifications.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, 101);
        assert_eq!(sent[0].2, "item-1");
        assert_eq!(sent[0].3, 35);
    }

    #[tokio::test]
    async fn existing_unresolved_alert_suppresses_the_row() {
        let inventory = MockInventory::new(vec![item(1, 5, 20)]);
        let alerts = MockAlerts::default();
        alerts.preexisting.lock().unwrap().insert(1);
        let orders = MockOrders::default();
        let notifications = MockNotifications::default();

        let report = run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();

        assert_eq!(report.orders_created, 0);
        assert_eq!(report.skipped_existing, 1);
        assert!(alerts.created.lock().unwrap().is_empty());
        assert!(orders.created.lock().unwrap().is_empty());
        assert!(notifications.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_run_is_idempotent() {
        let inventory = MockInventory::new(vec![item(1, 5, 20)]);
        let alerts = MockAlerts::default();
        let orders = MockOrders::default();
        let notifications = MockNotifications::default();

        let first = run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();
        assert_eq!(first.orders_created, 1);

        let second = run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();
        assert_eq!(second.orders_created, 0);
        assert_eq!(second.skipped_existing, 1);
        assert_eq!(orders.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn alert_failure_skips_row_without_blocking_the_rest() {
        let inventory = MockInventory::new(vec![item(1, 5, 20), item(2, 3, 10)]);
        let alerts = MockAlerts::default();
        alerts.fail_create_for.lock().unwrap().insert(1);
        let orders = MockOrders::default();
        let notifications = MockNotifications::default();

        let report = run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.orders_created, 1);
        // No order or notification for the failed row.
        let created_orders = orders.created.lock().unwrap();
        assert_eq!(created_orders.len(), 1);
        assert_eq!(created_orders[0].0, 2);
        assert_eq!(notifications.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn order_failure_leaves_alert_but_no_notification() {
        let inventory = MockInventory::new(vec![item(1, 5, 20)]);
        let alerts = MockAlerts::default();
        let orders = MockOrders::default();
        *orders.fail.lock().unwrap() = true;
        let notifications = MockNotifications::default();

        let report = run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();

        assert_eq!(report.orders_created, 0);
        assert_eq!(report.failed, 1);
        // The alert landed before the order failed; that is the accepted
        // partial-failure state.
        assert_eq!(alerts.created.lock().unwrap().len(), 1);
        assert!(notifications.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn notification_failure_still_counts_the_order() {
        let inventory = MockInventory::new(vec![item(1, 5, 20)]);
        let alerts = MockAlerts::default();
        let orders = MockOrders::default();
        let notifications = MockNotifications::default();
        *notifications.fail.lock().unwrap() = true;

        let report = run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();

        assert_eq!(report.orders_created, 1);
        assert_eq!(report.failed, 0);
    }

    #[tokio::test]
    async fn rows_are_processed_in_reader_order() {
        // Deliberately not id-sorted; the job must keep this order.
        let inventory = MockInventory::new(vec![item(9, 1, 5), item(2, 1, 5), item(5, 1, 5)]);
        let alerts = MockAlerts::default();
        let orders = MockOrders::default();
        let notifications = MockNotifications::default();

        run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();

        let ids: Vec<i64> = orders.created.lock().unwrap().iter().map(|o| o.0).collect();
        assert_eq!(ids, vec![9, 2, 5]);
    }

    #[tokio::test]
    async fn empty_scan_reports_zero() {
        let inventory = MockInventory::new(vec![]);
        let alerts = MockAlerts::default();
        let orders = MockOrders::default();
        let notifications = MockNotifications::default();

        let report = run_stock_check(&inventory, &alerts, &orders, &notifications)
            .await
            .unwrap();

        assert_eq!(report, StockCheckReport::default());
        assert_eq!(
            report.summary(),
            "Automated stock check completed. Created 0 new orders."
        );
    }

    #[tokio::test]
    async fn inventory_failure_aborts_the_run() {
        let inventory = MockInventory::failing();
        let alerts = MockAlerts::default();
        let orders = MockOrders::default();
        let notifications = MockNotifications::default();

        let result = run_stock_check(&inventory, &alerts, &orders, &notifications).await;
        assert!(result.is_err());
    }
}
