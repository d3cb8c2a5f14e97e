// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the reorder job runs against.
//!
//! The job only ever sees these four seams, so tests can drive it with mock
//! implementations and production wires in the SQLite-backed ones.

use async_trait::async_trait;

use tilldesk_core::{LowStockItem, TilldeskError};

/// Read model over inventory.
#[async_trait]
pub trait InventoryReader: Send + Sync {
    /// Rows below their reorder threshold, in a stable order the job
    /// processes as-is (no re-sorting).
    async fn list_low_stock(&self) -> Result<Vec<LowStockItem>, TilldeskError>;
}

/// Low-stock alert persistence.
#[async_trait]
pub trait AlertStore: Send + Sync {
    async fn unresolved_exists(
        &self,
        inventory_id: i64,
        alert_type: &str,
    ) -> Result<bool, TilldeskError>;

    async fn create(
        &self,
        inventory_id: i64,
        alert_type: &str,
        resolved: bool,
    ) -> Result<i64, TilldeskError>;
}

/// Automated order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_automated(
        &self,
        inventory_id: i64,
        supplier_id: i64,
        quantity: i64,
    ) -> Result<i64, TilldeskError>;
}

/// Notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_order_notification(
        &self,
        order_id: i64,
        supplier_id: i64,
        item_name: &str,
        quantity: i64,
    ) -> Result<i64, TilldeskError>;

    async fn unread_count(
        &self,
        recipient_type: &str,
        recipient_id: i64,
    ) -> Result<i64, TilldeskError>;
}
