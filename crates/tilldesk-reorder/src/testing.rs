// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock collaborators for reorder job tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use tilldesk_core::{LowStockItem, TilldeskError};

use crate::traits::{AlertStore, InventoryReader, NotificationStore, OrderStore};

fn mock_failure(what: &str) -> TilldeskError {
    TilldeskError::Internal(format!("mock {what} failure"))
}

pub struct MockInventory {
    items: Vec<LowStockItem>,
    fail: bool,
}

impl MockInventory {
    pub fn new(items: Vec<LowStockItem>) -> Self {
        Self { items, fail: false }
    }

    pub fn failing() -> Self {
        Self {
            items: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl InventoryReader for MockInventory {
    async fn list_low_stock(&self) -> Result<Vec<LowStockItem>, TilldeskError> {
        if self.fail {
            return Err(mock_failure("inventory"));
        }
        Ok(self.items.clone())
    }
}

#[derive(Default)]
pub struct MockAlerts {
    /// Inventory ids that already carry an unresolved reorder alert.
    pub preexisting: Mutex<HashSet<i64>>,
    /// Alerts created through the trait: (inventory_id, alert_type, resolved).
    pub created: Mutex<Vec<(i64, String, bool)>>,
    /// Inventory ids whose `create` call should fail.
    pub fail_create_for: Mutex<HashSet<i64>>,
}

#[async_trait]
impl AlertStore for MockAlerts {
    async fn unresolved_exists(
        &self,
        inventory_id: i64,
        alert_type: &str,
    ) -> Result<bool, TilldeskError> {
        if self.preexisting.lock().unwrap().contains(&inventory_id) {
            return Ok(true);
        }
        let created = self.created.lock().unwrap();
        Ok(created
            .iter()
            .any(|(id, ty, resolved)| *id == inventory_id && ty == alert_type && !resolved))
    }

    async fn create(
        &self,
        inventory_id: i64,
        alert_type: &str,
        resolved: bool,
    ) -> Result<i64, TilldeskError> {
        if self.fail_create_for.lock().unwrap().contains(&inventory_id) {
            return Err(mock_failure("alert"));
        }
        let mut created = self.created.lock().unwrap();
        created.push((inventory_id, alert_type.to_string(), resolved));
        Ok(created.len() as i64)
    }
}

#[derive(Default)]
pub struct MockOrders {
    /// Orders created through the trait: (inventory_id, supplier_id, quantity).
    pub created: Mutex<Vec<(i64, i64, i64)>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl OrderStore for MockOrders {
    async fn create_automated(
        &self,
        inventory_id: i64,
        supplier_id: i64,
        quantity: i64,
    ) -> Result<i64, TilldeskError> {
        if *self.fail.lock().unwrap() {
            return Err(mock_failure("order"));
        }
        let mut created = self.created.lock().unwrap();
        created.push((inventory_id, supplier_id, quantity));
        Ok(created.len() as i64)
    }
}

#[derive(Default)]
pub struct MockNotifications {
    /// Notifications sent: (order_id, supplier_id, item_name, quantity).
    pub sent: Mutex<Vec<(i64, i64, String, i64)>>,
    pub fail: Mutex<bool>,
}

#[async_trait]
impl NotificationStore for MockNotifications {
    async fn create_order_notification(
        &self,
        order_id: i64,
        supplier_id: i64,
        item_name: &str,
        quantity: i64,
    ) -> Result<i64, TilldeskError> {
        if *self.fail.lock().unwrap() {
            return Err(mock_failure("notification"));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((order_id, supplier_id, item_name.to_string(), quantity));
        Ok(sent.len() as i64)
    }

    async fn unread_count(
        &self,
        _recipient_type: &str,
        recipient_id: i64,
    ) -> Result<i64, TilldeskError> {
        let sent = self.sent.lock().unwrap();
        Ok(sent.iter().filter(|n| n.1 == recipient_id).count() as i64)
    }
}
