// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for storage entities.
//!
//! [`LowStockItem`] is canonical in `tilldesk-core` because it crosses the
//! reorder collaborator trait boundary; it is re-exported here for
//! convenience within the storage crate.

use serde::{Deserialize, Serialize};

pub use tilldesk_core::types::LowStockItem;

/// A portal user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub role: String,
    pub sub_role: Option<String>,
    pub created_at: String,
}

/// One inventory row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub reorder_threshold: i64,
    pub supplier_id: i64,
    pub updated_at: String,
}

/// "Item X needs reordering" marker; at most one unresolved `reorder` alert
/// exists per inventory row at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockAlert {
    pub id: i64,
    pub inventory_id: i64,
    pub alert_type: String,
    pub is_resolved: bool,
    pub created_at: String,
}

/// A purchase order generated without human initiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatedOrder {
    pub id: i64,
    pub inventory_id: i64,
    pub supplier_id: i64,
    pub quantity: i64,
    pub status: String,
    pub created_at: String,
}

/// A message targeted at one recipient (role + id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub order_id: Option<i64>,
    pub recipient_type: String,
    pub recipient_id: i64,
    pub message: String,
    pub is_read: bool,
    pub status: String,
    pub created_at: String,
}
