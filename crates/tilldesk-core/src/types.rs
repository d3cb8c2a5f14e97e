// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Tilldesk workspace.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier for one browser's server-side session (cookie value).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Portal role. Closed set: every login instance belongs to exactly one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Supplier,
}

/// User attributes attached to a login instance.
///
/// Opaque to the session store except for the `user_id` and `role` fields,
/// which the store and the access gate inspect by key. Everything else is
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginData(pub serde_json::Map<String, serde_json::Value>);

impl LoginData {
    pub fn new() -> Self {
        Self(serde_json::Map::new())
    }

    /// Builder-style insert for string attributes.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.0
            .insert(key.to_string(), serde_json::Value::String(value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// The `user_id` attribute, when present as a string.
    pub fn user_id(&self) -> Option<&str> {
        self.0.get("user_id").and_then(|v| v.as_str())
    }

    /// The `role` attribute (sub-role within a portal, e.g. "management").
    pub fn role(&self) -> Option<&str> {
        self.0.get("role").and_then(|v| v.as_str())
    }
}

/// One inventory row currently below its reorder threshold.
///
/// Produced by the inventory read model in a stable, implementation-defined
/// order; the reorder job processes rows exactly in that order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub reorder_threshold: i64,
    pub supplier_id: i64,
}
