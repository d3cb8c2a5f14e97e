// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Tilldesk inventory platform.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed query
//! operations for users, inventory, low-stock alerts, automated orders,
//! notifications, and serialized browser sessions.

pub mod backend;
pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use backend::SqliteSessionBackend;
pub use database::Database;
pub use models::*;
