// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query operations over the Tilldesk database.

pub mod alerts;
pub mod inventory;
pub mod notifications;
pub mod orders;
pub mod sessions;
pub mod users;
