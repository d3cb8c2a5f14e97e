// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP portal surface for the Tilldesk inventory platform.
//!
//! Serves the admin, staff, and supplier portals over one axum router:
//! session-cookie plumbing, login/logout, guarded page and API routes, and
//! the notification badge counter. Guard verdicts come from
//! `tilldesk-gate`; this crate owns their HTTP shape.

pub mod auth;
pub mod cookies;
pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, HealthState, ServerConfig};
