// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Role session store for the Tilldesk inventory platform.
//!
//! One [`SessionState`] per browser session holds any number of
//! token-addressed login instances (one per tab) across the admin, staff,
//! and supplier portals, alongside the single-slot legacy mirror older
//! call sites still read. State is persisted through a pluggable
//! [`tilldesk_core::SessionBackend`]; [`MemorySessionBackend`] is the
//! in-process implementation.

pub mod memory;
pub mod store;

pub use memory::MemorySessionBackend;
pub use store::{LoginInstance, SessionState};
