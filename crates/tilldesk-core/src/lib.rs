// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tilldesk inventory platform.
//!
//! Provides the error taxonomy, domain types, and the session persistence
//! trait shared across the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TilldeskError;
pub use traits::SessionBackend;
pub use types::{LoginData, LowStockItem, Role, SessionId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilldesk_error_has_all_variants() {
        let _config = TilldeskError::Config("test".into());
        let _storage = TilldeskError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _session = TilldeskError::Session {
            message: "test".into(),
            source: None,
        };
        let _http = TilldeskError::Http {
            message: "test".into(),
            source: None,
        };
        let _internal = TilldeskError::Internal("test".into());
    }

    #[test]
    fn error_messages_carry_context() {
        let err = TilldeskError::Config("missing database path".into());
        assert!(err.to_string().contains("missing database path"));

        let err = TilldeskError::Session {
            message: "corrupt state".into(),
            source: None,
        };
        assert!(err.to_string().contains("corrupt state"));
    }
}
