// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tilldesk.toml` > `~/.config/tilldesk/tilldesk.toml`
//! > `/etc/tilldesk/tilldesk.toml` with environment variable overrides via
//! `TILLDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TilldeskConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tilldesk/tilldesk.toml` (system-wide)
/// 3. `~/.config/tilldesk/tilldesk.toml` (user XDG config)
/// 4. `./tilldesk.toml` (local directory)
/// 5. `TILLDESK_*` environment variables
pub fn load_config() -> Result<TilldeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TilldeskConfig::default()))
        .merge(Toml::file("/etc/tilldesk/tilldesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tilldesk/tilldesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tilldesk.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<TilldeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TilldeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TilldeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TilldeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TILLDESK_STORAGE_DATABASE_PATH` must
/// map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("TILLDESK_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped,
        // e.g. TILLDESK_SESSION_COOKIE_NAME -> "session_cookie_name".
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("session_", "session.", 1)
            .replacen("reorder_", "reorder.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
log_level = "debug"

[server]
port = 9000
"#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        // Untouched sections keep their defaults.
        assert_eq!(config.session.cookie_name, "tilldesk_sid");
    }

    #[test]
    fn empty_input_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.reorder.cron, "0 * * * *");
    }
}
