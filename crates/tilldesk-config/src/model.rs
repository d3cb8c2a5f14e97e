// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tilldesk inventory platform.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Tilldesk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TilldeskConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Browser session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Automated reorder job settings.
    #[serde(default)]
    pub reorder: ReorderConfig,
}

impl Default for TilldeskConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            session: SessionConfig::default(),
            reorder: ReorderConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8420
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("tilldesk").join("tilldesk.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("tilldesk.db"))
        .to_string_lossy()
        .into_owned()
}

/// Browser session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the browser-session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Seconds of inactivity before a server-side session expires.
    #[serde(default = "default_max_idle_secs")]
    pub max_idle_secs: u64,

    /// Session persistence backend: "sqlite" or "memory".
    #[serde(default = "default_session_backend")]
    pub backend: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_idle_secs: default_max_idle_secs(),
            backend: default_session_backend(),
        }
    }
}

fn default_cookie_name() -> String {
    "tilldesk_sid".to_string()
}

fn default_max_idle_secs() -> u64 {
    86400 // one day, the classic server-side session window
}

fn default_session_backend() -> String {
    "sqlite".to_string()
}

/// Automated reorder job configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReorderConfig {
    /// Run the scheduled stock check inside `tilldesk serve`.
    #[serde(default = "default_reorder_enabled")]
    pub enabled: bool,

    /// Cron expression for the stock check schedule.
    #[serde(default = "default_reorder_cron")]
    pub cron: String,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            enabled: default_reorder_enabled(),
            cron: default_reorder_cron(),
        }
    }
}

fn default_reorder_enabled() -> bool {
    true
}

fn default_reorder_cron() -> String {
    // Hourly, on the hour.
    "0 * * * *".to_string()
}
