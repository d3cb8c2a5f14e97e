// SPDX-FileCopyrightText: 2026 Tilldesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses and known backend names.

use crate::diagnostic::ConfigError;
use crate::model::TilldeskConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const SESSION_BACKENDS: [&str; 2] = ["sqlite", "memory"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &TilldeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.log_level
            ),
        });
    }

    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.session.cookie_name.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "session.cookie_name must not be empty".to_string(),
        });
    } else if !config
        .session
        .cookie_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.cookie_name `{}` must contain only alphanumerics, `_`, or `-`",
                config.session.cookie_name
            ),
        });
    }

    if config.session.max_idle_secs < 60 {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.max_idle_secs must be at least 60, got {}",
                config.session.max_idle_secs
            ),
        });
    }

    if !SESSION_BACKENDS.contains(&config.session.backend.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.backend must be one of {}, got `{}`",
                SESSION_BACKENDS.join(", "),
                config.session.backend
            ),
        });
    }

    if config.reorder.cron.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "reorder.cron must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
