// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde cannot express: URL schemes, non-empty
//! defaults, a positive timeout, and a known log level.

use crate::diagnostic::ConfigError;
use crate::model::OprefConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &OprefConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let url = config.store.connect_url.trim();
    if url.is_empty() {
        errors.push(ConfigError::validation("store.connect_url must not be empty"));
    } else if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(ConfigError::validation(format!(
            "store.connect_url `{url}` must start with http:// or https://"
        )));
    }

    if config.store.token_path.trim().is_empty() {
        errors.push(ConfigError::validation("store.token_path must not be empty"));
    }

    if config
        .store
        .token_prefix
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        errors.push(ConfigError::validation(
            "store.token_prefix must not be empty when set",
        ));
    }

    if config.store.timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "store.timeout_secs must be greater than 0",
        ));
    }

    for (key, value) in [
        ("defaults.vault", &config.defaults.vault),
        ("defaults.field", &config.defaults.field),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::validation(format!("{key} must not be empty")));
        }
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
