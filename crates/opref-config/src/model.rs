// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for opref.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use opref_core::ItemCategory;
use serde::{Deserialize, Serialize};

/// Top-level opref configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OprefConfig {
    /// Secret store connection settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Defaults applied when a command omits vault, field, or category.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Secret store connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Base URL of the Connect server.
    #[serde(default = "default_connect_url")]
    pub connect_url: String,

    /// File holding the service token. `~` expands to the home directory.
    #[serde(default = "default_token_path")]
    pub token_path: String,

    /// Required token prefix, if any. Tokens not starting with it are rejected.
    #[serde(default)]
    pub token_prefix: Option<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            connect_url: default_connect_url(),
            token_path: default_token_path(),
            token_prefix: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// The token path with a leading `~/` expanded to the home directory.
    pub fn expanded_token_path(&self) -> std::path::PathBuf {
        match (self.token_path.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => std::path::PathBuf::from(&self.token_path),
        }
    }
}

fn default_connect_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_token_path() -> String {
    "~/.opref/secrets/connect-token".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Defaults for vault, field, and item category.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Vault used when none is given.
    #[serde(default = "default_vault")]
    pub vault: String,

    /// Field used when none is given.
    #[serde(default = "default_field")]
    pub field: String,

    /// Category for items created by `write`.
    #[serde(default)]
    pub category: ItemCategory,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            vault: default_vault(),
            field: default_field(),
            category: ItemCategory::default(),
        }
    }
}

fn default_vault() -> String {
    "Agent Secrets".to_string()
}

fn default_field() -> String {
    "api key".to_string()
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_path_expands_home() {
        let config = StoreConfig::default();
        let path = config.expanded_token_path();
        if let Some(home) = dirs::home_dir() {
            assert!(path.starts_with(home));
        }
        assert!(path.ends_with(".opref/secrets/connect-token"));
    }

    #[test]
    fn absolute_token_path_is_untouched() {
        let config = StoreConfig {
            token_path: "/run/secrets/token".into(),
            ..StoreConfig::default()
        };
        assert_eq!(
            config.expanded_token_path(),
            std::path::PathBuf::from("/run/secrets/token")
        );
    }

    #[test]
    fn category_deserializes_from_store_spelling() {
        let config: OprefConfig = toml::from_str(
            r#"
[defaults]
category = "LOGIN"
"#,
        )
        .unwrap();
        assert_eq!(config.defaults.category, ItemCategory::Login);
    }
}
