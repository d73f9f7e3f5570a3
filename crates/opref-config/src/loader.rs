// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./opref.toml` > `~/.config/opref/opref.toml` > `/etc/opref/opref.toml`
//! with environment variable overrides via `OPREF_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::OprefConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/opref/opref.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "opref.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/opref/opref.toml` (system-wide)
/// 3. `~/.config/opref/opref.toml` (user XDG config)
/// 4. `./opref.toml` (local directory)
/// 5. `OPREF_*` environment variables
pub fn load_config() -> Result<OprefConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<OprefConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OprefConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
///
/// The path is not searched for in parent directories and a missing file
/// is an error rather than an empty layer.
pub fn load_config_from_path(path: &Path) -> Result<OprefConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(OprefConfig::default()))
        .merge(Toml::file_exact(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(OprefConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/opref/opref.toml`, if a config directory exists on this platform.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("opref/opref.toml"))
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `OPREF_STORE_TOKEN_PATH` must map to `store.token_path`,
/// not `store.token.path`.
fn env_provider() -> Env {
    Env::prefixed("OPREF_").map(|key| {
        // Keys reach `map` with their original casing.
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("store_", "store.", 1)
            .replacen("defaults_", "defaults.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}
