// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! opref - resolve `op://` secret references in JSON configuration.
//!
//! This is the binary entry point.

mod connection;
mod dry_run;
mod output;
mod secrets;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use opref_config::OprefConfig;
use opref_connect::shared_store;
use opref_core::{ItemCategory, OprefError};
use opref_resolve::{TreeResolver, UpsertRequest};

/// opref - resolve op:// secret references from a 1Password Connect server.
#[derive(Parser, Debug)]
#[command(name = "opref", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check connectivity and list every vault with its items.
    Test,
    /// Read a secret and print a redacted preview.
    Read {
        /// Item title.
        item: String,
        /// Vault title (defaults to `defaults.vault`).
        #[arg(short, long)]
        vault: Option<String>,
        /// Field label (defaults to `defaults.field`).
        #[arg(short, long)]
        field: Option<String>,
    },
    /// List the items of a vault.
    List {
        /// Vault title (defaults to `defaults.vault`).
        #[arg(short, long)]
        vault: Option<String>,
    },
    /// Resolve op:// references in a JSON file (dry run).
    Resolve {
        /// Path to the JSON file.
        file: PathBuf,
    },
    /// Create or update a secret.
    Write {
        /// Item title.
        item: String,
        /// Secret value to store.
        #[arg(long)]
        value: String,
        /// Vault title (defaults to `defaults.vault`).
        #[arg(short, long)]
        vault: Option<String>,
        /// Field label (defaults to `defaults.field`).
        #[arg(short, long)]
        field: Option<String>,
        /// Category for a newly created item, e.g. API_CREDENTIAL or LOGIN.
        #[arg(short, long)]
        category: Option<String>,
    },
}

impl Commands {
    fn label(&self) -> &'static str {
        match self {
            Commands::Test => "connection",
            Commands::Read { .. } => "read",
            Commands::List { .. } => "list",
            Commands::Resolve { .. } => "resolve",
            Commands::Write { .. } => "write",
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => opref_config::load_and_validate_path(path),
        None => opref_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            opref_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging.level);

    let use_color = !cli.plain && std::io::stdout().is_terminal();
    let label = cli.command.label();
    match run(cli.command, &config, use_color).await {
        Ok(out) => print!("{out}"),
        Err(e) => {
            let err_color = !cli.plain && std::io::stderr().is_terminal();
            eprintln!(
                "{} {label} failed: {}",
                output::fail_mark(err_color),
                output::describe_error(&e)
            );
            std::process::exit(1);
        }
    }
}

async fn run(command: Commands, config: &OprefConfig, use_color: bool) -> Result<String, OprefError> {
    let store = shared_store(&config.store).await?;
    let defaults = &config.defaults;

    match command {
        Commands::Test => connection::run_test(store.as_ref(), use_color).await,
        Commands::Read { item, vault, field } => {
            let vault = or_default(vault, &defaults.vault);
            let field = or_default(field, &defaults.field);
            secrets::run_read(store.as_ref(), &vault, &item, &field).await
        }
        Commands::List { vault } => {
            connection::run_list(store.as_ref(), &or_default(vault, &defaults.vault)).await
        }
        Commands::Resolve { file } => {
            let resolver = TreeResolver::new(store);
            dry_run::run_resolve(&resolver, &file).await
        }
        Commands::Write {
            item,
            value,
            vault,
            field,
            category,
        } => {
            let request = UpsertRequest {
                vault: or_default(vault, &defaults.vault),
                item,
                field: or_default(field, &defaults.field),
                value,
                category: category
                    .map(|c| ItemCategory::from(c.to_uppercase().as_str()))
                    .unwrap_or_else(|| defaults.category.clone()),
            };
            secrets::run_write(store.as_ref(), &request).await
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

/// Log to stderr so command output on stdout stays clean.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("opref={},warn", log_level.to_ascii_lowercase())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_write_with_short_flags() {
        let cli = Cli::try_parse_from([
            "opref", "write", "Stripe", "--value", "sk_1", "-v", "Infra", "-f", "token", "-c", "login",
        ])
        .unwrap();
        match cli.command {
            Commands::Write {
                item,
                value,
                vault,
                field,
                category,
            } => {
                assert_eq!(item, "Stripe");
                assert_eq!(value, "sk_1");
                assert_eq!(vault.as_deref(), Some("Infra"));
                assert_eq!(field.as_deref(), Some("token"));
                assert_eq!(category.as_deref(), Some("login"));
            }
            other => panic!("expected Write, got {other:?}"),
        }
    }

    #[test]
    fn write_requires_value() {
        assert!(Cli::try_parse_from(["opref", "write", "Stripe"]).is_err());
    }

    #[test]
    fn global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["opref", "list", "--config", "/tmp/o.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/o.toml")));
        assert_eq!(cli.command.label(), "list");
    }

    #[test]
    fn default_config_is_valid() {
        let config = opref_config::load_and_validate_str("").expect("defaults should validate");
        assert_eq!(config.defaults.vault, "Agent Secrets");
    }
}
