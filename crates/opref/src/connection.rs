// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `opref test` and `opref list`.

use opref_core::{ItemSummary, OprefError, SecretStore};
use opref_resolve::find_vault;

use crate::output::ok_mark;

fn item_line(item: &ItemSummary) -> String {
    format!("{} ({})", item.title, item.category)
}

/// List every vault with its items to prove the store is reachable.
pub async fn run_test(store: &dyn SecretStore, use_color: bool) -> Result<String, OprefError> {
    let vaults = store.list_vaults().await?;

    let mut out = format!(
        "{} connection OK: {} vault(s)\n",
        ok_mark(use_color),
        vaults.len()
    );
    for vault in &vaults {
        let items = store.list_items(&vault.id).await?;
        out.push_str(&format!(
            "  - {} ({}): {} item(s)\n",
            vault.title,
            vault.id,
            items.len()
        ));
        for item in &items {
            out.push_str(&format!("      {}\n", item_line(item)));
        }
    }
    Ok(out)
}

/// List the items of one vault.
pub async fn run_list(store: &dyn SecretStore, vault: &str) -> Result<String, OprefError> {
    let vault = find_vault(store, vault).await?;
    let items = store.list_items(&vault.id).await?;
    if items.is_empty() {
        return Ok("No items found.\n".to_string());
    }
    Ok(items
        .iter()
        .map(|i| format!("{}\n", item_line(i)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opref_test_utils::{MemoryStore, StoreOp};

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store.add_item("Agent Secrets", "OpenAI", &[("api key", "sk-1")]);
        store.add_item("Agent Secrets", "Stripe", &[("api key", "sk-2")]);
        store.add_vault("Empty");
        store
    }

    #[tokio::test]
    async fn test_lists_vaults_and_items() {
        let out = run_test(&store(), false).await.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "[OK] connection OK: 2 vault(s)");
        assert!(lines[1].starts_with("  - Agent Secrets ("));
        assert!(lines[1].ends_with("): 2 item(s)"));
        assert_eq!(lines[2], "      OpenAI (API_CREDENTIAL)");
        assert_eq!(lines[3], "      Stripe (API_CREDENTIAL)");
        assert!(lines[4].ends_with("): 0 item(s)"));
    }

    #[tokio::test]
    async fn test_fails_when_store_is_unreachable() {
        let store = store();
        store.fail_on(StoreOp::ListVaults, "connection refused");
        let err = run_test(&store, false).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn list_is_case_insensitive_on_vault() {
        let out = run_list(&store(), "agent secrets").await.unwrap();
        assert_eq!(out, "OpenAI (API_CREDENTIAL)\nStripe (API_CREDENTIAL)\n");
    }

    #[tokio::test]
    async fn list_empty_vault() {
        assert_eq!(run_list(&store(), "Empty").await.unwrap(), "No items found.\n");
    }

    #[tokio::test]
    async fn list_unknown_vault() {
        let err = run_list(&store(), "Nope").await.unwrap_err();
        match err {
            OprefError::VaultNotFound { available, .. } => {
                assert_eq!(available, vec!["Agent Secrets", "Empty"]);
            }
            other => panic!("expected VaultNotFound, got {other:?}"),
        }
    }
}
