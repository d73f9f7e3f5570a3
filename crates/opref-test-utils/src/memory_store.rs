// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory secret store for deterministic testing.
//!
//! `MemoryStore` implements `SecretStore` over a list of vaults held in
//! memory. Ids are assigned from a counter (`vault-1`, `item-2`, `field-3`)
//! so tests can assert on them. Every trait call is recorded, failures can be
//! injected per operation, and reference resolution can be slowed down to
//! observe how many lookups run at once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use opref_core::{
    Field, FieldType, ItemCategory, ItemDetail, ItemSummary, NewItem, OprefError, Reference,
    SecretStore, VaultSummary,
};
use serde_json::Map;

/// A store operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Resolve,
    ListVaults,
    ListItems,
    GetItem,
    PutItem,
    CreateItem,
}

/// A recorded call against the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Resolve(String),
    ListVaults,
    ListItems(String),
    GetItem { vault_id: String, item_id: String },
    PutItem { vault_id: String, item_id: String },
    CreateItem { vault_id: String, title: String },
}

struct Vault {
    summary: VaultSummary,
    items: Vec<ItemDetail>,
}

#[derive(Default)]
struct State {
    vaults: Vec<Vault>,
    calls: Vec<StoreCall>,
    failures: HashMap<StoreOp, String>,
    next_id: u64,
    resolve_delay: Option<Duration>,
}

impl State {
    fn next_id(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{kind}-{}", self.next_id)
    }

    fn vault_by_title(&self, title: &str) -> Option<&Vault> {
        self.vaults.iter().find(|v| same_title(&v.summary.title, title))
    }

    fn vault_by_id_mut(&mut self, id: &str) -> Option<&mut Vault> {
        self.vaults.iter_mut().find(|v| v.summary.id == id)
    }

    fn assign_field_ids(&mut self, fields: &mut [Field]) {
        for field in fields.iter_mut().filter(|f| f.id.is_empty()) {
            field.id = self.next_id("field");
        }
    }

    /// Record the call and return the injected failure for `op`, if any.
    fn enter(&mut self, op: StoreOp, call: StoreCall) -> Result<(), OprefError> {
        self.calls.push(call);
        match self.failures.get(&op) {
            Some(message) => Err(OprefError::store(message.clone())),
            None => Ok(()),
        }
    }
}

fn same_title(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// An in-memory secret store.
pub struct MemoryStore {
    state: Mutex<State>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a vault (or return the id of an existing one with the same title).
    pub fn add_vault(&self, title: &str) -> String {
        let mut state = self.state();
        if let Some(vault) = state.vault_by_title(title) {
            return vault.summary.id.clone();
        }
        let id = state.next_id("vault");
        state.vaults.push(Vault {
            summary: VaultSummary {
                id: id.clone(),
                title: title.to_string(),
            },
            items: Vec::new(),
        });
        id
    }

    /// Add an API credential item with concealed fields, creating the vault
    /// if needed. Returns the item id.
    pub fn add_item(&self, vault: &str, title: &str, fields: &[(&str, &str)]) -> String {
        let vault_id = self.add_vault(vault);
        let mut state = self.state();
        let id = state.next_id("item");
        let mut fields: Vec<Field> = fields
            .iter()
            .map(|(name, value)| Field::concealed(*name, *value))
            .collect();
        state.assign_field_ids(&mut fields);
        let item = ItemDetail {
            id: id.clone(),
            vault_id: vault_id.clone(),
            title: title.to_string(),
            category: ItemCategory::ApiCredential,
            fields,
            extra: Map::new(),
        };
        if let Some(v) = state.vault_by_id_mut(&vault_id) {
            v.items.push(item);
        }
        id
    }

    /// Snapshot of the item titled `title` in vault `vault`.
    pub fn item(&self, vault: &str, title: &str) -> Option<ItemDetail> {
        let state = self.state();
        state
            .vault_by_title(vault)?
            .items
            .iter()
            .find(|i| same_title(&i.title, title))
            .cloned()
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.state().calls.clone()
    }

    /// Make every call of `op` fail with a store error carrying `message`.
    pub fn fail_on(&self, op: StoreOp, message: &str) {
        self.state().failures.insert(op, message.to_string());
    }

    /// Make reference resolution fail with a store error carrying `message`.
    pub fn fail_resolution(&self, message: &str) {
        self.fail_on(StoreOp::Resolve, message);
    }

    /// Delay every reference resolution by `delay`.
    pub fn set_resolve_delay(&self, delay: Duration) {
        self.state().resolve_delay = Some(delay);
    }

    /// Highest number of reference resolutions observed in flight at once.
    pub fn max_concurrent_resolves(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lookup(&self, reference: &Reference) -> Result<String, OprefError> {
        let not_found = |message: &str| OprefError::Resolution {
            reference: reference.to_string(),
            message: message.to_string(),
        };
        let state = self.state();
        let vault = state
            .vault_by_title(reference.vault())
            .ok_or_else(|| not_found("vault not found"))?;
        let item = vault
            .items
            .iter()
            .find(|i| same_title(&i.title, reference.item()))
            .ok_or_else(|| not_found("item not found"))?;
        let field = item
            .fields
            .iter()
            .find(|f| same_title(&f.title, reference.field()) || f.id == reference.field())
            .ok_or_else(|| not_found("field not found"))?;
        if field.value.is_empty() {
            return Err(not_found("field has no value"));
        }
        Ok(field.value.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SecretStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn resolve_reference(&self, reference: &Reference) -> Result<String, OprefError> {
        let delay = {
            let mut state = self.state();
            state.enter(StoreOp::Resolve, StoreCall::Resolve(reference.to_string()))?;
            state.resolve_delay
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.lookup(reference)
    }

    async fn list_vaults(&self) -> Result<Vec<VaultSummary>, OprefError> {
        let mut state = self.state();
        state.enter(StoreOp::ListVaults, StoreCall::ListVaults)?;
        Ok(state.vaults.iter().map(|v| v.summary.clone()).collect())
    }

    async fn list_items(&self, vault_id: &str) -> Result<Vec<ItemSummary>, OprefError> {
        let mut state = self.state();
        state.enter(StoreOp::ListItems, StoreCall::ListItems(vault_id.to_string()))?;
        let vault = state
            .vault_by_id_mut(vault_id)
            .ok_or_else(|| OprefError::store(format!("vault {vault_id} not found")))?;
        Ok(vault
            .items
            .iter()
            .map(|i| ItemSummary {
                id: i.id.clone(),
                title: i.title.clone(),
                category: i.category.clone(),
            })
            .collect())
    }

    async fn get_item(&self, vault_id: &str, item_id: &str) -> Result<ItemDetail, OprefError> {
        let mut state = self.state();
        state.enter(
            StoreOp::GetItem,
            StoreCall::GetItem {
                vault_id: vault_id.to_string(),
                item_id: item_id.to_string(),
            },
        )?;
        state
            .vault_by_id_mut(vault_id)
            .and_then(|v| v.items.iter().find(|i| i.id == item_id))
            .cloned()
            .ok_or_else(|| OprefError::store(format!("item {item_id} not found")))
    }

    async fn put_item(&self, item: &ItemDetail) -> Result<(), OprefError> {
        let mut state = self.state();
        state.enter(
            StoreOp::PutItem,
            StoreCall::PutItem {
                vault_id: item.vault_id.clone(),
                item_id: item.id.clone(),
            },
        )?;
        let mut updated = item.clone();
        state.assign_field_ids(&mut updated.fields);
        let slot = state
            .vault_by_id_mut(&item.vault_id)
            .and_then(|v| v.items.iter_mut().find(|i| i.id == item.id))
            .ok_or_else(|| OprefError::store(format!("item {} not found", item.id)))?;
        *slot = updated;
        Ok(())
    }

    async fn create_item(&self, item: NewItem) -> Result<ItemDetail, OprefError> {
        let mut state = self.state();
        state.enter(
            StoreOp::CreateItem,
            StoreCall::CreateItem {
                vault_id: item.vault_id.clone(),
                title: item.title.clone(),
            },
        )?;
        if state.vault_by_id_mut(&item.vault_id).is_none() {
            return Err(OprefError::store(format!("vault {} not found", item.vault_id)));
        }
        let id = state.next_id("item");
        let mut fields = item.fields;
        state.assign_field_ids(&mut fields);
        let created = ItemDetail {
            id,
            vault_id: item.vault_id.clone(),
            title: item.title,
            category: item.category,
            fields,
            extra: Map::new(),
        };
        if let Some(vault) = state.vault_by_id_mut(&item.vault_id) {
            vault.items.push(created.clone());
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(s: &str) -> Reference {
        Reference::parse(s).unwrap()
    }

    #[tokio::test]
    async fn resolves_case_insensitively() {
        let store = MemoryStore::new();
        store.add_item("Agent Secrets", "OpenAI", &[("API Key", "sk-1")]);
        let value = store
            .resolve_reference(&reference("op://agent secrets/openai/api key"))
            .await
            .unwrap();
        assert_eq!(value, "sk-1");
    }

    #[tokio::test]
    async fn missing_item_is_resolution_error() {
        let store = MemoryStore::new();
        store.add_vault("Vault");
        let err = store
            .resolve_reference(&reference("op://Vault/Nope/f"))
            .await
            .unwrap_err();
        assert!(matches!(err, OprefError::Resolution { ref message, .. } if message == "item not found"));
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let store = MemoryStore::new();
        let vault_id = store.add_vault("V");
        store.list_vaults().await.unwrap();
        store.list_items(&vault_id).await.unwrap();
        assert_eq!(
            store.calls(),
            vec![StoreCall::ListVaults, StoreCall::ListItems(vault_id)]
        );
    }

    #[tokio::test]
    async fn injected_failure_is_store_error() {
        let store = MemoryStore::new();
        store.fail_on(StoreOp::ListVaults, "boom");
        let err = store.list_vaults().await.unwrap_err();
        assert_eq!(err.to_string(), "secret store error: boom");
    }

    #[tokio::test]
    async fn created_items_get_ids() {
        let store = MemoryStore::new();
        let vault_id = store.add_vault("V");
        let item = store
            .create_item(NewItem {
                vault_id,
                title: "New".into(),
                category: ItemCategory::Login,
                fields: vec![Field::concealed("password", "pw")],
            })
            .await
            .unwrap();
        assert!(item.id.starts_with("item-"));
        assert!(item.fields[0].id.starts_with("field-"));
        assert_eq!(item.fields[0].field_type, FieldType::Concealed);
    }

    #[test]
    fn add_vault_is_idempotent() {
        let store = MemoryStore::new();
        let a = store.add_vault("Shared");
        let b = store.add_vault("shared");
        assert_eq!(a, b);
    }
}
