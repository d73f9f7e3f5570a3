// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret store trait consumed by the resolution engine.

use async_trait::async_trait;

use crate::error::OprefError;
use crate::reference::Reference;
use crate::types::{ItemDetail, ItemSummary, NewItem, VaultSummary};

/// Access to an external secret store.
///
/// Implementations own authentication and transport. Every method may fail
/// with [`OprefError::Store`]; `resolve_reference` reports lookups that
/// cannot be satisfied as [`OprefError::Resolution`].
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Human-readable backend name, used in logs.
    fn name(&self) -> &str;

    /// Return the raw secret value a reference points at.
    async fn resolve_reference(&self, reference: &Reference) -> Result<String, OprefError>;

    /// List the vaults visible to the store credentials.
    async fn list_vaults(&self) -> Result<Vec<VaultSummary>, OprefError>;

    /// List the items in a vault.
    async fn list_items(&self, vault_id: &str) -> Result<Vec<ItemSummary>, OprefError>;

    /// Fetch an item with all of its fields.
    async fn get_item(&self, vault_id: &str, item_id: &str) -> Result<ItemDetail, OprefError>;

    /// Replace an item, fields included.
    async fn put_item(&self, item: &ItemDetail) -> Result<(), OprefError>;

    /// Create a new item.
    async fn create_item(&self, item: NewItem) -> Result<ItemDetail, OprefError>;
}
