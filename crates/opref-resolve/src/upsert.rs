// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Find-or-create writes of a secret into a vault item field.
//!
//! Vault, item, and field titles are matched case-insensitively. Writing the
//! same (vault, item, field) twice creates the item once and updates the
//! existing field afterwards, so repeated writes never duplicate fields.
//!
//! The update path is a plain read-modify-write of the whole item. A change
//! made to the same item by someone else between the read and the write is
//! lost.

use std::fmt;

use opref_core::{
    Field, ItemCategory, ItemSummary, NewItem, OprefError, Result, SecretStore, UpsertStep,
    VaultSummary,
};
use strum::Display;
use tracing::{debug, info};

/// A request to store `value` in `vault`/`item`/`field`.
#[derive(Clone)]
pub struct UpsertRequest {
    pub vault: String,
    pub item: String,
    pub field: String,
    pub value: String,
    /// Category used only when the item has to be created.
    pub category: ItemCategory,
}

impl fmt::Debug for UpsertRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpsertRequest")
            .field("vault", &self.vault)
            .field("item", &self.item)
            .field("field", &self.field)
            .field("value", &"[REDACTED]")
            .field("category", &self.category)
            .finish()
    }
}

/// Whether the upsert created a new item or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UpsertKind {
    Created,
    Updated,
}

/// Result of a successful upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    pub kind: UpsertKind,
    pub vault: String,
    pub item: String,
    pub field: String,
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\" in {} (field: {})",
            self.kind, self.item, self.vault, self.field
        )
    }
}

pub(crate) fn titles_match(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Pick the vault titled `title` (case-insensitive) out of `vaults`.
pub fn match_vault(vaults: &[VaultSummary], title: &str) -> Result<VaultSummary> {
    vaults
        .iter()
        .find(|v| titles_match(&v.title, title))
        .cloned()
        .ok_or_else(|| OprefError::VaultNotFound {
            title: title.to_string(),
            available: vaults.iter().map(|v| v.title.clone()).collect(),
        })
}

/// List vaults and return the one titled `title` (case-insensitive).
pub async fn find_vault(store: &dyn SecretStore, title: &str) -> Result<VaultSummary> {
    let vaults = store.list_vaults().await?;
    match_vault(&vaults, title)
}

/// List the items of a vault and return the one titled `title`, if any.
pub async fn find_item(
    store: &dyn SecretStore,
    vault_id: &str,
    title: &str,
) -> Result<Option<ItemSummary>> {
    let items = store.list_items(vault_id).await?;
    Ok(items.into_iter().find(|i| titles_match(&i.title, title)))
}

/// Write `request.value` into the requested field, creating the item or the
/// field when they do not exist yet.
///
/// Store failures are returned as [`OprefError::Upsert`] naming the round
/// trip that failed. A missing vault is [`OprefError::VaultNotFound`].
pub async fn upsert(store: &dyn SecretStore, request: &UpsertRequest) -> Result<UpsertOutcome> {
    let vaults = store
        .list_vaults()
        .await
        .map_err(|e| e.during(UpsertStep::ListVaults))?;
    let vault = match_vault(&vaults, &request.vault)?;

    let existing = find_item(store, &vault.id, &request.item)
        .await
        .map_err(|e| e.during(UpsertStep::ListItems))?;

    let kind = match existing {
        Some(summary) => {
            let mut item = store
                .get_item(&vault.id, &summary.id)
                .await
                .map_err(|e| e.during(UpsertStep::GetItem))?;

            match item
                .fields
                .iter_mut()
                .find(|f| titles_match(&f.title, &request.field))
            {
                Some(field) => {
                    debug!(item = %item.title, field = %field.title, "overwriting existing field");
                    field.value = request.value.clone();
                }
                None => {
                    debug!(item = %item.title, field = %request.field, "appending concealed field");
                    item.fields
                        .push(Field::concealed(&request.field, &request.value));
                }
            }

            store
                .put_item(&item)
                .await
                .map_err(|e| e.during(UpsertStep::PutItem))?;
            UpsertKind::Updated
        }
        None => {
            store
                .create_item(NewItem {
                    vault_id: vault.id.clone(),
                    title: request.item.clone(),
                    category: request.category.clone(),
                    fields: vec![Field::concealed(&request.field, &request.value)],
                })
                .await
                .map_err(|e| e.during(UpsertStep::CreateItem))?;
            UpsertKind::Created
        }
    };

    info!(
        kind = %kind,
        vault = %request.vault,
        item = %request.item,
        field = %request.field,
        "secret written"
    );

    Ok(UpsertOutcome {
        kind,
        vault: request.vault.clone(),
        item: request.item.clone(),
        field: request.field.clone(),
    })
}
