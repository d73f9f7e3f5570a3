// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `opref read` and `opref write`.

use opref_core::{OprefError, Reference, SecretStore};
use opref_resolve::{redact, upsert, UpsertRequest};

/// Resolve one secret and show it redacted as `vault/item/field: <redacted>`.
pub async fn run_read(
    store: &dyn SecretStore,
    vault: &str,
    item: &str,
    field: &str,
) -> Result<String, OprefError> {
    let reference = Reference::new(vault, item, field).ok_or_else(|| {
        OprefError::Config("vault, item and field must not be empty".to_string())
    })?;
    let value = store.resolve_reference(&reference).await?;
    Ok(format!("{vault}/{item}/{field}: {}\n", redact(&value)))
}

/// Create or update a secret and describe what happened.
pub async fn run_write(
    store: &dyn SecretStore,
    request: &UpsertRequest,
) -> Result<String, OprefError> {
    let outcome = upsert(store, request).await?;
    Ok(format!("{outcome}\n"))
}
