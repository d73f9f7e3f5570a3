// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recursive replacement of `op://` references inside configuration trees.
//!
//! The walk returns a new tree of identical shape; only string leaves that
//! parse as references differ, holding the secret the store returned.
//!
//! Sequence elements are resolved concurrently and reassembled in input
//! order. Mapping entries are resolved one after another in input order, so
//! a mapping-heavy tree issues store calls strictly sequentially. Callers
//! that depend on store rate limits should keep this asymmetry in mind.

use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use opref_core::{OprefError, Reference, Result, SecretStore};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Walks configuration trees and resolves references through a [`SecretStore`].
#[derive(Clone)]
pub struct TreeResolver {
    store: Arc<dyn SecretStore>,
}

impl std::fmt::Debug for TreeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeResolver")
            .field("store", &self.store.name())
            .finish()
    }
}

impl TreeResolver {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }

    /// Resolve every reference in `value`, returning a new tree.
    ///
    /// The first failing reference aborts the whole call; no partial tree is
    /// returned and `value` is never modified.
    pub async fn resolve(&self, value: &Value) -> Result<Value> {
        self.walk(value).await
    }

    /// Resolve `value` and replace it with the result.
    ///
    /// On failure the tree is left exactly as it was. Returns the number of
    /// references that were resolved.
    pub async fn resolve_in_place(&self, value: &mut Value) -> Result<usize> {
        let resolved = self.walk(value).await?;
        let count = count_references(value);
        *value = resolved;
        Ok(count)
    }

    /// Resolve `value` in place, logging instead of failing.
    ///
    /// Intended for startup resolution where a missing secret should not
    /// prevent the host from starting. Returns whether resolution succeeded.
    pub async fn resolve_best_effort(&self, value: &mut Value) -> bool {
        match self.resolve_in_place(value).await {
            Ok(count) => {
                info!(references = count, store = self.store.name(), "secret references resolved");
                true
            }
            Err(e) => {
                warn!(error = %e, store = self.store.name(), "failed to resolve secret references");
                false
            }
        }
    }

    fn walk<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, Result<Value>> {
        async move {
            match value {
                Value::String(s) => match Reference::parse(s) {
                    Some(reference) => self.resolve_leaf(&reference).await.map(Value::String),
                    None => Ok(value.clone()),
                },
                Value::Array(items) => {
                    let resolved = try_join_all(items.iter().map(|item| self.walk(item))).await?;
                    Ok(Value::Array(resolved))
                }
                Value::Object(entries) => {
                    let mut resolved = Map::with_capacity(entries.len());
                    for (key, entry) in entries {
                        resolved.insert(key.clone(), self.walk(entry).await?);
                    }
                    Ok(Value::Object(resolved))
                }
                Value::Null | Value::Bool(_) | Value::Number(_) => Ok(value.clone()),
            }
        }
        .boxed()
    }

    async fn resolve_leaf(&self, reference: &Reference) -> Result<String> {
        debug!(
            store = self.store.name(),
            vault = reference.vault(),
            item = reference.item(),
            field = reference.field(),
            "resolving secret reference"
        );
        self.store
            .resolve_reference(reference)
            .await
            .map_err(|e| match e {
                OprefError::Resolution { .. } => e,
                other => OprefError::Resolution {
                    reference: reference.to_string(),
                    message: other.to_string(),
                },
            })
    }
}

/// Number of string leaves in `value` that parse as references.
pub fn count_references(value: &Value) -> usize {
    match value {
        Value::String(s) => usize::from(Reference::is_reference(s)),
        Value::Array(items) => items.iter().map(count_references).sum(),
        Value::Object(entries) => entries.values().map(count_references).sum(),
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}
