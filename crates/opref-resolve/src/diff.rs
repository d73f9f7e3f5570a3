// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reports which paths of a configuration tree held references.
//!
//! The values carried in [`ResolvedPath`] are plaintext secrets. Pass them
//! through [`crate::redact`] before showing them anywhere.

use std::fmt;

use opref_core::{OprefError, Reference, Result};
use serde::Serialize;
use serde_json::Value;

use crate::redact::redact;

/// Path reported for a reference at the root of the tree.
pub const ROOT_PATH: &str = "(root)";

/// A path whose original value was a reference, with the value it resolved to.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    /// Dotted key path; sequence indices appear as numbers (`providers.0.key`).
    pub path: String,
    pub value: String,
}

impl fmt::Debug for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPath")
            .field("path", &self.path)
            .field("value", &redact(&self.value))
            .finish()
    }
}

/// Walk `original` and `resolved` in lockstep and list every reference leaf of
/// `original`, depth first in input order.
///
/// The trees must have the same shape, which [`crate::TreeResolver::resolve`]
/// guarantees. A mismatch is reported as [`OprefError::ShapeMismatch`].
pub fn diff(original: &Value, resolved: &Value) -> Result<Vec<ResolvedPath>> {
    let mut out = Vec::new();
    collect(original, resolved, String::new(), &mut out)?;
    Ok(out)
}

fn collect(
    original: &Value,
    resolved: &Value,
    path: String,
    out: &mut Vec<ResolvedPath>,
) -> Result<()> {
    match (original, resolved) {
        (Value::String(s), _) if Reference::is_reference(s) => {
            let value = match resolved {
                Value::String(v) => v.clone(),
                Value::Null | Value::Bool(_) | Value::Number(_) => resolved.to_string(),
                Value::Array(_) | Value::Object(_) => return Err(mismatch(path)),
            };
            let path = if path.is_empty() {
                ROOT_PATH.to_string()
            } else {
                path
            };
            out.push(ResolvedPath { path, value });
        }
        (Value::Array(items), Value::Array(resolved_items)) => {
            if items.len() != resolved_items.len() {
                return Err(mismatch(path));
            }
            for (i, (item, resolved_item)) in items.iter().zip(resolved_items).enumerate() {
                collect(item, resolved_item, child(&path, &i.to_string()), out)?;
            }
        }
        (Value::Object(entries), Value::Object(resolved_entries)) => {
            for (key, entry) in entries {
                let child_path = child(&path, key);
                match resolved_entries.get(key) {
                    Some(resolved_entry) => collect(entry, resolved_entry, child_path, out)?,
                    None => return Err(mismatch(child_path)),
                }
            }
        }
        (Value::Array(_) | Value::Object(_), _) => return Err(mismatch(path)),
        _ => {}
    }
    Ok(())
}

fn child(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn mismatch(path: String) -> OprefError {
    OprefError::ShapeMismatch {
        path: if path.is_empty() {
            ROOT_PATH.to_string()
        } else {
            path
        },
    }
}
