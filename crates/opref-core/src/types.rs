// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store data model shared by the store trait, its implementations, and the
//! upsert reconciler.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::Display;

/// A vault visible to the store credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSummary {
    pub id: String,
    pub title: String,
}

/// An item as returned by list operations (no field values).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub id: String,
    pub title: String,
    pub category: ItemCategory,
}

/// A full item including its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: String,
    pub vault_id: String,
    pub title: String,
    pub category: ItemCategory,
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Store-specific attributes carried through a read-modify-write untouched.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

/// A single field on an item.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Store-assigned id. Empty for fields that have not been written yet.
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub value: String,
    pub field_type: FieldType,
    /// Store-specific attributes carried through a read-modify-write untouched.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl Field {
    /// A new concealed field with no store id.
    pub fn concealed(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            value: value.into(),
            field_type: FieldType::Concealed,
            extra: Map::new(),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("value", &"[REDACTED]")
            .field("field_type", &self.field_type)
            .finish()
    }
}

/// Payload for creating a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub vault_id: String,
    pub title: String,
    pub category: ItemCategory,
    pub fields: Vec<Field>,
}

/// Field type as understood by the store. Only `Concealed` matters to the core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Concealed,
    Other(String),
}

impl From<&str> for FieldType {
    fn from(s: &str) -> Self {
        match s {
            "STRING" => Self::Text,
            "CONCEALED" => Self::Concealed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("STRING"),
            Self::Concealed => f.write_str("CONCEALED"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Item category, in the store's upper-snake spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemCategory {
    #[default]
    ApiCredential,
    Login,
    Password,
    SecureNote,
    Other(String),
}

impl From<&str> for ItemCategory {
    fn from(s: &str) -> Self {
        match s {
            "API_CREDENTIAL" => Self::ApiCredential,
            "LOGIN" => Self::Login,
            "PASSWORD" => Self::Password,
            "SECURE_NOTE" => Self::SecureNote,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ItemCategory {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<ItemCategory> for String {
    fn from(c: ItemCategory) -> Self {
        c.to_string()
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiCredential => f.write_str("API_CREDENTIAL"),
            Self::Login => f.write_str("LOGIN"),
            Self::Password => f.write_str("PASSWORD"),
            Self::SecureNote => f.write_str("SECURE_NOTE"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// The store round trip an upsert was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UpsertStep {
    #[strum(serialize = "list vaults")]
    ListVaults,
    #[strum(serialize = "list items")]
    ListItems,
    #[strum(serialize = "get item")]
    GetItem,
    #[strum(serialize = "put item")]
    PutItem,
    #[strum(serialize = "create item")]
    CreateItem,
}
