// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connect API wire types and their conversion into the core data model.

use opref_core::{Field, FieldType, ItemCategory, ItemDetail, ItemSummary, NewItem, VaultSummary};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A vault as listed by `GET /v1/vaults`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireVault {
    pub id: String,
    pub name: String,
}

impl From<WireVault> for VaultSummary {
    fn from(v: WireVault) -> Self {
        Self {
            id: v.id,
            title: v.name,
        }
    }
}

/// An item as listed by `GET /v1/vaults/{vault}/items`.
#[derive(Debug, Clone, Deserialize)]
pub struct WireItemSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
}

impl From<WireItemSummary> for ItemSummary {
    fn from(i: WireItemSummary) -> Self {
        Self {
            id: i.id,
            title: i.title,
            category: ItemCategory::from(i.category),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireVaultRef {
    pub id: String,
}

/// A full item. Attributes opref does not model (urls, sections, tags,
/// timestamps) are kept in `extra` so a read-modify-write sends them back.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WireItem {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub vault: WireVaultRef,
    #[serde(default)]
    pub fields: Vec<WireField>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct WireField {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for WireField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WireField")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("field_type", &self.field_type)
            .finish_non_exhaustive()
    }
}

impl From<WireField> for Field {
    fn from(f: WireField) -> Self {
        Self {
            id: f.id,
            title: f.label.unwrap_or_default(),
            value: f.value.unwrap_or_default(),
            field_type: f
                .field_type
                .map(FieldType::from)
                .unwrap_or(FieldType::Text),
            extra: f.extra,
        }
    }
}

impl From<&Field> for WireField {
    fn from(f: &Field) -> Self {
        Self {
            id: f.id.clone(),
            label: Some(f.title.clone()),
            value: Some(f.value.clone()),
            field_type: Some(f.field_type.to_string()),
            extra: f.extra.clone(),
        }
    }
}

impl From<WireItem> for ItemDetail {
    fn from(i: WireItem) -> Self {
        Self {
            id: i.id,
            vault_id: i.vault.id,
            title: i.title,
            category: ItemCategory::from(i.category),
            fields: i.fields.into_iter().map(Field::from).collect(),
            extra: i.extra,
        }
    }
}

impl From<&ItemDetail> for WireItem {
    fn from(i: &ItemDetail) -> Self {
        Self {
            id: i.id.clone(),
            title: i.title.clone(),
            category: i.category.to_string(),
            vault: WireVaultRef {
                id: i.vault_id.clone(),
            },
            fields: i.fields.iter().map(WireField::from).collect(),
            extra: i.extra.clone(),
        }
    }
}

impl From<&NewItem> for WireItem {
    fn from(i: &NewItem) -> Self {
        Self {
            id: String::new(),
            title: i.title.clone(),
            category: i.category.to_string(),
            vault: WireVaultRef {
                id: i.vault_id.clone(),
            },
            fields: i.fields.iter().map(WireField::from).collect(),
            extra: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_name_becomes_title() {
        let vault: WireVault =
            serde_json::from_str(r#"{"id":"v1","name":"Personal","description":"mine"}"#).unwrap();
        let summary = VaultSummary::from(vault);
        assert_eq!(summary.title, "Personal");
    }

    #[test]
    fn item_summary_category_is_parsed() {
        let item: WireItemSummary =
            serde_json::from_str(r#"{"id":"i1","title":"Key","category":"API_CREDENTIAL"}"#)
                .unwrap();
        assert_eq!(ItemSummary::from(item).category, ItemCategory::ApiCredential);
    }

    #[test]
    fn item_fields_map_label_and_type() {
        let json = r#"{
            "id": "i1",
            "title": "OpenAI",
            "category": "API_CREDENTIAL",
            "vault": {"id": "v1"},
            "fields": [
                {"id": "f1", "label": "api key", "value": "sk-1", "type": "CONCEALED", "purpose": ""},
                {"id": "notesPlain", "type": "STRING"}
            ],
            "tags": ["agents"]
        }"#;
        let item = ItemDetail::from(serde_json::from_str::<WireItem>(json).unwrap());
        assert_eq!(item.vault_id, "v1");
        assert_eq!(item.fields[0].title, "api key");
        assert_eq!(item.fields[0].field_type, FieldType::Concealed);
        assert_eq!(item.fields[1].title, "");
        assert_eq!(item.fields[1].value, "");
        assert!(item.extra.contains_key("tags"));
        assert!(item.fields[0].extra.contains_key("purpose"));
    }

    #[test]
    fn unknown_attributes_survive_round_trip() {
        let json = r#"{"id":"i1","title":"T","category":"LOGIN","vault":{"id":"v1"},"urls":[{"href":"https://x"}]}"#;
        let item = ItemDetail::from(serde_json::from_str::<WireItem>(json).unwrap());
        let back = serde_json::to_value(WireItem::from(&item)).unwrap();
        assert_eq!(back["urls"][0]["href"], "https://x");
        assert_eq!(back["vault"]["id"], "v1");
        assert_eq!(back["category"], "LOGIN");
    }

    #[test]
    fn new_item_omits_ids() {
        let new = NewItem {
            vault_id: "v1".into(),
            title: "Stripe".into(),
            category: ItemCategory::ApiCredential,
            fields: vec![Field::concealed("api key", "sk")],
        };
        let body = serde_json::to_value(WireItem::from(&new)).unwrap();
        assert!(body.get("id").is_none());
        assert!(body["fields"][0].get("id").is_none());
        assert_eq!(body["fields"][0]["type"], "CONCEALED");
        assert_eq!(body["fields"][0]["label"], "api key");
        assert_eq!(body["category"], "API_CREDENTIAL");
    }

    #[test]
    fn field_debug_hides_value() {
        let field = WireField::from(&Field::concealed("api key", "sk-very-secret"));
        assert!(!format!("{field:?}").contains("sk-very-secret"));
    }
}
