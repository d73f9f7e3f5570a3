// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the 1Password Connect REST API.
//!
//! Raw response bodies are never surfaced. Every non-success status is
//! mapped to a [`ConnectApiError`] with a fixed message.

use std::time::Duration;

use async_trait::async_trait;
use opref_config::model::StoreConfig;
use opref_core::{
    Field, ItemDetail, ItemSummary, NewItem, OprefError, Reference, SecretStore, VaultSummary,
};
use reqwest::{RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::token::load_token;
use crate::types::{WireItem, WireItemSummary, WireVault};

/// Connect API failures. Raw API error messages are never exposed.
#[derive(Debug, thiserror::Error)]
pub enum ConnectApiError {
    #[error("network error communicating with the Connect server")]
    Network(#[source] reqwest::Error),

    #[error("Connect server rejected the service token")]
    Unauthorized,

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("Connect server error (status {0})")]
    ServerError(u16),

    #[error("unexpected Connect response: status {0}")]
    UnexpectedStatus(u16),

    #[error("malformed Connect response")]
    Decode(#[source] reqwest::Error),
}

impl From<ConnectApiError> for OprefError {
    fn from(e: ConnectApiError) -> Self {
        OprefError::Store {
            message: e.to_string(),
            source: Some(Box::new(e)),
        }
    }
}

/// Secret store backed by a Connect server.
#[derive(Debug)]
pub struct ConnectClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl ConnectClient {
    fn user_agent() -> String {
        format!("opref/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Create a client for the Connect server at `base_url`.
    pub fn new(base_url: &str, token: SecretString, timeout: Duration) -> Result<Self, OprefError> {
        let http = reqwest::Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| OprefError::Store {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token,
        })
    }

    /// Load the service token named by `config` and build an unshared client.
    pub async fn from_config(config: &StoreConfig) -> Result<Self, OprefError> {
        let token = load_token(
            &config.expanded_token_path(),
            config.token_prefix.as_deref(),
        )
        .await?;
        Self::new(
            &config.connect_url,
            token,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, ConnectApiError> {
        let resp = request
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(ConnectApiError::Network)?;

        let status = resp.status().as_u16();
        debug!(status, what, "connect response");
        match status {
            200..=299 => Ok(resp),
            401 | 403 => Err(ConnectApiError::Unauthorized),
            404 => Err(ConnectApiError::NotFound(what.to_string())),
            500..=599 => Err(ConnectApiError::ServerError(status)),
            other => Err(ConnectApiError::UnexpectedStatus(other)),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, ConnectApiError> {
        self.send(self.http.get(self.url(path)), what)
            .await?
            .json::<T>()
            .await
            .map_err(ConnectApiError::Decode)
    }

    async fn find_item_detail(&self, reference: &Reference) -> Result<ItemDetail, OprefError> {
        let fail = |message: String| OprefError::Resolution {
            reference: reference.to_string(),
            message,
        };

        let vaults = self.list_vaults().await.map_err(|e| fail(e.to_string()))?;
        let vault = vaults
            .into_iter()
            .find(|v| same_title(&v.title, reference.vault()))
            .ok_or_else(|| fail(format!("vault \"{}\" not found", reference.vault())))?;

        let items = self
            .list_items(&vault.id)
            .await
            .map_err(|e| fail(e.to_string()))?;
        let item = items
            .into_iter()
            .find(|i| same_title(&i.title, reference.item()))
            .ok_or_else(|| {
                fail(format!(
                    "item \"{}\" not found in vault \"{}\"",
                    reference.item(),
                    vault.title
                ))
            })?;

        self.get_item(&vault.id, &item.id)
            .await
            .map_err(|e| fail(e.to_string()))
    }
}

fn same_title(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Find a field by label or id. A `section/field` name that matches no
/// field directly is looked up inside the named section.
fn find_field<'a>(item: &'a ItemDetail, name: &str) -> Option<&'a Field> {
    let named = |f: &&Field, name: &str| same_title(&f.title, name) || same_title(&f.id, name);

    if let Some(field) = item.fields.iter().find(|f| named(f, name)) {
        return Some(field);
    }
    let (section, name) = name.rsplit_once('/')?;
    item.fields
        .iter()
        .find(|f| named(f, name) && in_section(item, f, section))
}

/// Whether `field` belongs to the section whose id or label is `section`.
fn in_section(item: &ItemDetail, field: &Field, section: &str) -> bool {
    let Some(section_id) = field
        .extra
        .get("section")
        .and_then(|s| s.get("id"))
        .and_then(Value::as_str)
    else {
        return false;
    };
    if same_title(section_id, section) {
        return true;
    }
    item.extra
        .get("sections")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|s| s.get("id").and_then(Value::as_str) == Some(section_id))
        .filter_map(|s| s.get("label").and_then(Value::as_str))
        .any(|label| same_title(label, section))
}

#[async_trait]
impl SecretStore for ConnectClient {
    fn name(&self) -> &str {
        "connect"
    }

    async fn resolve_reference(&self, reference: &Reference) -> Result<String, OprefError> {
        let item = self.find_item_detail(reference).await?;
        let field = find_field(&item, reference.field())
            .cloned()
            .ok_or_else(|| OprefError::Resolution {
                reference: reference.to_string(),
                message: format!("field \"{}\" not found", reference.field()),
            })?;

        if field.value.is_empty() {
            return Err(OprefError::Resolution {
                reference: reference.to_string(),
                message: format!("field \"{}\" has no value", field.title),
            });
        }
        Ok(field.value)
    }

    async fn list_vaults(&self) -> Result<Vec<VaultSummary>, OprefError> {
        let vaults: Vec<WireVault> = self.get_json("vaults", "vaults").await?;
        Ok(vaults.into_iter().map(VaultSummary::from).collect())
    }

    async fn list_items(&self, vault_id: &str) -> Result<Vec<ItemSummary>, OprefError> {
        let items: Vec<WireItemSummary> = self
            .get_json(&format!("vaults/{vault_id}/items"), &format!("vault {vault_id}"))
            .await?;
        Ok(items.into_iter().map(ItemSummary::from).collect())
    }

    async fn get_item(&self, vault_id: &str, item_id: &str) -> Result<ItemDetail, OprefError> {
        let item: WireItem = self
            .get_json(
                &format!("vaults/{vault_id}/items/{item_id}"),
                &format!("item {item_id} in vault {vault_id}"),
            )
            .await?;
        Ok(ItemDetail::from(item))
    }

    async fn put_item(&self, item: &ItemDetail) -> Result<(), OprefError> {
        let url = self.url(&format!("vaults/{}/items/{}", item.vault_id, item.id));
        let body = WireItem::from(item);
        self.send(
            self.http.put(url).json(&body),
            &format!("item {} in vault {}", item.id, item.vault_id),
        )
        .await?;
        Ok(())
    }

    async fn create_item(&self, item: NewItem) -> Result<ItemDetail, OprefError> {
        let url = self.url(&format!("vaults/{}/items", item.vault_id));
        let body = WireItem::from(&item);
        let created: WireItem = self
            .send(
                self.http.post(url).json(&body),
                &format!("vault {}", item.vault_id),
            )
            .await?
            .json()
            .await
            .map_err(ConnectApiError::Decode)?;
        Ok(ItemDetail::from(created))
    }
}
