// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide Connect client.

use std::sync::Arc;

use opref_config::model::StoreConfig;
use opref_core::OprefError;
use tokio::sync::OnceCell;
use tracing::info;

use crate::client::ConnectClient;

static SHARED: OnceCell<Arc<ConnectClient>> = OnceCell::const_new();

/// Return the shared client, creating it from `config` on first use.
///
/// Concurrent first callers wait on a single initialization. If it fails the
/// error is returned and the next call tries again. Once a client exists it
/// is returned for every later call, whatever `config` they pass.
pub async fn shared_store(config: &StoreConfig) -> Result<Arc<ConnectClient>, OprefError> {
    SHARED
        .get_or_try_init(|| async {
            let client = ConnectClient::from_config(config).await?;
            info!(url = %client.base_url(), "connect client initialized");
            Ok::<_, OprefError>(Arc::new(client))
        })
        .await
        .map(Arc::clone)
}
