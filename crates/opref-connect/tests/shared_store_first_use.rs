// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent first callers of the shared client wait on one initialization.
//!
//! Separate test binary: the process-wide cell must start out empty.

use std::sync::Arc;

use opref_config::model::StoreConfig;
use opref_connect::shared_store;

fn config(token_path: &std::path::Path, url: &str) -> StoreConfig {
    StoreConfig {
        connect_url: url.to_string(),
        token_path: token_path.display().to_string(),
        token_prefix: None,
        timeout_secs: 5,
    }
}

#[tokio::test]
#[tracing_test::traced_test]
async fn concurrent_first_use_initializes_once() {
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("token");
    std::fs::write(&token_path, "ops_token").unwrap();

    let first_config = config(&token_path, "http://first.invalid");
    let second_config = config(&token_path, "http://second.invalid");

    let (a, b) = tokio::join!(shared_store(&first_config), shared_store(&second_config));
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.base_url(), b.base_url());
    logs_assert(|lines: &[&str]| {
        match lines
            .iter()
            .filter(|line| line.contains("connect client initialized"))
            .count()
        {
            1 => Ok(()),
            n => Err(format!("expected one initialization, saw {n}")),
        }
    });
}
