// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `opref resolve`: resolve a JSON file without writing anything back.

use std::path::Path;

use opref_core::OprefError;
use opref_resolve::{diff, redact, TreeResolver};
use serde_json::Value;
use tracing::debug;

/// Read a JSON document from `path`.
pub async fn read_json(path: &Path) -> Result<Value, OprefError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| OprefError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
    serde_json::from_str(&raw)
        .map_err(|e| OprefError::Config(format!("{} is not valid JSON: {e}", path.display())))
}

/// Resolve every reference in the file at `path` and list the resolved
/// paths with redacted values.
pub async fn run_resolve(resolver: &TreeResolver, path: &Path) -> Result<String, OprefError> {
    let original = read_json(path).await?;
    let resolved = resolver.resolve(&original).await?;
    let report = diff(&original, &resolved)?;
    debug!(file = %path.display(), references = report.len(), "dry run finished");

    if report.is_empty() {
        return Ok("No op:// references found.\n".to_string());
    }

    let mut out = format!("Resolved {} secret reference(s):\n", report.len());
    for entry in &report {
        out.push_str(&format!("  {}: {}\n", entry.path, redact(&entry.value)));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use opref_test_utils::MemoryStore;

    fn resolver() -> TreeResolver {
        let store = MemoryStore::new();
        store.add_item("Agent Secrets", "OpenAI", &[("api key", "sk-openai-0123456789")]);
        store.add_item("Agent Secrets", "Slack", &[("token", "xoxb")]);
        TreeResolver::new(Arc::new(store))
    }

    fn json_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn reports_resolved_paths_redacted() {
        let (_dir, path) = json_file(
            r#"{
                "providers": {"openai": {"apiKey": "op://Agent Secrets/OpenAI/api key"}},
                "channels": [{"token": "op://Agent Secrets/Slack/token"}],
                "port": 8080
            }"#,
        );
        let out = run_resolve(&resolver(), &path).await.unwrap();
        assert_eq!(
            out,
            "Resolved 2 secret reference(s):\n  \
             providers.openai.apiKey: sk-ope...[10 chars]...6789\n  \
             channels.0.token: [short value]\n"
        );
    }

    #[tokio::test]
    async fn no_references() {
        let (_dir, path) = json_file(r#"{"port": 8080, "name": "op://incomplete"}"#);
        let out = run_resolve(&resolver(), &path).await.unwrap();
        assert_eq!(out, "No op:// references found.\n");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_resolve(&resolver(), &dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, OprefError::Io { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let (_dir, path) = json_file("{not json");
        let err = run_resolve(&resolver(), &path).await.unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn unresolvable_reference_fails() {
        let (_dir, path) = json_file(r#"{"k": "op://Agent Secrets/Missing/x"}"#);
        let err = run_resolve(&resolver(), &path).await.unwrap_err();
        assert!(matches!(err, OprefError::Resolution { .. }));
    }
}
