// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service token loading.

use std::io::ErrorKind;
use std::path::Path;

use opref_core::OprefError;
use secrecy::SecretString;
use tracing::debug;

/// Read the service token stored at `path`.
///
/// Surrounding whitespace is trimmed. A missing file or an empty token is a
/// [`OprefError::Config`] naming the path. When `prefix` is set the token
/// must start with it.
pub async fn load_token(path: &Path, prefix: Option<&str>) -> Result<SecretString, OprefError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(OprefError::Config(format!(
                "service token file not found at {}",
                path.display()
            )));
        }
        Err(e) => {
            return Err(OprefError::Io {
                path: path.display().to_string(),
                source: e,
            });
        }
    };

    let token = raw.trim();
    if token.is_empty() {
        return Err(OprefError::Config(format!(
            "service token file {} is empty",
            path.display()
        )));
    }
    if let Some(prefix) = prefix {
        if !token.starts_with(prefix) {
            return Err(OprefError::Config(format!(
                "service token in {} does not start with \"{prefix}\"",
                path.display()
            )));
        }
    }

    debug!(path = %path.display(), "service token loaded");
    Ok(SecretString::from(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn token_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn trims_whitespace() {
        let (_dir, path) = token_file("  ops_abc123\n");
        let token = load_token(&path, None).await.unwrap();
        assert_eq!(token.expose_secret(), "ops_abc123");
    }

    #[tokio::test]
    async fn missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");
        let err = load_token(&path, None).await.unwrap_err();
        assert!(matches!(err, OprefError::Config(ref m) if m.contains("absent")));
    }

    #[tokio::test]
    async fn blank_file_is_rejected() {
        let (_dir, path) = token_file(" \n\t");
        let err = load_token(&path, None).await.unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[tokio::test]
    async fn prefix_is_enforced() {
        let (_dir, path) = token_file("eyJhbGciOi");
        let err = load_token(&path, Some("ops_")).await.unwrap_err();
        assert!(err.to_string().contains("\"ops_\""));

        let (_dir2, path2) = token_file("ops_abc");
        assert!(load_token(&path2, Some("ops_")).await.is_ok());
    }
}
