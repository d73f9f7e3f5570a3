// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns Figment extraction failures into miette diagnostics.
//!
//! Unknown keys get a source span pointing at the offending line and a
//! "did you mean" suggestion picked by Jaro-Winkler similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler score for a key to be offered as a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with enough context for miette to render it.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no config section declares.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(opref::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(opref::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    /// A required key with no default.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(opref::config::missing_key),
        help("add `{key} = <value>` to your opref.toml")
    )]
    MissingKey { key: String },

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {path}")]
    #[diagnostic(
        code(opref::config::file_not_found),
        help("check the path passed to --config")
    )]
    FileNotFound { path: String },

    /// A semantic check failed after deserialization.
    #[error("validation error: {message}")]
    #[diagnostic(code(opref::config::validation))]
    Validation { message: String },

    /// Anything else Figment reports.
    #[error("configuration error: {0}")]
    #[diagnostic(code(opref::config::other))]
    Other(String),
}

impl ConfigError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a Figment error (which may hold several errors) into diagnostics.
///
/// `sources` pairs a file name with its contents and is used to attach
/// source spans to unknown-key errors.
pub fn figment_to_config_errors(
    err: figment::Error,
    sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| {
            let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    // The path figment reports ends with the unknown key itself.
                    let table = match section.split_last() {
                        Some((last, parent)) if last == field => parent,
                        _ => &section[..],
                    };
                    let (span, src) = source_for(&error, table, field, sources);
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        suggestion: suggest_key(field, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: field.to_string(),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: section.join("."),
                    detail: format!("found {actual}, expected {expected}"),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// Find the file the error came from and the span of `field` inside it.
fn source_for(
    error: &figment::Error,
    section: &[String],
    field: &str,
    sources: &[(String, String)],
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|s| match s {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    let found = sources.iter().find(|(name, _)| match &origin {
        Some(path) => name == path,
        // Inline strings have no file origin; a single source is unambiguous.
        None => sources.len() == 1,
    });

    match found {
        Some((name, content)) => match find_key_offset(content, section, field) {
            Some(offset) => (
                Some(SourceSpan::new(offset.into(), field.len())),
                Some(NamedSource::new(name, content.clone())),
            ),
            None => (None, None),
        },
        None => (None, None),
    }
}

/// Byte offset of `field` as a key inside the `[section]` table of a TOML document.
///
/// For an empty section path the search starts at the top of the document.
pub fn find_key_offset(content: &str, section: &[String], field: &str) -> Option<usize> {
    let start = if section.is_empty() {
        0
    } else {
        let header = format!("[{}]", section.join("."));
        content.find(&header)? + header.len()
    };

    let mut offset = start;
    for line in content[start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') && offset != start {
            // Next table: the key is not in this section.
            return None;
        }
        if let Some(after) = trimmed.strip_prefix(field) {
            if after.trim_start().starts_with('=') {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }
    None
}

/// Best Jaro-Winkler match for `unknown` among `valid_keys`, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Render diagnostics with miette's graphical handler.
pub fn format_errors(errors: &[ConfigError]) -> String {
    let handler = miette::GraphicalReportHandler::new();
    let mut out = String::new();
    for error in errors {
        let mut buf = String::new();
        if handler.render_report(&mut buf, error as &dyn Diagnostic).is_ok() {
            out.push_str(&buf);
        } else {
            out.push_str(&format!("Error: {error}\n"));
        }
    }
    out
}

/// Render diagnostics to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", format_errors(errors));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_key() {
        let valid = &["connect_url", "token_path", "token_prefix", "timeout_secs"];
        assert_eq!(
            suggest_key("conect_url", valid),
            Some("connect_url".to_string())
        );
        assert_eq!(suggest_key("token_pth", valid), Some("token_path".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["vault", "field", "category"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn finds_key_in_its_section() {
        let content = "[store]\nconect_url = \"x\"\n";
        let offset = find_key_offset(content, &["store".to_string()], "conect_url").unwrap();
        assert_eq!(&content[offset..offset + 10], "conect_url");
    }

    #[test]
    fn does_not_match_key_in_later_section() {
        let content = "[store]\ntimeout_secs = 1\n\n[defaults]\nvaultt = \"x\"\n";
        assert!(find_key_offset(content, &["store".to_string()], "vaultt").is_none());
        assert!(find_key_offset(content, &["defaults".to_string()], "vaultt").is_some());
    }

    #[test]
    fn key_prefix_is_not_a_match() {
        let content = "[store]\ntoken_path_old = \"x\"\n";
        assert!(find_key_offset(content, &["store".to_string()], "token_path").is_none());
    }

    #[test]
    fn format_errors_includes_message() {
        let rendered = format_errors(&[ConfigError::validation("store.connect_url must not be empty")]);
        assert!(rendered.contains("store.connect_url must not be empty"));
    }
}
