// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for reference resolution and secret store access.

use thiserror::Error;

use crate::types::UpsertStep;

/// The primary error type used across the store trait and the resolution engine.
///
/// A string that is not a reference is not an error: [`crate::Reference::parse`]
/// returns `None` for it.
#[derive(Debug, Error)]
pub enum OprefError {
    /// The store could not resolve a specific reference (not found, unauthorized, transport).
    #[error("failed to resolve {reference}: {message}")]
    Resolution { reference: String, message: String },

    /// The target vault of an upsert does not exist.
    #[error("vault \"{title}\" not found")]
    VaultNotFound {
        title: String,
        /// Titles of the vaults that are visible to the caller.
        available: Vec<String>,
    },

    /// The original and resolved trees passed to the diff reporter have different shapes.
    #[error("shape mismatch between original and resolved trees at {path}")]
    ShapeMismatch { path: String },

    /// Transport or authentication failure reported by a store call.
    #[error("secret store error: {message}")]
    Store {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A store call failed during an upsert.
    #[error("upsert failed during {step}: {source}")]
    Upsert {
        step: UpsertStep,
        source: Box<OprefError>,
    },

    /// Configuration errors (missing token file, malformed token, bad client settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// Failure reading an input file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OprefError {
    /// Shorthand for a store failure without an underlying source.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap this error with the upsert step that produced it.
    pub fn during(self, step: UpsertStep) -> Self {
        Self::Upsert {
            step,
            source: Box::new(self),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T, E = OprefError> = std::result::Result<T, E>;
