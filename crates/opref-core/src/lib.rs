// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for opref.
//!
//! Provides the `op://` reference grammar, the data model of the external
//! secret store, the [`SecretStore`] trait every backend implements, and the
//! error type shared by the whole workspace.

pub mod error;
pub mod reference;
pub mod store;
pub mod types;

pub use error::{OprefError, Result};
pub use reference::{Reference, REFERENCE_PREFIX};
pub use store::SecretStore;
pub use types::{
    Field, FieldType, ItemCategory, ItemDetail, ItemSummary, NewItem, UpsertStep, VaultSummary,
};
