// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret reference resolution for configuration trees.
//!
//! - [`TreeResolver`] replaces `op://vault/item/field` leaves with secrets.
//! - [`diff`] reports which paths were references and what they became.
//! - [`upsert`] writes a secret with find-or-create semantics.
//! - [`redact`] masks secret values for display.

pub mod diff;
pub mod redact;
pub mod tree;
pub mod upsert;

pub use diff::{diff, ResolvedPath, ROOT_PATH};
pub use redact::{redact, SHORT_VALUE};
pub use tree::{count_references, TreeResolver};
pub use upsert::{
    find_item, find_vault, match_vault, upsert, UpsertKind, UpsertOutcome, UpsertRequest,
};
