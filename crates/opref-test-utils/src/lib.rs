// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for opref integration tests.
//!
//! Provides an in-memory [`SecretStore`](opref_core::SecretStore) for fast,
//! deterministic tests without a running secret store.
//!
//! # Components
//!
//! - [`MemoryStore`] - In-memory vaults and items with call recording and failure injection

pub mod memory_store;

pub use memory_store::{MemoryStore, StoreCall, StoreOp};
