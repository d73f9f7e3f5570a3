// SPDX-FileCopyrightText: 2026 opref Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! 1Password Connect backend for opref.
//!
//! [`ConnectClient`] implements [`opref_core::SecretStore`] over the Connect
//! REST API. The service token is read from a file with [`load_token`], and
//! [`shared_store`] hands out one client per process.

pub mod client;
pub mod shared;
pub mod token;
pub mod types;

pub use client::{ConnectApiError, ConnectClient};
pub use shared::shared_store;
pub use token::load_token;
