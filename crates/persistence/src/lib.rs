// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State persistence for EPC synchronization.
//!
//! Implements the engine's `StateStore` contract on two backends:
//!
//! - **JSON file** (default): one document, replaced atomically through a
//!   temporary file and rename
//! - **`SQLite`**: Diesel with embedded migrations, replaced inside one
//!   immediate transaction
//!
//! Both take an exclusive lock file next to the state when opened, so two
//! runs can never interleave their loads and saves.
//!
//! ## Testing
//!
//! - JSON tests run against temporary directories
//! - `SQLite` tests use private in-memory databases or temporary files

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod backend;
mod diesel_schema;
mod document;
mod error;
mod lock;

#[cfg(test)]
mod tests;

pub use backend::json::FileStateStore;
pub use backend::sqlite::SqliteStateStore;
pub use backend::{StateBackend, open_state_store};
pub use document::{STATE_FORMAT_VERSION, StateDocument};
pub use error::PersistenceError;
pub use lock::StateLock;
