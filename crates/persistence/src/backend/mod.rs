// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State store backends.
//!
//! The backend is chosen from the state path: `.db`, `.sqlite` and
//! `.sqlite3` select `SQLite`, anything else a JSON file.

pub mod json;
pub mod sqlite;

use crate::error::PersistenceError;
use epc_sync::StateStore;
use std::path::Path;

/// Storage backend for the state carried between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBackend {
    Json,
    Sqlite,
}

impl StateBackend {
    /// Picks the backend for a state path from its extension.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        let extension: Option<String> = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("db" | "sqlite" | "sqlite3") => Self::Sqlite,
            _ => Self::Json,
        }
    }
}

impl std::fmt::Display for StateBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Opens the state store for `path`, holding its lock until dropped.
///
/// # Errors
///
/// Returns an error if the lock is held by another run or the store cannot
/// be opened.
pub fn open_state_store(path: &Path) -> Result<Box<dyn StateStore>, PersistenceError> {
    match StateBackend::for_path(path) {
        StateBackend::Json => Ok(Box::new(json::FileStateStore::open(path)?)),
        StateBackend::Sqlite => Ok(Box::new(sqlite::SqliteStateStore::open(path)?)),
    }
}
