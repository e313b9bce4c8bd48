// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! JSON file state store.
//!
//! The whole state is one pretty-printed JSON document. Saves go to a
//! temporary file in the same directory which is then renamed over the
//! target, so readers never observe a partial write.

use crate::document::StateDocument;
use crate::error::PersistenceError;
use crate::lock::StateLock;
use epc_sync::{PersistedState, RunSnapshot, StateStore, StoreError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tracing::{debug, info};

/// State store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    lock: StateLock,
}

impl FileStateStore {
    /// Opens the store and takes the state lock.
    ///
    /// The file itself does not need to exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is held by another run or cannot be
    /// created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let lock: StateLock = StateLock::acquire(&path)?;
        info!(path = %path.display(), "Opened JSON state store");
        Ok(Self { path, lock })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn lock_path(&self) -> &Path {
        self.lock.path()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> Result<Option<PersistedState>, PersistenceError> {
        let text: String = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No previous state found");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let location: String = self.location();
        let state: PersistedState = StateDocument::parse(&text, &location)?.into_state(&location)?;
        debug!(path = %location, records = state.len(), "Read state file");
        Ok(Some(state))
    }

    fn write(&self, snapshot: &RunSnapshot) -> Result<(), PersistenceError> {
        let directory: &Path = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(directory)?;

        let document: StateDocument = StateDocument::from_snapshot(snapshot, OffsetDateTime::now_utc());
        let mut file: NamedTempFile = NamedTempFile::new_in(directory)?;
        serde_json::to_writer_pretty(&mut file, &document)?;
        file.write_all(b"\n")?;
        file.as_file().sync_all()?;
        file.persist(&self.path)
            .map_err(|err| PersistenceError::Io(err.error.to_string()))?;

        info!(
            path = %self.path.display(),
            records = document.records.len(),
            "Saved state"
        );
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load(&mut self) -> Result<Option<PersistedState>, StoreError> {
        self.read().map_err(StoreError::from)
    }

    fn save(&mut self, snapshot: &RunSnapshot) -> Result<(), StoreError> {
        self.write(snapshot).map_err(StoreError::from)
    }
}
