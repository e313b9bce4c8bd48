// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Exclusive claim on a state location for the lifetime of one run.
///
/// Backed by a `<state>.lock` file created with `create_new`, so a second
/// claimant fails immediately instead of waiting. The file records the owning
/// pid and is removed on drop. On Linux a lock whose pid no longer exists is
/// reclaimed once; elsewhere, or when the pid cannot be read, it stays held.
#[derive(Debug)]
pub struct StateLock {
    path: PathBuf,
}

impl StateLock {
    /// Claims the state at `state_path`.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Locked` if another run holds the lock, or
    /// an I/O error if the lock file cannot be created.
    pub fn acquire(state_path: &Path) -> Result<Self, PersistenceError> {
        let path: PathBuf = lock_path_for(state_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        match Self::create(&path) {
            Err(PersistenceError::Locked { .. }) if is_stale(&path) => {
                warn!(path = %path.display(), "Removing lock left by a process that no longer exists");
                fs::remove_file(&path)?;
                Self::create(&path)
            }
            result => result,
        }
    }

    fn create(path: &Path) -> Result<Self, PersistenceError> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(mut file) => {
                if let Err(err) = writeln!(file, "{}", std::process::id()) {
                    warn!(path = %path.display(), error = %err, "Could not record pid in lock file");
                }
                debug!(path = %path.display(), "Acquired state lock");
                Ok(Self {
                    path: path.to_path_buf(),
                })
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(PersistenceError::Locked {
                path: path.display().to_string(),
            }),
            Err(err) => Err(err.into()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Released state lock"),
            Err(err) => warn!(path = %self.path.display(), error = %err, "Failed to remove lock file"),
        }
    }
}

/// Reads the pid recorded in a lock file.
#[cfg(target_os = "linux")]
fn recorded_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse::<u32>().ok()
}

#[cfg(target_os = "linux")]
fn is_stale(path: &Path) -> bool {
    recorded_pid(path).is_some_and(|pid| !Path::new("/proc").join(pid.to_string()).exists())
}

#[cfg(not(target_os = "linux"))]
fn is_stale(_path: &Path) -> bool {
    false
}

fn lock_path_for(state_path: &Path) -> PathBuf {
    let mut name: OsString = state_path
        .file_name()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| OsString::from("state"));
    name.push(".lock");
    state_path.with_file_name(name)
}
