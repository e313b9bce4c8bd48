// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::{PersistedState, RunSnapshot};
use thiserror::Error;

/// Failure reported by a [`StateStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Stored state exists but cannot be interpreted.
    #[error("stored state is corrupt: {reason}")]
    Corrupt {
        /// Description of the corruption.
        reason: String,
    },
    /// The store could not be read or written.
    #[error("state store unavailable: {reason}")]
    Unavailable {
        /// Description of the failure.
        reason: String,
    },
}

/// Durable storage for the state carried between runs.
///
/// Implementations guarantee that `save` is atomic: a reader sees either
/// the previous state or the new one, never a mixture. Exclusive access
/// for the duration of a run is the implementation's responsibility and is
/// normally acquired when the store is opened.
pub trait StateStore {
    /// Loads the state persisted by the last successful run.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` if no state has been persisted yet
    /// * `Ok(Some(state))` with the last persisted state
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if stored state exists but cannot be
    /// read back, or `StoreError::Unavailable` for I/O failures.
    fn load(&mut self) -> Result<Option<PersistedState>, StoreError>;

    /// Replaces the persisted state with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written. The previously
    /// persisted state must then still be intact.
    fn save(&mut self, snapshot: &RunSnapshot) -> Result<(), StoreError>;
}
