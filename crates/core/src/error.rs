// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::sink::SinkError;
use crate::store::StoreError;
use thiserror::Error;

/// Errors that abort a synchronization run.
///
/// Any of these leaves the persisted state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The configuration cannot drive a run.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
    /// A listing page could not be fetched.
    #[error("Failed to fetch page {page} of listing '{listing}': {reason}")]
    PageFetch {
        /// Label of the listing being crawled.
        listing: String,
        /// 1-based page number.
        page: u32,
        /// The fetcher's failure description.
        reason: String,
    },
    /// A listing kept announcing further pages past the configured limit.
    #[error("Listing '{listing}' did not end within {max_pages} pages")]
    PaginationOverrun {
        /// Label of the listing being crawled.
        listing: String,
        /// The configured page limit.
        max_pages: u32,
    },
    /// Monitoring needs a readable prior state, but the stored one is corrupt.
    #[error("Persisted state is corrupt: {reason}")]
    StateCorrupt {
        /// Description of the corruption.
        reason: String,
    },
    /// The state store failed to load or save.
    #[error("State store error: {0}")]
    StateStore(StoreError),
    /// An output sink failed.
    #[error("Output error: {0}")]
    Sink(#[from] SinkError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Corrupt { reason } => Self::StateCorrupt { reason },
            other @ StoreError::Unavailable { .. } => Self::StateStore(other),
        }
    }
}
