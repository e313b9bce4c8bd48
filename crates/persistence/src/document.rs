// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use epc_sync::{PersistedState, RunSnapshot};
use epc_sync_domain::CertificateRecord;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Current version of the stored state layout.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// On-disk form of the state carried between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    pub version: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
    /// Records in ascending id order.
    pub records: Vec<CertificateRecord>,
}

impl StateDocument {
    #[must_use]
    pub fn from_snapshot(snapshot: &RunSnapshot, saved_at: OffsetDateTime) -> Self {
        Self {
            version: STATE_FORMAT_VERSION,
            saved_at,
            records: snapshot.records().cloned().collect(),
        }
    }

    /// Parses a stored document.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Corrupt` if the text is not a state
    /// document of the current version. Id-only state written by older
    /// releases is reported as corrupt too, since it carries no
    /// fingerprints to compare against.
    pub fn parse(text: &str, location: &str) -> Result<Self, PersistenceError> {
        let corrupt = |reason: String| PersistenceError::Corrupt {
            path: location.to_string(),
            reason,
        };

        if text.trim().is_empty() {
            return Err(corrupt(String::from("state file is empty")));
        }

        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|err| corrupt(err.to_string()))?;
        let legacy: bool = value.is_array() || (value.get("ids").is_some() && value.get("version").is_none());
        if legacy {
            return Err(corrupt(String::from(
                "id-only state from an older release, run a full scrape to rebuild it",
            )));
        }

        let document: Self = serde_json::from_value(value).map_err(|err| corrupt(err.to_string()))?;
        if document.version != STATE_FORMAT_VERSION {
            return Err(corrupt(format!(
                "unsupported state version {} (expected {STATE_FORMAT_VERSION})",
                document.version
            )));
        }
        Ok(document)
    }

    /// Rebuilds the in-memory state.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Corrupt` if two records share an id.
    pub fn into_state(self, location: &str) -> Result<PersistedState, PersistenceError> {
        PersistedState::from_records(self.records).map_err(|err| PersistenceError::Corrupt {
            path: location.to_string(),
            reason: err.to_string(),
        })
    }
}
