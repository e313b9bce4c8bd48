// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::{PersistedState, RunSnapshot};
use epc_sync_domain::{CertificateId, CertificateRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// How an id changed between the prior state and the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    /// Present now, absent before.
    New,
    /// Present in both with a different fingerprint.
    Updated,
    /// Present in both with the same fingerprint.
    Unchanged,
    /// Present before, absent now.
    Removed,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Updated => write!(f, "updated"),
            Self::Unchanged => write!(f, "unchanged"),
            Self::Removed => write!(f, "removed"),
        }
    }
}

/// Partition of the ids of a run and its prior state.
///
/// The four sets are disjoint. `new ∪ updated ∪ unchanged` is exactly the
/// current snapshot's ids and `updated ∪ unchanged ∪ removed` is exactly the
/// prior state's ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub new: BTreeSet<CertificateId>,
    pub updated: BTreeSet<CertificateId>,
    pub unchanged: BTreeSet<CertificateId>,
    pub removed: BTreeSet<CertificateId>,
}

impl ReconciliationResult {
    /// The change kind assigned to `id`, if it belongs to either side.
    #[must_use]
    pub fn kind_of(&self, id: &CertificateId) -> Option<ChangeKind> {
        if self.new.contains(id) {
            Some(ChangeKind::New)
        } else if self.updated.contains(id) {
            Some(ChangeKind::Updated)
        } else if self.unchanged.contains(id) {
            Some(ChangeKind::Unchanged)
        } else if self.removed.contains(id) {
            Some(ChangeKind::Removed)
        } else {
            None
        }
    }

    /// Whether anything differs from the prior state.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !(self.new.is_empty() && self.updated.is_empty() && self.removed.is_empty())
    }

    /// Number of ids across all four sets.
    #[must_use]
    pub fn total(&self) -> usize {
        self.new.len() + self.updated.len() + self.unchanged.len() + self.removed.len()
    }

    /// Takes the removed ids out of the result.
    ///
    /// Used when the current snapshot is known to be incomplete, so absence
    /// from it says nothing about the source. Afterwards the partition no
    /// longer covers the prior state's ids.
    pub fn withhold_removals(&mut self) -> BTreeSet<CertificateId> {
        std::mem::take(&mut self.removed)
    }
}

/// Compares a run against the prior state.
///
/// Membership is decided by id and change by fingerprint only. A missing
/// prior state behaves like an empty one, so every current id is new.
///
/// # Arguments
///
/// * `current` - The deduplicated snapshot of this run
/// * `prior` - The state persisted by the last successful run, if any
#[must_use]
pub fn reconcile(current: &RunSnapshot, prior: Option<&PersistedState>) -> ReconciliationResult {
    let mut result: ReconciliationResult = ReconciliationResult::default();

    for record in current.records() {
        let id: &CertificateId = record.id();
        match prior.and_then(|state| state.fingerprint(id)) {
            None => {
                result.new.insert(id.clone());
            }
            Some(previous) => {
                let unchanged: bool = previous == record.fingerprint();
                if unchanged {
                    result.unchanged.insert(id.clone());
                } else {
                    result.updated.insert(id.clone());
                }
            }
        }
    }

    if let Some(state) = prior {
        result.removed = state
            .ids()
            .filter(|id| !current.contains(id))
            .cloned()
            .collect();
    }

    result
}

/// Creates empty placeholder records for every removed id.
///
/// Each tombstone keeps the id and URL of the last stored record and has
/// every other field empty. Tombstones are output only; they are never part
/// of a snapshot and never persisted.
#[must_use]
pub fn materialize_tombstones(
    result: &ReconciliationResult,
    prior: &PersistedState,
    fetched_at: OffsetDateTime,
) -> Vec<CertificateRecord> {
    result
        .removed
        .iter()
        .map(|id| {
            let url: String = prior
                .record(id)
                .map(|record| record.url().to_string())
                .unwrap_or_default();
            CertificateRecord::tombstone(id.clone(), url, fetched_at)
        })
        .collect()
}

