// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::store::StoreError;
use epc_sync_domain::{CertificateId, CertificateRecord, Fingerprint};
use std::collections::BTreeMap;

/// The deduplicated set of records observed by one run.
///
/// Holds at most one record per `CertificateId`. Iteration is ordered by id.
/// Built by the [`Deduplicator`](crate::Deduplicator), never mutated once the
/// crawl has finished.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSnapshot {
    records: BTreeMap<CertificateId, CertificateRecord>,
}

impl RunSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    pub(crate) const fn from_map(records: BTreeMap<CertificateId, CertificateRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &CertificateId) -> bool {
        self.records.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &CertificateId) -> Option<&CertificateRecord> {
        self.records.get(id)
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &CertificateId> {
        self.records.keys()
    }

    /// Records in ascending id order.
    pub fn records(&self) -> impl Iterator<Item = &CertificateRecord> {
        self.records.values()
    }

    pub(crate) fn into_records(self) -> impl Iterator<Item = CertificateRecord> {
        self.records.into_values()
    }
}

/// The state carried from one run to the next.
///
/// Maps every id seen by the last successful run to its fingerprint, and
/// keeps the full record so removed certificates can still be described.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistedState {
    index: BTreeMap<CertificateId, Fingerprint>,
    records: BTreeMap<CertificateId, CertificateRecord>,
}

impl PersistedState {
    /// Builds the state to persist from a finished run.
    #[must_use]
    pub fn from_snapshot(snapshot: &RunSnapshot) -> Self {
        let records: BTreeMap<CertificateId, CertificateRecord> = snapshot.records.clone();
        let index: BTreeMap<CertificateId, Fingerprint> = records
            .iter()
            .map(|(id, record)| (id.clone(), record.fingerprint().clone()))
            .collect();
        Self { index, records }
    }

    /// Rebuilds state from stored records.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if two records share an id.
    pub fn from_records(
        records: impl IntoIterator<Item = CertificateRecord>,
    ) -> Result<Self, StoreError> {
        let mut state: Self = Self::default();
        for record in records {
            let id: CertificateId = record.id().clone();
            if state.records.contains_key(&id) {
                return Err(StoreError::Corrupt {
                    reason: format!("certificate '{id}' is stored twice"),
                });
            }
            state.index.insert(id.clone(), record.fingerprint().clone());
            state.records.insert(id, record);
        }
        Ok(state)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &CertificateId) -> bool {
        self.index.contains_key(id)
    }

    /// The fingerprint the last run recorded for `id`.
    #[must_use]
    pub fn fingerprint(&self, id: &CertificateId) -> Option<&Fingerprint> {
        self.index.get(id)
    }

    /// The full record the last run stored for `id`.
    #[must_use]
    pub fn record(&self, id: &CertificateId) -> Option<&CertificateRecord> {
        self.records.get(id)
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = &CertificateId> {
        self.index.keys()
    }

    /// Stored records in ascending id order.
    pub fn records(&self) -> impl Iterator<Item = &CertificateRecord> {
        self.records.values()
    }
}
