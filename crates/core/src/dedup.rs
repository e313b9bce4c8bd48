// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::DedupPolicy;
use crate::state::RunSnapshot;
use epc_sync_domain::{CertificateId, CertificateRecord};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// What happened to a record pushed into a [`Deduplicator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First occurrence of the id.
    Inserted,
    /// The id was already present and the new record replaced it.
    Replaced,
    /// The id was already present and the new record was discarded.
    Discarded,
}

/// Collapses a stream of records into at most one record per id.
///
/// Memory grows with the number of distinct ids, not with the number of
/// records pushed.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    policy: DedupPolicy,
    records: BTreeMap<CertificateId, CertificateRecord>,
    seen: usize,
    duplicates: usize,
}

impl Deduplicator {
    #[must_use]
    pub const fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            records: BTreeMap::new(),
            seen: 0,
            duplicates: 0,
        }
    }

    /// Adds one record, resolving a clash with the configured policy.
    pub fn push(&mut self, record: CertificateRecord) -> MergeOutcome {
        self.seen += 1;
        match self.records.entry(record.id().clone()) {
            Entry::Vacant(slot) => {
                slot.insert(record);
                MergeOutcome::Inserted
            }
            Entry::Occupied(mut slot) => {
                self.duplicates += 1;
                match self.policy {
                    DedupPolicy::LastWins => {
                        slot.insert(record);
                        MergeOutcome::Replaced
                    }
                    DedupPolicy::FirstWins => MergeOutcome::Discarded,
                }
            }
        }
    }

    /// Merges a finished snapshot as if its records had been pushed in id
    /// order.
    ///
    /// Listings are merged in configured order, so under `LastWins` a later
    /// listing overrides an earlier one and under `FirstWins` the earlier
    /// listing is kept.
    pub fn absorb(&mut self, snapshot: RunSnapshot) {
        for record in snapshot.into_records() {
            self.push(record);
        }
    }

    /// Number of records pushed so far.
    #[must_use]
    pub const fn seen(&self) -> usize {
        self.seen
    }

    /// Number of pushes that clashed with an already present id.
    #[must_use]
    pub const fn duplicates(&self) -> usize {
        self.duplicates
    }

    #[must_use]
    pub fn finish(self) -> RunSnapshot {
        RunSnapshot::from_map(self.records)
    }
}

/// Builds a snapshot from records in encounter order.
#[must_use]
pub fn deduplicate(
    records: impl IntoIterator<Item = CertificateRecord>,
    policy: DedupPolicy,
) -> RunSnapshot {
    let mut deduplicator: Deduplicator = Deduplicator::new(policy);
    for record in records {
        deduplicator.push(record);
    }
    deduplicator.finish()
}
