// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::SyncMode;
use crate::reconcile::{ChangeKind, ReconciliationResult, materialize_tombstones};
use crate::state::{PersistedState, RunSnapshot};
use epc_sync_domain::{CertificateRecord, ExpiryStatus, classify_expiry};
use serde::{Serialize, Serializer};
use time::OffsetDateTime;

/// A record as handed to output sinks.
///
/// Serializes as the record's own fields plus `change`, `expired`
/// (`true`, `false` or `null`), `removed` and, for updated records,
/// `changedFields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    #[serde(flatten)]
    pub record: CertificateRecord,
    pub change: ChangeKind,
    #[serde(rename = "expired", serialize_with = "serialize_expiry")]
    pub expiry: ExpiryStatus,
    /// Fields that differ from the prior stored record. Only set for
    /// updated records.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub changed_fields: Vec<String>,
    /// Set on tombstones.
    pub removed: bool,
}

fn serialize_expiry<S: Serializer>(expiry: &ExpiryStatus, serializer: S) -> Result<S::Ok, S::Error> {
    expiry.as_bool().serialize(serializer)
}

/// What to include in a run's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPlan {
    pub mode: SyncMode,
    pub include_tombstones: bool,
}

/// Assembles the annotated records of a run.
///
/// Full scrape ignores the prior state: every current record is emitted as
/// new and no tombstones are produced. Monitoring emits only new and
/// updated records, followed by tombstones for removed ids when requested.
/// Records come in ascending id order. Expiry is classified against
/// `as_of` every time.
///
/// # Arguments
///
/// * `snapshot` - The deduplicated records of this run
/// * `prior` - The state the run was reconciled against
/// * `reconciliation` - The result of reconciling `snapshot` with `prior`
/// * `plan` - Mode and tombstone handling
/// * `as_of` - The run timestamp
#[must_use]
pub fn build_output(
    snapshot: &RunSnapshot,
    prior: Option<&PersistedState>,
    reconciliation: &ReconciliationResult,
    plan: OutputPlan,
    as_of: OffsetDateTime,
) -> Vec<OutputRecord> {
    let mut output: Vec<OutputRecord> = Vec::new();

    for record in snapshot.records() {
        let change: ChangeKind = match plan.mode {
            SyncMode::FullScrape => ChangeKind::New,
            SyncMode::Monitoring => match reconciliation.kind_of(record.id()) {
                Some(kind @ (ChangeKind::New | ChangeKind::Updated)) => kind,
                _ => continue,
            },
        };

        let changed_fields: Vec<String> = if change == ChangeKind::Updated {
            prior
                .and_then(|state| state.record(record.id()))
                .map(|previous| record.fields().changed_fields(previous.fields()))
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        output.push(OutputRecord {
            expiry: classify_expiry(record, as_of),
            record: record.clone(),
            change,
            changed_fields,
            removed: false,
        });
    }

    if plan.mode == SyncMode::Monitoring && plan.include_tombstones {
        if let Some(state) = prior {
            output.extend(
                materialize_tombstones(reconciliation, state, as_of)
                    .into_iter()
                    .map(|record| OutputRecord {
                        expiry: ExpiryStatus::Unknown,
                        record,
                        change: ChangeKind::Removed,
                        changed_fields: Vec::new(),
                        removed: true,
                    }),
            );
        }
    }

    output
}
