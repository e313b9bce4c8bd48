// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod lock_tests;

use epc_sync::{DedupPolicy, RunSnapshot, deduplicate};
use epc_sync_domain::{CertificateRecord, RawRecord, keys, normalize_record};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_fetched_at() -> OffsetDateTime {
    datetime!(2026-03-01 09:30 UTC)
}

pub fn create_test_record(id: &str, rating: &str) -> CertificateRecord {
    let raw: RawRecord = RawRecord::new()
        .with_field(keys::ID, id)
        .with_field(
            keys::URL,
            format!("https://find-energy-certificate.service.gov.uk/energy-certificate/{id}"),
        )
        .with_field(keys::ADDRESS, "1 Test Road")
        .with_field(keys::POST_CODE, "AB1 2CD")
        .with_field(keys::RATING, rating)
        .with_field(keys::AVERAGE_BILL, "£1,142 per year")
        .with_field(keys::VALIDTILL_DATE, "14 February 2034");
    normalize_record(&raw, create_test_fetched_at()).unwrap()
}

pub fn create_test_snapshot(records: &[(&str, &str)]) -> RunSnapshot {
    deduplicate(
        records
            .iter()
            .map(|(id, rating)| create_test_record(id, rating)),
        DedupPolicy::LastWins,
    )
}
