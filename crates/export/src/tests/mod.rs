// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use epc_sync::{ChangeKind, OutputRecord};
use epc_sync_domain::{
    CertificateFields, CertificateId, CertificateRecord, ExpiryStatus, FeatureRating,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_generated_at() -> OffsetDateTime {
    datetime!(2026-03-01 09:30 UTC)
}

pub fn create_test_output(id: &str, address: Option<&str>, change: ChangeKind) -> OutputRecord {
    let fields: CertificateFields = CertificateFields {
        address: address.map(str::to_string),
        post_code: Some(String::from("AB1 2CD")),
        rating: Some(String::from("72 C")),
        average_bill: Some(1024.5),
        average_cost_year: Some(2023),
        features: vec![FeatureRating {
            name: Some(String::from("Wall")),
            description: None,
            rating: Some(String::from("Good")),
        }],
        validtill_date: Some(String::from("1 May 2030")),
        ..CertificateFields::default()
    };
    let record: CertificateRecord = CertificateRecord::new(
        CertificateId::parse(id).unwrap(),
        format!("https://find-energy-certificate.service.gov.uk/energy-certificate/{id}"),
        fields,
        create_test_generated_at(),
    );
    OutputRecord {
        record,
        change,
        expiry: ExpiryStatus::Valid,
        changed_fields: if change == ChangeKind::Updated {
            vec![String::from("rating")]
        } else {
            Vec::new()
        },
        removed: false,
    }
}

pub fn create_test_tombstone(id: &str) -> OutputRecord {
    OutputRecord {
        record: CertificateRecord::tombstone(
            CertificateId::parse(id).unwrap(),
            format!("https://find-energy-certificate.service.gov.uk/energy-certificate/{id}"),
            create_test_generated_at(),
        ),
        change: ChangeKind::Removed,
        expiry: ExpiryStatus::Unknown,
        changed_fields: Vec::new(),
        removed: true,
    }
}

pub fn create_test_outputs() -> Vec<OutputRecord> {
    vec![
        create_test_output("0001", Some("1 High Street"), ChangeKind::New),
        create_test_output("0002", Some("Flat <2> & \"Garden\""), ChangeKind::Updated),
        create_test_tombstone("0003"),
    ]
}
