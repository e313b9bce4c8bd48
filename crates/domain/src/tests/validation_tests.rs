// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_fetched_at, create_test_raw_record};
use crate::{
    CertificateRecord, RawRecord, RecordIssue, keys, normalize_record, rating_band,
    validate_record,
};

#[test]
fn test_clean_record_has_no_issues() {
    let record: CertificateRecord =
        normalize_record(&create_test_raw_record(), create_test_fetched_at()).unwrap();

    assert!(validate_record(&record).is_empty());
}

#[test]
fn test_missing_location_fields_are_reported() {
    let mut raw: RawRecord = create_test_raw_record();
    raw.fields.remove(keys::POST_CODE);
    raw.fields.remove(keys::ADDRESS);
    let record: CertificateRecord = normalize_record(&raw, create_test_fetched_at()).unwrap();

    let issues: Vec<RecordIssue> = validate_record(&record);

    assert_eq!(
        issues,
        vec![RecordIssue::MissingPostCode, RecordIssue::MissingAddress]
    );
}

#[test]
fn test_unexpected_rating_band_is_reported() {
    let raw: RawRecord = create_test_raw_record().with_field(keys::RATING, "72 Z");
    let record: CertificateRecord = normalize_record(&raw, create_test_fetched_at()).unwrap();

    let issues: Vec<RecordIssue> = validate_record(&record);

    assert_eq!(
        issues,
        vec![RecordIssue::UnexpectedRatingBand(String::from("72 Z"))]
    );
    assert_eq!(issues[0].to_string(), "Unexpected rating band: 72 Z");
}

#[test]
fn test_rating_band_forms() {
    assert_eq!(rating_band("C"), Some('C'));
    assert_eq!(rating_band("75 c"), Some('C'));
    assert_eq!(rating_band("92 A"), Some('A'));
    assert_eq!(rating_band("H"), None);
    assert_eq!(rating_band("75 CD"), None);
    assert_eq!(rating_band(""), None);
}
