// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{RawRecord, RawRow, keys};
use time::OffsetDateTime;
use time::macros::datetime;

pub const TEST_URL: &str =
    "https://find-energy-certificate.service.gov.uk/energy-certificate/1234-5678-9012-3456-7890";

pub fn create_test_fetched_at() -> OffsetDateTime {
    datetime!(2026-03-01 09:30 UTC)
}

pub fn create_test_row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

/// A fully populated raw record as an extractor would produce it.
pub fn create_test_raw_record() -> RawRecord {
    let mut raw: RawRecord = RawRecord::new()
        .with_field(keys::ID, "1234-5678-9012-3456-7890")
        .with_field(keys::URL, TEST_URL)
        .with_field(keys::POST_CODE, "SW1A 1AA")
        .with_field(keys::LOCALITY, "London")
        .with_field(keys::ADDRESS, "10 Example Street")
        .with_field(keys::RATING, "72 C")
        .with_field(keys::PROPERTY_TYPE, "Mid-terrace house")
        .with_field(keys::FLOOR_AREA, "84 square metres")
        .with_field(keys::CURRENT_SCORE, "72 C")
        .with_field(keys::POTENTIAL_SCORE, "85 B")
        .with_field(keys::PRIMARY_USAGE, "210 kWh per square metre per year")
        .with_field(keys::AVERAGE_BILL, "£1,142 per year")
        .with_field(keys::POTENTIAL_SAVING, "£301 per year")
        .with_field(keys::AVERAGE_COST_YEAR, "Based on average costs in 2023")
        .with_field(keys::CO2_PRODUCES, "3.1 tonnes of CO2")
        .with_field(keys::CO2_POTENTIAL, "1.4 tonnes of CO2")
        .with_field(keys::ASSESSOR_NAME, "Jane Assessor")
        .with_field(keys::ASSESSOR_PHONE, "01234 567890")
        .with_field(keys::ASSESSOR_EMAIL, "jane@example.com")
        .with_field(keys::ACCREDITATION_SCHEME, "Elmhurst Energy Systems Ltd")
        .with_field(keys::ACCREDITATION_ASSESSOR_ID, "EES/012345")
        .with_field(keys::ACCREDITATION_PHONE, "01455 883 250")
        .with_field(keys::ACCREDITATION_EMAIL, "enquiries@elmhurstenergy.co.uk")
        .with_field(keys::ASSESSMENT_DATE, "14 February 2024")
        .with_field(keys::CERTIFICATE_DATE, "15 February 2024")
        .with_field(keys::ASSESSMENT_TYPE, "RdSAP")
        .with_field(keys::VALIDTILL_DATE, "14 February 2034");

    raw.features = vec![
        create_test_row(&[
            (keys::FEATURE_NAME, "Wall"),
            (keys::FEATURE_DESCRIPTION, "Cavity wall, filled cavity"),
            (keys::FEATURE_RATING, "Good"),
        ]),
        create_test_row(&[
            (keys::FEATURE_NAME, "Roof"),
            (keys::FEATURE_DESCRIPTION, "Pitched, 270 mm loft insulation"),
            (keys::FEATURE_RATING, "Very good"),
        ]),
    ];
    raw.changes = vec![create_test_row(&[
        (keys::CHANGE_NAME, "Solar photovoltaic panels"),
        (keys::CHANGE_INSTALLATION_COST, "£3,500 - £5,500"),
        (keys::CHANGE_YEARLY_SAVING, "£301"),
        (keys::CHANGE_POTENTIAL_RATING, "85 B"),
    ])];

    raw
}
