// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The record normalizer.
//!
//! Turns a [`RawRecord`] into a validated [`CertificateRecord`]. Only `url`
//! and `id` are mandatory; every other field normalizes to `None` (or an
//! empty list) when absent. Typed fields whose raw text cannot be parsed
//! are kept as `None`, and their text is kept in the record's unparsed
//! fields, so it still takes part in change detection.

use crate::error::DomainError;
use crate::raw::{RawRecord, RawRow, keys};
use crate::types::{
    CertificateFields, CertificateId, CertificateRecord, FeatureRating, RecommendedChange,
};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use time::OffsetDateTime;
use url::Url;

#[allow(clippy::expect_used)] // literal pattern
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.?\d+").expect("number pattern compiles"));

#[allow(clippy::expect_used)] // literal pattern
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").expect("year pattern compiles"));

/// Trims a value and collapses inner whitespace runs. Blank becomes `None`.
#[must_use]
pub fn clean_text(value: Option<&str>) -> Option<String> {
    let value: &str = value?;
    let collapsed: String = value.split_whitespace().collect::<Vec<&str>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Extracts the first number from printed text such as `"£1,234 per year"`.
///
/// Thousands separators are removed before matching.
#[must_use]
pub fn parse_number(value: &str) -> Option<f64> {
    let without_separators: String = value.replace(',', "");
    NUMBER_PATTERN
        .find(&without_separators)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Extracts the first four-digit year in the 1900–2099 range.
#[must_use]
pub fn parse_year(value: &str) -> Option<i32> {
    YEAR_PATTERN
        .find(value)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Reads an optional typed field, keeping the text when it was present but
/// did not parse.
fn typed_field<T>(
    raw: &RawRecord,
    key: &str,
    parse: fn(&str) -> Option<T>,
    unparsed: &mut BTreeMap<String, String>,
) -> Option<T> {
    let text: String = clean_text(raw.get(key))?;
    let parsed: Option<T> = parse(&text);
    if parsed.is_none() {
        unparsed.insert(key.to_string(), text);
    }
    parsed
}

fn text_field(raw: &RawRecord, key: &str) -> Option<String> {
    clean_text(raw.get(key))
}

fn row_value(row: &RawRow, key: &str) -> Option<String> {
    clean_text(row.get(key).map(String::as_str))
}

fn normalize_features(rows: &[RawRow]) -> Vec<FeatureRating> {
    rows.iter()
        .map(|row| FeatureRating {
            name: row_value(row, keys::FEATURE_NAME),
            description: row_value(row, keys::FEATURE_DESCRIPTION),
            rating: row_value(row, keys::FEATURE_RATING),
        })
        .filter(|feature| *feature != FeatureRating::default())
        .collect()
}

fn normalize_changes(rows: &[RawRow]) -> Vec<RecommendedChange> {
    rows.iter()
        .map(|row| RecommendedChange {
            name: row_value(row, keys::CHANGE_NAME),
            installation_cost: row_value(row, keys::CHANGE_INSTALLATION_COST),
            yearly_saving: row_value(row, keys::CHANGE_YEARLY_SAVING),
            potential_rating: row_value(row, keys::CHANGE_POTENTIAL_RATING),
        })
        .filter(|change| *change != RecommendedChange::default())
        .collect()
}

fn normalize_url(raw: &RawRecord) -> Result<String, DomainError> {
    let text: String =
        text_field(raw, keys::URL).ok_or(DomainError::MissingField { field: keys::URL })?;
    let parsed: Url = Url::parse(&text).map_err(|err| DomainError::InvalidField {
        field: keys::URL,
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DomainError::InvalidField {
            field: keys::URL,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(text)
}

/// Normalizes one raw record.
///
/// This is a pure function: the same input and `fetched_at` always produce
/// an identical record, fingerprint included.
///
/// # Arguments
///
/// * `raw` - The extracted field values
/// * `fetched_at` - Timestamp of the current run
///
/// # Errors
///
/// Returns an error if:
/// - `url` is missing, not absolute, or not http(s)
/// - `id` is missing or contains whitespace
pub fn normalize_record(
    raw: &RawRecord,
    fetched_at: OffsetDateTime,
) -> Result<CertificateRecord, DomainError> {
    let url: String = normalize_url(raw)?;
    let id: CertificateId = match raw.get(keys::ID) {
        Some(value) => CertificateId::parse(value)?,
        None => return Err(DomainError::MissingField { field: keys::ID }),
    };

    let mut unparsed: BTreeMap<String, String> = BTreeMap::new();

    let fields: CertificateFields = CertificateFields {
        post_code: text_field(raw, keys::POST_CODE),
        locality: text_field(raw, keys::LOCALITY),
        address: text_field(raw, keys::ADDRESS),
        rating: text_field(raw, keys::RATING),
        property_type: text_field(raw, keys::PROPERTY_TYPE),
        floor_area: text_field(raw, keys::FLOOR_AREA),
        current_score: text_field(raw, keys::CURRENT_SCORE),
        potential_score: text_field(raw, keys::POTENTIAL_SCORE),
        primary_usage: typed_field(raw, keys::PRIMARY_USAGE, parse_number, &mut unparsed),
        average_bill: typed_field(raw, keys::AVERAGE_BILL, parse_number, &mut unparsed),
        potential_saving: typed_field(raw, keys::POTENTIAL_SAVING, parse_number, &mut unparsed),
        average_cost_year: typed_field(raw, keys::AVERAGE_COST_YEAR, parse_year, &mut unparsed),
        co2_produces: typed_field(raw, keys::CO2_PRODUCES, parse_number, &mut unparsed),
        co2_potential: typed_field(raw, keys::CO2_POTENTIAL, parse_number, &mut unparsed),
        features: normalize_features(&raw.features),
        changes: normalize_changes(&raw.changes),
        assessor_name: text_field(raw, keys::ASSESSOR_NAME),
        assessor_phone: text_field(raw, keys::ASSESSOR_PHONE),
        assessor_email: text_field(raw, keys::ASSESSOR_EMAIL),
        accreditation_scheme: text_field(raw, keys::ACCREDITATION_SCHEME),
        accreditation_assessor_id: text_field(raw, keys::ACCREDITATION_ASSESSOR_ID),
        accreditation_phone: text_field(raw, keys::ACCREDITATION_PHONE),
        accreditation_email: text_field(raw, keys::ACCREDITATION_EMAIL),
        assessment_date: text_field(raw, keys::ASSESSMENT_DATE),
        certificate_date: text_field(raw, keys::CERTIFICATE_DATE),
        assessment_type: text_field(raw, keys::ASSESSMENT_TYPE),
        validtill_date: text_field(raw, keys::VALIDTILL_DATE),
        unparsed_fields: unparsed,
    };

    Ok(CertificateRecord::new(id, url, fields, fetched_at))
}
