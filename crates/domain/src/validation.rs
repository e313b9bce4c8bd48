// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::CertificateRecord;

/// A non-fatal data quality problem found on a normalized record.
///
/// Issues are reported, never used to drop a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    /// The record has no postcode.
    MissingPostCode,
    /// The record has no address.
    MissingAddress,
    /// The rating text does not end in a band `A`–`G`.
    UnexpectedRatingBand(String),
}

impl std::fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPostCode => write!(f, "Missing field 'postCode'"),
            Self::MissingAddress => write!(f, "Missing field 'address'"),
            Self::UnexpectedRatingBand(rating) => write!(f, "Unexpected rating band: {rating}"),
        }
    }
}

/// Reads the energy band from rating text such as `"C"` or `"75 C"`.
#[must_use]
pub fn rating_band(rating: &str) -> Option<char> {
    let last: &str = rating.split_whitespace().last()?;
    let mut chars = last.chars();
    let band: char = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() || !('A'..='G').contains(&band) {
        return None;
    }
    Some(band)
}

/// Checks a record for data quality issues.
///
/// This function is pure and does not reject anything; callers decide how
/// to report the issues.
///
/// # Arguments
///
/// * `record` - The record to inspect
///
/// # Returns
///
/// All issues found, in a fixed order. Empty when the record is clean.
#[must_use]
pub fn validate_record(record: &CertificateRecord) -> Vec<RecordIssue> {
    let mut issues: Vec<RecordIssue> = Vec::new();
    let fields = record.fields();

    if fields.post_code.is_none() {
        issues.push(RecordIssue::MissingPostCode);
    }
    if fields.address.is_none() {
        issues.push(RecordIssue::MissingAddress);
    }
    if let Some(rating) = &fields.rating {
        if rating_band(rating).is_none() {
            issues.push(RecordIssue::UnexpectedRatingBand(rating.clone()));
        }
    }

    issues
}
