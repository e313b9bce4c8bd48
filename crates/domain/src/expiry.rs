// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::CertificateRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Expiry status of a certificate relative to a run's reference time.
///
/// `Unknown` is a distinct outcome for absent or unparseable validity dates
/// and is never folded into `Expired` or `Valid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExpiryStatus {
    /// The validity date lies before the reference time.
    Expired,
    /// The validity date has not yet passed.
    Valid,
    /// The validity date is absent or could not be parsed.
    Unknown,
}

impl ExpiryStatus {
    /// Returns the tri-state boolean form used by output formats.
    #[must_use]
    pub const fn as_bool(self) -> Option<bool> {
        match self {
            Self::Expired => Some(true),
            Self::Valid => Some(false),
            Self::Unknown => None,
        }
    }
}

const DAY_MONTH_LONG_YEAR: &[BorrowedFormatItem<'_>] = format_description!(
    "[day padding:none] [month repr:long case_sensitive:false] [year]"
);
const DAY_MONTH_SHORT_YEAR: &[BorrowedFormatItem<'_>] = format_description!(
    "[day padding:none] [month repr:short case_sensitive:false] [year]"
);
const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const DAY_SLASH_MONTH_YEAR: &[BorrowedFormatItem<'_>] =
    format_description!("[day padding:none]/[month padding:none]/[year]");
const DAY_DASH_MONTH_YEAR: &[BorrowedFormatItem<'_>] =
    format_description!("[day padding:none]-[month padding:none]-[year]");
const DAY_DOT_MONTH_YEAR: &[BorrowedFormatItem<'_>] =
    format_description!("[day padding:none].[month padding:none].[year]");

const FORMATS: [&[BorrowedFormatItem<'_>]; 6] = [
    DAY_MONTH_LONG_YEAR,
    DAY_MONTH_SHORT_YEAR,
    ISO_DATE,
    DAY_SLASH_MONTH_YEAR,
    DAY_DASH_MONTH_YEAR,
    DAY_DOT_MONTH_YEAR,
];

#[allow(clippy::expect_used)] // literal pattern
static EMBEDDED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,2} [A-Za-z]{3,9} \d{4}|\d{4}-\d{2}-\d{2}|\d{1,2}[/.-]\d{1,2}[/.-]\d{4}")
        .expect("date pattern compiles")
});

fn parse_exact(text: &str) -> Option<Date> {
    FORMATS
        .iter()
        .find_map(|format| Date::parse(text, *format).ok())
}

/// Parses a printed validity date.
///
/// Numeric forms are read day first. When the whole text is not a date, the
/// first date-looking fragment inside it is tried.
#[must_use]
pub fn parse_validity_date(value: &str) -> Option<Date> {
    let text: String = value
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .trim_end_matches('.')
        .to_string();
    if text.is_empty() {
        return None;
    }

    parse_exact(&text).or_else(|| {
        EMBEDDED_DATE
            .find_iter(&text)
            .find_map(|m| parse_exact(m.as_str()))
    })
}

/// Classifies a validity date against a reference time.
///
/// A certificate is expired once midnight UTC at the start of its validity
/// date lies strictly before `as_of`.
#[must_use]
pub fn classify_validity(validtill_date: Option<&str>, as_of: OffsetDateTime) -> ExpiryStatus {
    let Some(date) = validtill_date.and_then(parse_validity_date) else {
        return ExpiryStatus::Unknown;
    };

    if date.midnight().assume_utc() < as_of {
        ExpiryStatus::Expired
    } else {
        ExpiryStatus::Valid
    }
}

/// Classifies a record's expiry status for the current run.
///
/// Must be recomputed every run; the status is a function of `as_of`, not
/// of the source data.
#[must_use]
pub fn classify_expiry(record: &CertificateRecord, as_of: OffsetDateTime) -> ExpiryStatus {
    classify_validity(record.fields().validtill_date.as_deref(), as_of)
}
