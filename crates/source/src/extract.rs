// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Certificate page extraction.
//!
//! Fields are found by their printed label: the label element (`dt`, `th`,
//! `strong`, `span`, `p` or `label`) is located and the value is read from
//! the element that follows it. Exact label matches are preferred over
//! labels that merely contain the wanted text. Nothing here is typed; the
//! raw text goes to the normalizer as is.

use crate::listing::{certificate_id_from_url, element_text};
use epc_sync::{FieldExtractor, RawPage};
use epc_sync_domain::{RawRecord, RawRow, keys};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Label text for each field read through [`text_after_label`].
const LABELLED_FIELDS: [(&str, &str); 25] = [
    (keys::POST_CODE, "Postcode"),
    (keys::LOCALITY, "Town"),
    (keys::ADDRESS, "Address"),
    (keys::PROPERTY_TYPE, "Property type"),
    (keys::FLOOR_AREA, "Total floor area"),
    (keys::CURRENT_SCORE, "Current rating"),
    (keys::POTENTIAL_SCORE, "Potential rating"),
    (keys::PRIMARY_USAGE, "Primary energy use"),
    (keys::AVERAGE_BILL, "Current costs"),
    (keys::POTENTIAL_SAVING, "Potential savings"),
    (keys::AVERAGE_COST_YEAR, "Based on"),
    (keys::CO2_PRODUCES, "Current emissions"),
    (keys::CO2_POTENTIAL, "Potential emissions"),
    (keys::ASSESSOR_NAME, "Assessor's name"),
    (keys::ASSESSOR_PHONE, "Assessor's phone"),
    (keys::ASSESSOR_EMAIL, "Assessor's email"),
    (keys::ACCREDITATION_SCHEME, "Accreditation scheme"),
    (keys::ACCREDITATION_ASSESSOR_ID, "Accreditation number"),
    (keys::ACCREDITATION_PHONE, "Accreditation scheme phone"),
    (keys::ACCREDITATION_EMAIL, "Accreditation scheme email"),
    (keys::ASSESSMENT_DATE, "Date of assessment"),
    (keys::CERTIFICATE_DATE, "Date of certificate"),
    (keys::ASSESSMENT_TYPE, "Type of assessment"),
    (keys::VALIDTILL_DATE, "Expiry date"),
    (keys::RATING, "Rating"),
];

#[allow(clippy::expect_used)] // literal selectors
static LABEL_TAGS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["dt", "th", "strong", "span", "p", "label"]
        .into_iter()
        .map(|tag| Selector::parse(tag).expect("tag selector parses"))
        .collect()
});

#[allow(clippy::expect_used)] // literal selector
static RATING_BADGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".epc-rating, .rating-band").expect("rating selector parses")
});

#[allow(clippy::expect_used)] // literal selector
static TABLES: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("table selector parses"));

#[allow(clippy::expect_used)] // literal selector
static HEADER_CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("header selector parses"));

#[allow(clippy::expect_used)] // literal selector
static ROWS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("row selector parses"));

#[allow(clippy::expect_used)] // literal selector
static CELLS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("cell selector parses"));

#[allow(clippy::expect_used)] // literal selector
static HEADINGS_AND_TABLES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h2, h3, h4, table").expect("heading selector parses")
});

const FEATURE_COLUMNS: [&str; 3] = [
    keys::FEATURE_NAME,
    keys::FEATURE_DESCRIPTION,
    keys::FEATURE_RATING,
];

const CHANGE_COLUMNS: [&str; 4] = [
    keys::CHANGE_NAME,
    keys::CHANGE_INSTALLATION_COST,
    keys::CHANGE_YEARLY_SAVING,
    keys::CHANGE_POTENTIAL_RATING,
];

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}

/// Reads the value printed next to a label element.
///
/// The next sibling element wins. Without one, the parent's text minus the
/// label itself is used.
fn value_after(label: ElementRef<'_>) -> Option<String> {
    if let Some(sibling) = label.next_siblings().find_map(ElementRef::wrap) {
        if let Some(text) = non_empty(element_text(sibling)) {
            return Some(text);
        }
    }

    let parent: ElementRef<'_> = label.parent().and_then(ElementRef::wrap)?;
    let parent_text: String = element_text(parent);
    let label_text: String = element_text(label);
    let rest: &str = parent_text
        .strip_prefix(label_text.as_str())
        .unwrap_or(&parent_text)
        .trim_start_matches(':')
        .trim();
    non_empty(rest.to_string())
}

/// Finds the value printed after `label`.
#[must_use]
pub fn text_after_label(document: &Html, label: &str) -> Option<String> {
    let wanted: String = label.to_lowercase();
    for exact in [true, false] {
        for selector in LABEL_TAGS.iter() {
            for candidate in document.select(selector) {
                let text: String = element_text(candidate).to_lowercase();
                let matched: bool = if exact {
                    text.trim_end_matches(':').trim() == wanted
                } else {
                    text.contains(&wanted)
                };
                if matched {
                    if let Some(value) = value_after(candidate) {
                        return Some(value);
                    }
                }
            }
        }
    }
    None
}

fn table_rows(table: ElementRef<'_>, columns: &[&str]) -> Vec<RawRow> {
    table
        .select(&ROWS)
        .skip(1)
        .filter_map(|row| {
            let cells: Vec<String> = row.select(&CELLS).map(element_text).collect();
            if cells.iter().all(String::is_empty) {
                return None;
            }
            let raw: RawRow = columns
                .iter()
                .zip(cells)
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| ((*key).to_string(), value))
                .collect();
            Some(raw)
        })
        .collect()
}

/// Rows of the first table whose header mentions "feature".
fn parse_features(document: &Html) -> Vec<RawRow> {
    document
        .select(&TABLES)
        .find(|table| {
            table
                .select(&HEADER_CELLS)
                .any(|header| element_text(header).to_lowercase().contains("feature"))
        })
        .map(|table| table_rows(table, &FEATURE_COLUMNS))
        .unwrap_or_default()
}

/// Rows of the table following each heading about improvements.
fn parse_changes(document: &Html) -> Vec<RawRow> {
    let mut changes: Vec<RawRow> = Vec::new();
    let mut after_improvements: bool = false;

    for element in document.select(&HEADINGS_AND_TABLES) {
        if element.value().name() == "table" {
            if after_improvements {
                changes.extend(table_rows(element, &CHANGE_COLUMNS));
                after_improvements = false;
            }
        } else {
            let heading: String = element_text(element).to_lowercase();
            after_improvements =
                heading.contains("improvement") || heading.contains("recommended measure");
        }
    }

    changes
}

/// Extracts the raw fields of one certificate page.
///
/// # Arguments
///
/// * `html` - The certificate page
/// * `url` - The URL the page was fetched from
#[must_use]
pub fn extract_certificate(html: &str, url: &str) -> RawRecord {
    let document: Html = Html::parse_document(html);
    let mut raw: RawRecord = RawRecord::new().with_field(keys::URL, url);

    let id: Option<String> = certificate_id_from_url(url).or_else(|| {
        text_after_label(&document, "Certificate number")
            .and_then(|text| text.split_whitespace().next().map(str::to_string))
    });
    if let Some(id) = id {
        raw.set(keys::ID, id);
    }

    let badge: Option<String> = document
        .select(&RATING_BADGE)
        .map(element_text)
        .find(|text| !text.is_empty());
    if let Some(rating) = badge {
        raw.set(keys::RATING, rating);
    }

    for (key, label) in LABELLED_FIELDS {
        if raw.get(key).is_some() {
            continue;
        }
        if let Some(value) = text_after_label(&document, label) {
            raw.set(key, value);
        }
    }

    raw.features = parse_features(&document);
    raw.changes = parse_changes(&document);
    raw
}

/// Field extractor for register certificate pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpcFieldExtractor;

impl FieldExtractor for EpcFieldExtractor {
    fn extract(&self, page: &RawPage) -> Vec<RawRecord> {
        page.documents
            .iter()
            .map(|document| extract_certificate(&document.body, &document.url))
            .collect()
    }
}
