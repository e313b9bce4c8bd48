// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flat, column-ordered view of output records for the tabular formats.

use crate::error::ExportError;
use epc_sync::OutputRecord;
use serde_json::{Map, Value};

/// Column order shared by CSV, Excel, XML and HTML output.
pub const COLUMNS: [&str; 36] = [
    "id",
    "url",
    "change",
    "expired",
    "removed",
    "changedFields",
    "postCode",
    "locality",
    "address",
    "rating",
    "propertyType",
    "floorArea",
    "currentScore",
    "potentialScore",
    "primaryUsage",
    "averageBill",
    "potentialSaving",
    "averageCostYear",
    "co2Produces",
    "co2Potential",
    "features",
    "changes",
    "assessorName",
    "assessorPhone",
    "assessorEmail",
    "accreditationScheme",
    "accreditationAssessorID",
    "accreditationPhone",
    "accreditationEmail",
    "assessmentDate",
    "certificateDate",
    "assessmentType",
    "validtillDate",
    "fingerprint",
    "fetchedAt",
    "unparsedFields",
];

/// One cell of a flattened record.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Cell {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Empty,
            Some(Value::Bool(flag)) => Self::Bool(*flag),
            Some(Value::Number(number)) => Self::Number(number.clone()),
            Some(Value::String(text)) => Self::Text(text.clone()),
            // Nested lists are carried as their JSON text.
            Some(nested @ (Value::Array(_) | Value::Object(_))) => Self::Text(nested.to_string()),
        }
    }

    /// Plain text form of the cell. Empty cells are empty strings.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
            Self::Bool(flag) => flag.to_string(),
        }
    }
}

/// Flattens a record into [`COLUMNS`] order.
///
/// # Errors
///
/// Returns an error if the record cannot be serialized.
pub fn record_cells(record: &OutputRecord) -> Result<Vec<Cell>, ExportError> {
    let map: Map<String, Value> = match serde_json::to_value(record)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Ok(COLUMNS
        .iter()
        .map(|column| Cell::from_value(map.get(*column)))
        .collect())
}

/// Flattens every record.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn table_rows(records: &[OutputRecord]) -> Result<Vec<Vec<Cell>>, ExportError> {
    records.iter().map(record_cells).collect()
}
