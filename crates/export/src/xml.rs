// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ExportError;
use crate::escape::escape_xml;
use crate::table::{COLUMNS, table_rows};
use epc_sync::OutputRecord;
use std::fmt::Write;

/// Renders records as `<epcRecords><epcRecord>…</epcRecord></epcRecords>`.
///
/// Every column is present on every record; unknown values are empty
/// elements.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn render_xml(records: &[OutputRecord]) -> Result<String, ExportError> {
    let mut xml: String = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<epcRecords>\n");

    for row in table_rows(records)? {
        xml.push_str("  <epcRecord>\n");
        for (column, cell) in COLUMNS.iter().zip(&row) {
            let _ = writeln!(
                xml,
                "    <{column}>{}</{column}>",
                escape_xml(&cell.text())
            );
        }
        xml.push_str("  </epcRecord>\n");
    }

    xml.push_str("</epcRecords>\n");
    Ok(xml)
}
