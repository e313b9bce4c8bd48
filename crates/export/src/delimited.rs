// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ExportError;
use crate::table::{COLUMNS, Cell, table_rows};
use csv::Writer;
use epc_sync::OutputRecord;

/// Renders records as CSV with a fixed column order.
///
/// The header row is written even when there are no records. Nested lists
/// appear as JSON text.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized or encoded.
pub fn render_csv(records: &[OutputRecord]) -> Result<String, ExportError> {
    let mut writer: Writer<Vec<u8>> = Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS)?;

    for row in table_rows(records)? {
        writer.write_record(row.iter().map(Cell::text))?;
    }

    let bytes: Vec<u8> = writer.into_inner()?;
    String::from_utf8(bytes).map_err(|err| ExportError::Csv(err.to_string()))
}
