// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Excel output as an Office Open XML (`.xlsx`) workbook.

use crate::error::ExportError;
use crate::table::{COLUMNS, Cell, table_rows};
use epc_sync::OutputRecord;
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet};

pub const WORKSHEET_NAME: &str = "EPC Results";

fn write_cell(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &Cell,
) -> Result<(), ExportError> {
    match cell {
        Cell::Empty => {}
        Cell::Number(number) => match number.as_f64() {
            Some(value) => {
                worksheet.write_number(row, col, value)?;
            }
            None => {
                worksheet.write_string(row, col, number.to_string())?;
            }
        },
        Cell::Bool(flag) => {
            worksheet.write_boolean(row, col, *flag)?;
        }
        Cell::Text(text) => {
            worksheet.write_string(row, col, text)?;
        }
    }
    Ok(())
}

/// Renders records as a single-worksheet workbook with a bold header row.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized or the workbook cannot
/// be encoded.
pub fn render_excel(records: &[OutputRecord]) -> Result<Vec<u8>, ExportError> {
    let rows: Vec<Vec<Cell>> = table_rows(records)?;
    let mut workbook: Workbook = Workbook::new();
    let header: Format = Format::new().set_bold();

    {
        let worksheet: &mut Worksheet = workbook.add_worksheet();
        worksheet.set_name(WORKSHEET_NAME)?;

        for (col, name) in (0..).zip(COLUMNS) {
            worksheet.write_string_with_format(0, col, name, &header)?;
        }
        for (row, cells) in (1..).zip(&rows) {
            for (col, cell) in (0..).zip(cells) {
                write_cell(worksheet, row, col, cell)?;
            }
        }
        worksheet.set_freeze_panes(1, 0)?;
    }

    Ok(workbook.save_to_buffer()?)
}
