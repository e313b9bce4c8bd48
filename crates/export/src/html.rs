// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ExportError;
use crate::escape::escape_html;
use crate::table::{COLUMNS, table_rows};
use epc_sync::OutputRecord;
use std::fmt::Write;

const STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;margin:20px;}\
table{border-collapse:collapse;width:100%;}\
th,td{border:1px solid #ccc;padding:6px;font-size:13px;}\
th{background:#f4f4f4;}\
tr.removed td{color:#888;text-decoration:line-through;}";

/// Renders records as a standalone HTML page holding one table.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn render_html(records: &[OutputRecord]) -> Result<String, ExportError> {
    let mut html: String = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>EPC Results</title>\n");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n<h1>EPC Results</h1>\n");

    if records.is_empty() {
        html.push_str("<p>No records.</p>\n");
    } else {
        html.push_str("<table>\n<thead><tr>");
        for column in COLUMNS {
            let _ = write!(html, "<th>{}</th>", escape_html(column));
        }
        html.push_str("</tr></thead>\n<tbody>\n");

        for (output, row) in records.iter().zip(table_rows(records)?) {
            if output.removed {
                html.push_str("<tr class=\"removed\">");
            } else {
                html.push_str("<tr>");
            }
            for cell in &row {
                let _ = write!(html, "<td>{}</td>", escape_html(&cell.text()));
            }
            html.push_str("</tr>\n");
        }

        html.push_str("</tbody>\n</table>\n");
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}
