// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! File output for EPC synchronization runs.
//!
//! [`FileSink`] implements [`OutputSink`](epc_sync::OutputSink) and writes
//! one file per requested format. The renderers are public so callers can
//! produce output in memory as well.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod delimited;
mod error;
mod escape;
mod excel;
mod html;
mod json;
mod rss;
mod sink;
mod table;
mod xml;

#[cfg(test)]
mod tests;

pub use delimited::render_csv;
pub use error::ExportError;
pub use escape::{escape_html, escape_xml};
pub use excel::{WORKSHEET_NAME, render_excel};
pub use html::render_html;
pub use json::render_json;
pub use rss::{CHANNEL_DESCRIPTION, CHANNEL_LINK, CHANNEL_TITLE, render_rss};
pub use sink::{FileSink, render};
pub use table::{COLUMNS, Cell, record_cells, table_rows};
pub use xml::render_xml;
