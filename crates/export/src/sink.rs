// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::delimited::render_csv;
use crate::error::ExportError;
use crate::excel::render_excel;
use crate::html::render_html;
use crate::json::render_json;
use crate::rss::render_rss;
use crate::xml::render_xml;
use epc_sync::{OutputFormat, OutputRecord, OutputSink, SinkError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tracing::info;

/// Renders records in `format` as the bytes of the output file.
///
/// # Arguments
///
/// * `records` - The annotated records of a run
/// * `format` - The format to render
/// * `generated_at` - Timestamp stamped into formats that carry one (RSS)
///
/// # Errors
///
/// Returns an error if the records cannot be serialized or encoded.
pub fn render(
    records: &[OutputRecord],
    format: OutputFormat,
    generated_at: OffsetDateTime,
) -> Result<Vec<u8>, ExportError> {
    let text: String = match format {
        OutputFormat::Json => render_json(records)?,
        OutputFormat::Csv => render_csv(records)?,
        OutputFormat::Excel => return render_excel(records),
        OutputFormat::Xml => render_xml(records)?,
        OutputFormat::Rss => render_rss(records, generated_at)?,
        OutputFormat::Html => render_html(records)?,
    };
    Ok(text.into_bytes())
}

/// Writes each requested format to `<output_dir>/<base_name>.<ext>`.
///
/// Every file is written to a temporary sibling first and renamed into
/// place, so a reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct FileSink {
    output_dir: PathBuf,
    base_name: String,
    generated_at: OffsetDateTime,
    written: Vec<PathBuf>,
}

impl FileSink {
    /// Creates a sink writing under `output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_name` is empty or contains a path
    /// separator.
    pub fn new(output_dir: impl Into<PathBuf>, base_name: &str) -> Result<Self, ExportError> {
        let base_name: &str = base_name.trim();
        if base_name.is_empty() || base_name.contains(['/', '\\']) || base_name == ".." {
            return Err(ExportError::InvalidName(base_name.to_string()));
        }
        Ok(Self {
            output_dir: output_dir.into(),
            base_name: base_name.to_string(),
            generated_at: OffsetDateTime::now_utc(),
            written: Vec::new(),
        })
    }

    /// Sets the timestamp stamped into generated files.
    #[must_use]
    pub const fn with_generated_at(mut self, generated_at: OffsetDateTime) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// The file a format is written to.
    #[must_use]
    pub fn path_for(&self, format: OutputFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.base_name, format.extension()))
    }

    /// Files written so far, in write order.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn persist(&self, path: &Path, contents: &[u8]) -> Result<(), ExportError> {
        let io = |source: std::io::Error| ExportError::Io {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.output_dir).map_err(io)?;
        let mut file: NamedTempFile = NamedTempFile::new_in(&self.output_dir).map_err(io)?;
        file.write_all(contents).map_err(io)?;
        file.as_file().sync_all().map_err(io)?;
        file.persist(path).map_err(|err| io(err.error))?;
        Ok(())
    }

    fn write_format(
        &mut self,
        records: &[OutputRecord],
        format: OutputFormat,
    ) -> Result<PathBuf, ExportError> {
        let contents: Vec<u8> = render(records, format, self.generated_at)?;
        let path: PathBuf = self.path_for(format);
        self.persist(&path, &contents)?;
        self.written.push(path.clone());
        Ok(path)
    }
}

impl OutputSink for FileSink {
    fn write(&mut self, records: &[OutputRecord], format: OutputFormat) -> Result<(), SinkError> {
        let path: PathBuf = self
            .write_format(records, format)
            .map_err(|err| SinkError::new(format, err.to_string()))?;
        info!(
            format = %format,
            path = %path.display(),
            records = records.len(),
            "Wrote output"
        );
        Ok(())
    }
}
