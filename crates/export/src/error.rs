// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rendering or writing output files.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output base name cannot be used as a file name.
    #[error("invalid output base name '{0}'")]
    InvalidName(String),
    #[error("failed to serialize records: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to encode CSV: {0}")]
    Csv(String),
    #[error("failed to build workbook: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl<W> From<csv::IntoInnerError<W>> for ExportError {
    fn from(err: csv::IntoInnerError<W>) -> Self {
        Self::Csv(err.error().to_string())
    }
}
