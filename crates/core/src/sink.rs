// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::config::OutputFormat;
use crate::output::OutputRecord;
use thiserror::Error;

/// Failure reported by an [`OutputSink`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to write {format} output: {reason}")]
pub struct SinkError {
    /// The format being written.
    pub format: OutputFormat,
    /// Description of the failure.
    pub reason: String,
}

impl SinkError {
    /// Creates a sink error for `format`.
    #[must_use]
    pub fn new(format: OutputFormat, reason: impl Into<String>) -> Self {
        Self {
            format,
            reason: reason.into(),
        }
    }
}

/// Destination for the annotated records of a run.
///
/// Each record carries its reconciliation annotation, so a sink only has to
/// render. The engine calls `write` once per requested format, in order.
pub trait OutputSink {
    /// Writes the run's records in `format`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be produced. A failed write
    /// aborts the run before state is saved.
    fn write(&mut self, records: &[OutputRecord], format: OutputFormat) -> Result<(), SinkError>;
}
