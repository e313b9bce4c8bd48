// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ExportError;
use epc_sync::OutputRecord;

/// Renders records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn render_json(records: &[OutputRecord]) -> Result<String, ExportError> {
    let mut json: String = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}
