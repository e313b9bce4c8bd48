// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors raised while turning a raw extracted record into a
/// `CertificateRecord`.
///
/// A record that fails normalization is dropped by the caller; the run
/// itself continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A mandatory field is absent or blank.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// The raw field key.
        field: &'static str,
    },
    /// A mandatory field is present but not usable.
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField {
        /// The raw field key.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl DomainError {
    /// Returns the raw field key this error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => field,
        }
    }
}
