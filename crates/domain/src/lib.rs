// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Certificate domain for EPC synchronization.
//!
//! This crate owns the record model and the pure per-record rules:
//! normalization of raw extracted fields, content fingerprinting, expiry
//! classification and data quality checks. Nothing here performs I/O.

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

mod error;
mod expiry;
mod fingerprint;
mod normalize;
mod raw;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use expiry::{ExpiryStatus, classify_expiry, classify_validity, parse_validity_date};
pub use normalize::{clean_text, normalize_record, parse_number, parse_year};
pub use raw::{RawRecord, RawRow, keys};
pub use types::{
    CertificateFields, CertificateId, CertificateRecord, FeatureRating, Fingerprint,
    RecommendedChange,
};
pub use validation::{RecordIssue, rating_band, validate_record};
