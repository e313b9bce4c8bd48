// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Content fingerprinting.
//!
//! The fingerprint is the SHA-256 digest of the canonical JSON encoding of
//! [`CertificateFields`]: struct fields in declaration order, map entries
//! sorted by key, absent values as `null`. Identity and run metadata live
//! outside that struct, so they never change it.

use crate::types::{CertificateFields, Fingerprint};
use sha2::{Digest, Sha256};

/// Canonical JSON bytes of a record's content.
fn canonical_json(fields: &CertificateFields) -> Vec<u8> {
    // Plain data with string map keys always serializes.
    serde_json::to_vec(fields).unwrap_or_default()
}

/// Computes the fingerprint of a record's mutable content.
pub(crate) fn fingerprint_fields(fields: &CertificateFields) -> Fingerprint {
    Fingerprint::from_hex(hex::encode(Sha256::digest(canonical_json(fields))))
}
