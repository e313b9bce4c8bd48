// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::fingerprint::fingerprint_fields;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use time::OffsetDateTime;

/// Stable external identifier of a certificate.
///
/// Taken from the certificate URL path. Never empty and never contains
/// whitespace.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CertificateId(String);

impl CertificateId {
    /// Parses a certificate identifier.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw identifier, surrounding whitespace is ignored
    ///
    /// # Errors
    ///
    /// Returns an error if the value is blank or contains whitespace.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::MissingField { field: "id" });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidField {
                field: "id",
                reason: format!("identifier '{trimmed}' contains whitespace"),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CertificateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CertificateId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CertificateId> for String {
    fn from(id: CertificateId) -> Self {
        id.0
    }
}

/// Deterministic content digest of a record's mutable fields.
///
/// Lowercase hex SHA-256. Two fingerprints are only ever compared for the
/// same `CertificateId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub(crate) const fn from_hex(hex: String) -> Self {
        Self(hex)
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the certificate's feature table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRating {
    /// Feature name (e.g. "Wall").
    pub name: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Rating text (e.g. "Good").
    pub rating: Option<String>,
}

/// One recommended improvement from the certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedChange {
    /// Name of the measure.
    pub name: Option<String>,
    /// Typical installation cost, as printed.
    pub installation_cost: Option<String>,
    /// Typical yearly saving, as printed.
    pub yearly_saving: Option<String>,
    /// Rating after the measure, as printed.
    pub potential_rating: Option<String>,
}

/// The mutable content of a certificate.
///
/// Everything in here participates in the fingerprint. Identity (`id`,
/// `url`) and run metadata (`fetchedAt`, expiry) live outside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateFields {
    pub post_code: Option<String>,
    pub locality: Option<String>,
    pub address: Option<String>,
    pub rating: Option<String>,
    pub property_type: Option<String>,
    pub floor_area: Option<String>,
    pub current_score: Option<String>,
    pub potential_score: Option<String>,
    pub primary_usage: Option<f64>,
    pub average_bill: Option<f64>,
    pub potential_saving: Option<f64>,
    pub average_cost_year: Option<i32>,
    pub co2_produces: Option<f64>,
    pub co2_potential: Option<f64>,
    /// Feature table in source presentation order.
    pub features: Vec<FeatureRating>,
    /// Recommended changes in source presentation order.
    pub changes: Vec<RecommendedChange>,
    pub assessor_name: Option<String>,
    pub assessor_phone: Option<String>,
    pub assessor_email: Option<String>,
    pub accreditation_scheme: Option<String>,
    #[serde(rename = "accreditationAssessorID")]
    pub accreditation_assessor_id: Option<String>,
    pub accreditation_phone: Option<String>,
    pub accreditation_email: Option<String>,
    pub assessment_date: Option<String>,
    pub certificate_date: Option<String>,
    pub assessment_type: Option<String>,
    /// Printed expiry date. Parsed by the expiry classifier, kept verbatim here.
    pub validtill_date: Option<String>,
    /// Raw text of typed fields that were present but did not parse, keyed
    /// by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unparsed_fields: BTreeMap<String, String>,
}

impl CertificateFields {
    /// Lists the serialized names of the fields whose values differ from
    /// `previous`.
    ///
    /// Names are returned sorted.
    #[must_use]
    pub fn changed_fields(&self, previous: &Self) -> Vec<String> {
        let (Ok(serde_json::Value::Object(current)), Ok(serde_json::Value::Object(prior))) =
            (serde_json::to_value(self), serde_json::to_value(previous))
        else {
            return Vec::new();
        };

        current
            .keys()
            .chain(prior.keys())
            .filter(|name| current.get(*name) != prior.get(*name))
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }
}

/// A normalized energy performance certificate.
///
/// Construct through `normalize_record` or `CertificateRecord::new`; the
/// fingerprint is computed at construction and cannot drift from the content
/// because the content is not mutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    id: CertificateId,
    url: String,
    #[serde(flatten)]
    fields: CertificateFields,
    fingerprint: Fingerprint,
    #[serde(with = "time::serde::rfc3339")]
    fetched_at: OffsetDateTime,
}

impl CertificateRecord {
    /// Creates a record and computes its fingerprint.
    ///
    /// # Arguments
    ///
    /// * `id` - The certificate identifier
    /// * `url` - The certificate page URL
    /// * `fields` - The mutable certificate content
    /// * `fetched_at` - Timestamp of the run that observed the record
    #[must_use]
    pub fn new(
        id: CertificateId,
        url: String,
        fields: CertificateFields,
        fetched_at: OffsetDateTime,
    ) -> Self {
        let fingerprint: Fingerprint = fingerprint_fields(&fields);
        Self {
            id,
            url,
            fields,
            fingerprint,
            fetched_at,
        }
    }

    /// Creates an empty placeholder for a certificate that disappeared from
    /// the source.
    #[must_use]
    pub fn tombstone(id: CertificateId, url: String, fetched_at: OffsetDateTime) -> Self {
        Self::new(id, url, CertificateFields::default(), fetched_at)
    }

    #[must_use]
    pub const fn id(&self) -> &CertificateId {
        &self.id
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn fields(&self) -> &CertificateFields {
        &self.fields
    }

    #[must_use]
    pub const fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    #[must_use]
    pub const fn fetched_at(&self) -> OffsetDateTime {
        self.fetched_at
    }

    /// Names of the raw fields whose text could not be parsed into their
    /// typed form, sorted.
    #[must_use]
    pub fn unparsed_fields(&self) -> Vec<&str> {
        self.fields.unparsed_fields.keys().map(String::as_str).collect()
    }
}
