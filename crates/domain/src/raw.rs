// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

/// A table row as extracted from a page, keyed by column name.
pub type RawRow = BTreeMap<String, String>;

/// Field keys shared by extractors and the normalizer.
pub mod keys {
    pub const ID: &str = "id";
    pub const URL: &str = "url";
    pub const POST_CODE: &str = "postCode";
    pub const LOCALITY: &str = "locality";
    pub const ADDRESS: &str = "address";
    pub const RATING: &str = "rating";
    pub const PROPERTY_TYPE: &str = "propertyType";
    pub const FLOOR_AREA: &str = "floorArea";
    pub const CURRENT_SCORE: &str = "currentScore";
    pub const POTENTIAL_SCORE: &str = "potentialScore";
    pub const PRIMARY_USAGE: &str = "primaryUsage";
    pub const AVERAGE_BILL: &str = "averageBill";
    pub const POTENTIAL_SAVING: &str = "potentialSaving";
    pub const AVERAGE_COST_YEAR: &str = "averageCostYear";
    pub const CO2_PRODUCES: &str = "co2Produces";
    pub const CO2_POTENTIAL: &str = "co2Potential";
    pub const ASSESSOR_NAME: &str = "assessorName";
    pub const ASSESSOR_PHONE: &str = "assessorPhone";
    pub const ASSESSOR_EMAIL: &str = "assessorEmail";
    pub const ACCREDITATION_SCHEME: &str = "accreditationScheme";
    pub const ACCREDITATION_ASSESSOR_ID: &str = "accreditationAssessorID";
    pub const ACCREDITATION_PHONE: &str = "accreditationPhone";
    pub const ACCREDITATION_EMAIL: &str = "accreditationEmail";
    pub const ASSESSMENT_DATE: &str = "assessmentDate";
    pub const CERTIFICATE_DATE: &str = "certificateDate";
    pub const ASSESSMENT_TYPE: &str = "assessmentType";
    pub const VALIDTILL_DATE: &str = "validtillDate";

    // Feature table columns.
    pub const FEATURE_NAME: &str = "name";
    pub const FEATURE_DESCRIPTION: &str = "description";
    pub const FEATURE_RATING: &str = "rating";

    // Recommended change columns.
    pub const CHANGE_NAME: &str = "name";
    pub const CHANGE_INSTALLATION_COST: &str = "installationCost";
    pub const CHANGE_YEARLY_SAVING: &str = "yearlySaving";
    pub const CHANGE_POTENTIAL_RATING: &str = "potentialRating";
}

/// Field values for one certificate exactly as an extractor produced them.
///
/// Nothing here is validated; values may be missing, blank or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Scalar fields keyed by the names in [`keys`].
    pub fields: BTreeMap<String, String>,
    /// Feature table rows in page order.
    pub features: Vec<RawRow>,
    /// Recommended change rows in page order.
    pub changes: Vec<RawRow>,
}

impl RawRecord {
    /// Creates an empty raw record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a scalar field, replacing any earlier value.
    #[must_use]
    pub fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Sets a scalar field in place.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.fields.insert(key.to_string(), value.into());
    }

    /// Returns a scalar field, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}
