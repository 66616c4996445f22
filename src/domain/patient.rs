//! Raw patient domain model
//!
//! Demographic data for one source patient, validated at the fetcher
//! boundary so the transformation engine never handles missing-key
//! errors internally.

use super::ids::PatientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized source field names
///
/// The fetcher maps source columns onto these names; the attribute
/// mapping table and the normalization rules key on them.
pub mod fields {
    pub const GIVEN_NAME: &str = "given_name";
    pub const MIDDLE_NAME: &str = "middle_name";
    pub const FAMILY_NAME: &str = "family_name";
    pub const GENDER: &str = "gender";
    pub const BIRTHDATE: &str = "birthdate";
    pub const NATIONAL_ID: &str = "national_id";
    pub const COUNTRY: &str = "country";
    pub const CITIZENSHIP: &str = "citizenship";
    pub const STATE_PROVINCE: &str = "state_province";
    pub const COUNTY_DISTRICT: &str = "county_district";
    pub const CITY_VILLAGE: &str = "city_village";
    pub const ADDRESS: &str = "address";
}

/// One source patient's demographic record
///
/// Attributes are keyed by the normalized field names in [`fields`].
/// A `None` value means the source column was NULL; the engine treats
/// both missing keys and `None` values as "no data". The map is ordered
/// so repeated transformation of the same patient is byte-identical.
///
/// # Examples
///
/// ```
/// use transit::domain::patient::{fields, RawPatientBuilder};
/// use transit::domain::ids::PatientId;
/// use chrono::Utc;
///
/// let patient = RawPatientBuilder::new()
///     .id(PatientId::new(42))
///     .date_created(Utc::now())
///     .attribute(fields::GENDER, Some("F".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(patient.attribute(fields::GENDER), Some("F"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPatient {
    /// Source patient id
    pub id: PatientId,

    /// Demographic attributes keyed by normalized field name
    pub attributes: BTreeMap<String, Option<String>>,

    /// When the patient record was created in the source system
    pub date_created: DateTime<Utc>,
}

impl RawPatient {
    /// Creates a new builder for constructing a RawPatient
    pub fn builder() -> RawPatientBuilder {
        RawPatientBuilder::default()
    }

    /// Returns the non-null value of an attribute, if present
    ///
    /// Empty and whitespace-only values are treated as absent, the same
    /// as a NULL source column.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Builder for constructing RawPatient instances
#[derive(Debug, Default)]
pub struct RawPatientBuilder {
    id: Option<PatientId>,
    attributes: BTreeMap<String, Option<String>>,
    date_created: Option<DateTime<Utc>>,
}

impl RawPatientBuilder {
    /// Creates a new RawPatientBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the patient id
    pub fn id(mut self, id: PatientId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets when the patient record was created
    pub fn date_created(mut self, date_created: DateTime<Utc>) -> Self {
        self.date_created = Some(date_created);
        self
    }

    /// Adds one attribute under a normalized field name
    pub fn attribute(mut self, name: impl Into<String>, value: Option<String>) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Builds the RawPatient
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing
    pub fn build(self) -> Result<RawPatient, String> {
        Ok(RawPatient {
            id: self.id.ok_or("id is required")?,
            attributes: self.attributes,
            date_created: self.date_created.ok_or("date_created is required")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawPatient {
        RawPatientBuilder::new()
            .id(PatientId::new(42))
            .date_created(Utc::now())
            .attribute(fields::GENDER, Some("F".to_string()))
            .attribute(fields::COUNTRY, Some("Rwanda".to_string()))
            .attribute(fields::MIDDLE_NAME, None)
            .attribute(fields::CITY_VILLAGE, Some("   ".to_string()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_attribute_lookup() {
        let patient = sample();
        assert_eq!(patient.attribute(fields::GENDER), Some("F"));
        assert_eq!(patient.attribute(fields::COUNTRY), Some("Rwanda"));
    }

    #[test]
    fn test_null_and_blank_attributes_absent() {
        let patient = sample();
        assert_eq!(patient.attribute(fields::MIDDLE_NAME), None);
        assert_eq!(patient.attribute(fields::CITY_VILLAGE), None);
        assert_eq!(patient.attribute(fields::FAMILY_NAME), None);
    }

    #[test]
    fn test_builder_missing_field() {
        let result = RawPatientBuilder::new().id(PatientId::new(1)).build();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("date_created is required"));
    }

    #[test]
    fn test_attribute_values_trimmed() {
        let patient = RawPatientBuilder::new()
            .id(PatientId::new(7))
            .date_created(Utc::now())
            .attribute(fields::GIVEN_NAME, Some("  Alice ".to_string()))
            .build()
            .unwrap();
        assert_eq!(patient.attribute(fields::GIVEN_NAME), Some("Alice"));
    }
}
