//! Destination payload domain model
//!
//! The DHIS2-shaped aggregate produced for one source patient: a tracked
//! entity with its attributes and a single enrollment wrapping the events
//! transformed from the patient's encounters. Field names serialize in
//! the camelCase form the tracker API expects. One payload is written per
//! patient per run and never mutated afterwards; a re-run overwrites it
//! wholesale.

use super::ids::OrgUnitId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One mapped tracked-entity attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedAttribute {
    /// Destination attribute id
    pub attribute: String,

    /// Normalized, mapped value
    pub value: String,
}

impl TransformedAttribute {
    /// Creates a new TransformedAttribute
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// One mapped event data value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValue {
    /// Destination data element id
    #[serde(rename = "dataElement")]
    pub data_element: String,

    /// Mapped (and possibly recoded) value
    pub value: String,
}

impl DataValue {
    /// Creates a new DataValue
    pub fn new(data_element: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            data_element: data_element.into(),
            value: value.into(),
        }
    }
}

/// Event status in the destination system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    /// Event is still being captured
    Active,
    /// Event is complete; migrated events are always submitted complete
    Completed,
}

impl Default for EventStatus {
    fn default() -> Self {
        Self::Completed
    }
}

/// One destination event, transformed from a source encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformedEvent {
    /// Destination program id, from the form mapping
    pub program: String,

    /// Destination program stage id, from the form mapping
    #[serde(rename = "programStage")]
    pub program_stage: String,

    /// Org unit, filled in when the event is combined into a payload
    #[serde(rename = "orgUnit", skip_serializing_if = "Option::is_none")]
    pub org_unit: Option<OrgUnitId>,

    /// Event date: the source encounter's creation date, calendar-day only
    #[serde(rename = "eventDate")]
    pub event_date: NaiveDate,

    /// Submission status
    pub status: EventStatus,

    /// Destination entity reference, attached at submission time
    #[serde(
        rename = "trackedEntityInstance",
        skip_serializing_if = "Option::is_none"
    )]
    pub tracked_entity_instance: Option<String>,

    /// Mapped data values
    #[serde(rename = "dataValues")]
    pub data_values: Vec<DataValue>,
}

impl TransformedEvent {
    /// Creates a new event for a program stage
    pub fn new(
        program: impl Into<String>,
        program_stage: impl Into<String>,
        event_date: NaiveDate,
        data_values: Vec<DataValue>,
    ) -> Self {
        Self {
            program: program.into(),
            program_stage: program_stage.into(),
            org_unit: None,
            event_date,
            status: EventStatus::Completed,
            tracked_entity_instance: None,
            data_values,
        }
    }
}

/// One enrollment wrapping the patient's full encounter set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    /// Org unit the enrollment is filed under
    #[serde(rename = "orgUnit")]
    pub org_unit: OrgUnitId,

    /// Destination program id
    pub program: String,

    /// Enrollment date (the patient record's creation date)
    #[serde(rename = "enrollmentDate")]
    pub enrollment_date: NaiveDate,

    /// Incident date (same source as the enrollment date)
    #[serde(rename = "incidentDate")]
    pub incident_date: NaiveDate,

    /// Events for every transformed encounter
    pub events: Vec<TransformedEvent>,
}

/// The full destination aggregate for one source patient
///
/// # Examples
///
/// ```
/// use transit::domain::ids::OrgUnitId;
/// use transit::domain::tracked::{TrackedEntityPayloadBuilder, TransformedAttribute};
///
/// let payload = TrackedEntityPayloadBuilder::new()
///     .tracked_entity_type("nEenWmSyUEp")
///     .org_unit(OrgUnitId::new("OU123").unwrap())
///     .attribute(TransformedAttribute::new("ATTsex", "Female"))
///     .build()
///     .unwrap();
///
/// assert_eq!(payload.attributes.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedEntityPayload {
    /// Destination tracked entity type id
    #[serde(rename = "trackedEntityType")]
    pub tracked_entity_type: String,

    /// Org unit resolved through the location mapping table
    #[serde(rename = "orgUnit")]
    pub org_unit: OrgUnitId,

    /// Mapped attributes
    pub attributes: Vec<TransformedAttribute>,

    /// Enrollments (one per run; empty when no program could be determined)
    pub enrollments: Vec<Enrollment>,
}

impl TrackedEntityPayload {
    /// Creates a new builder for constructing a TrackedEntityPayload
    pub fn builder() -> TrackedEntityPayloadBuilder {
        TrackedEntityPayloadBuilder::default()
    }
}

/// Builder for constructing TrackedEntityPayload instances
#[derive(Debug, Default)]
pub struct TrackedEntityPayloadBuilder {
    tracked_entity_type: Option<String>,
    org_unit: Option<OrgUnitId>,
    attributes: Vec<TransformedAttribute>,
    enrollments: Vec<Enrollment>,
}

impl TrackedEntityPayloadBuilder {
    /// Creates a new TrackedEntityPayloadBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tracked entity type
    pub fn tracked_entity_type(mut self, tet: impl Into<String>) -> Self {
        self.tracked_entity_type = Some(tet.into());
        self
    }

    /// Sets the org unit
    pub fn org_unit(mut self, org_unit: OrgUnitId) -> Self {
        self.org_unit = Some(org_unit);
        self
    }

    /// Adds one attribute
    pub fn attribute(mut self, attribute: TransformedAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Sets the full attribute list
    pub fn attributes(mut self, attributes: Vec<TransformedAttribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Adds one enrollment
    pub fn enrollment(mut self, enrollment: Enrollment) -> Self {
        self.enrollments.push(enrollment);
        self
    }

    /// Builds the TrackedEntityPayload
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing
    pub fn build(self) -> Result<TrackedEntityPayload, String> {
        Ok(TrackedEntityPayload {
            tracked_entity_type: self
                .tracked_entity_type
                .ok_or("tracked_entity_type is required")?,
            org_unit: self.org_unit.ok_or("org_unit is required")?,
            attributes: self.attributes,
            enrollments: self.enrollments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_attribute_serialization_shape() {
        let attr = TransformedAttribute::new("ATTsex", "Female");
        let json = serde_json::to_value(&attr).unwrap();
        assert_eq!(json["attribute"], "ATTsex");
        assert_eq!(json["value"], "Female");
    }

    #[test]
    fn test_event_serialization_camel_case() {
        let mut event = TransformedEvent::new(
            "PRG1",
            "STG1",
            date(2023, 4, 2),
            vec![DataValue::new("DE1", "120")],
        );
        event.org_unit = Some(OrgUnitId::new("OU123").unwrap());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["programStage"], "STG1");
        assert_eq!(json["orgUnit"], "OU123");
        assert_eq!(json["eventDate"], "2023-04-02");
        assert_eq!(json["status"], "COMPLETED");
        assert_eq!(json["dataValues"][0]["dataElement"], "DE1");
        // Entity reference is only attached at submission time
        assert!(json.get("trackedEntityInstance").is_none());
    }

    #[test]
    fn test_payload_builder_missing_field() {
        let result = TrackedEntityPayloadBuilder::new()
            .tracked_entity_type("nEenWmSyUEp")
            .build();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("org_unit is required"));
    }

    #[test]
    fn test_payload_round_trip() {
        let payload = TrackedEntityPayloadBuilder::new()
            .tracked_entity_type("nEenWmSyUEp")
            .org_unit(OrgUnitId::new("OU123").unwrap())
            .attribute(TransformedAttribute::new("ATTsex", "Female"))
            .enrollment(Enrollment {
                org_unit: OrgUnitId::new("OU123").unwrap(),
                program: "PRG1".to_string(),
                enrollment_date: date(2022, 11, 5),
                incident_date: date(2022, 11, 5),
                events: vec![],
            })
            .build()
            .unwrap();

        let json = serde_json::to_string(&payload).unwrap();
        let back: TrackedEntityPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.org_unit.as_str(), "OU123");
        assert_eq!(back.enrollments[0].enrollment_date, date(2022, 11, 5));
        assert!(json.contains("\"trackedEntityType\""));
        assert!(json.contains("\"enrollmentDate\""));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let build = || {
            TrackedEntityPayloadBuilder::new()
                .tracked_entity_type("nEenWmSyUEp")
                .org_unit(OrgUnitId::new("OU123").unwrap())
                .attribute(TransformedAttribute::new("ATTsex", "Female"))
                .attribute(TransformedAttribute::new("ATTcountry", "RW"))
                .build()
                .unwrap()
        };
        let a = serde_json::to_string(&build()).unwrap();
        let b = serde_json::to_string(&build()).unwrap();
        assert_eq!(a, b);
    }
}
