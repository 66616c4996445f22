//! Payload assembly
//!
//! Deterministic combination of one patient's transformed attributes and
//! events into the destination aggregate: a single enrollment wraps the
//! whole encounter set.

use crate::domain::ids::OrgUnitId;
use crate::domain::tracked::{
    Enrollment, TrackedEntityPayload, TransformedAttribute, TransformedEvent,
};
use chrono::NaiveDate;

/// Combines transformed parts into one destination payload
///
/// Events are stamped with the resolved org unit. When no program could
/// be determined (a patient without any mapped encounter and no
/// configured default), the enrollment list stays empty and only the
/// tracked entity with its attributes is emitted.
///
/// `enrollment_date` and `incident_date` both carry the patient
/// record-creation date.
#[allow(clippy::too_many_arguments)]
pub fn combine(
    org_unit: OrgUnitId,
    attributes: Vec<TransformedAttribute>,
    events: Vec<TransformedEvent>,
    program: Option<String>,
    enrollment_date: NaiveDate,
    incident_date: NaiveDate,
    tracked_entity_type: &str,
) -> TrackedEntityPayload {
    let enrollments = match program {
        Some(program) => {
            let events = events
                .into_iter()
                .map(|mut event| {
                    event.org_unit = Some(org_unit.clone());
                    event
                })
                .collect();
            vec![Enrollment {
                org_unit: org_unit.clone(),
                program,
                enrollment_date,
                incident_date,
                events,
            }]
        }
        None => Vec::new(),
    };

    TrackedEntityPayload {
        tracked_entity_type: tracked_entity_type.to_string(),
        org_unit,
        attributes,
        enrollments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tracked::DataValue;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_event() -> TransformedEvent {
        TransformedEvent::new(
            "PRG1",
            "STG1",
            date(2023, 4, 2),
            vec![DataValue::new("DE1", "95")],
        )
    }

    #[test]
    fn test_single_enrollment_wraps_all_events() {
        let payload = combine(
            OrgUnitId::new("OU123").unwrap(),
            vec![TransformedAttribute::new("ATTsex", "Female")],
            vec![sample_event(), sample_event()],
            Some("PRG1".to_string()),
            date(2022, 11, 5),
            date(2022, 11, 5),
            "nEenWmSyUEp",
        );

        assert_eq!(payload.enrollments.len(), 1);
        let enrollment = &payload.enrollments[0];
        assert_eq!(enrollment.events.len(), 2);
        assert_eq!(enrollment.enrollment_date, enrollment.incident_date);
        assert_eq!(enrollment.org_unit.as_str(), "OU123");
    }

    #[test]
    fn test_events_stamped_with_org_unit() {
        let payload = combine(
            OrgUnitId::new("OU123").unwrap(),
            vec![],
            vec![sample_event()],
            Some("PRG1".to_string()),
            date(2022, 11, 5),
            date(2022, 11, 5),
            "nEenWmSyUEp",
        );

        let event = &payload.enrollments[0].events[0];
        assert_eq!(event.org_unit.as_ref().unwrap().as_str(), "OU123");
    }

    #[test]
    fn test_no_program_means_no_enrollment() {
        let payload = combine(
            OrgUnitId::new("OU123").unwrap(),
            vec![TransformedAttribute::new("ATTsex", "Male")],
            vec![],
            None,
            date(2022, 11, 5),
            date(2022, 11, 5),
            "nEenWmSyUEp",
        );

        assert!(payload.enrollments.is_empty());
        assert_eq!(payload.attributes.len(), 1);
    }

    #[test]
    fn test_combine_is_deterministic() {
        let make = || {
            combine(
                OrgUnitId::new("OU123").unwrap(),
                vec![TransformedAttribute::new("ATTsex", "Female")],
                vec![sample_event()],
                Some("PRG1".to_string()),
                date(2022, 11, 5),
                date(2022, 11, 5),
                "nEenWmSyUEp",
            )
        };
        let a = serde_json::to_string(&make()).unwrap();
        let b = serde_json::to_string(&make()).unwrap();
        assert_eq!(a, b);
    }
}
