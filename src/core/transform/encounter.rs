//! Encounter transformation
//!
//! Turns one encounter's observation set into a destination event using
//! the form's observation mapping. Mapping tables are intentionally
//! partial: observations without a destination mapping are dropped
//! silently, never treated as errors.

use crate::core::mapping::{FormMapping, RecodeCatalog};
use crate::domain::observation::RawObservation;
use crate::domain::tracked::{DataValue, TransformedEvent};
use chrono::{DateTime, Utc};

/// Transforms one encounter's observations into an event
///
/// For each observation the single effective value is selected by
/// precedence (numeric, coded, text, datetime), the concept is looked up
/// in the form's observation mapping, and any recoding rule for the
/// destination data element is applied. The event date is the
/// encounter's creation timestamp as a plain calendar date.
///
/// Total for well-formed inputs: unmapped concepts and all-null values
/// reduce the data value list, never fail the call.
pub fn transform_encounter(
    observations: &[RawObservation],
    form_mapping: &FormMapping,
    encounter_date: DateTime<Utc>,
    recode: &RecodeCatalog,
) -> TransformedEvent {
    let mut data_values = Vec::with_capacity(observations.len());

    for obs in observations {
        let Some(value) = obs.value.effective() else {
            tracing::trace!(obs_id = obs.id, "Observation has no value, skipped");
            continue;
        };

        let Some(data_element) = form_mapping.observation(obs.concept.as_str()) else {
            tracing::trace!(
                obs_id = obs.id,
                concept = %obs.concept,
                "No data element mapping for concept, dropped"
            );
            continue;
        };

        let value = recode.apply(data_element, &value);
        data_values.push(DataValue::new(data_element, value));
    }

    TransformedEvent::new(
        form_mapping.program.as_str(),
        form_mapping.program_stage.as_str(),
        encounter_date.date_naive(),
        data_values,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::{ConceptId, EncounterId};
    use crate::domain::observation::ObsValue;
    use crate::domain::tracked::EventStatus;
    use chrono::TimeZone;

    fn form_mapping(entries: &[(&str, &str)]) -> FormMapping {
        FormMapping {
            program: "PRG1".to_string(),
            program_stage: "STG1".to_string(),
            observations: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn obs(id: i64, concept: &str, value: ObsValue) -> RawObservation {
        RawObservation::new(
            id,
            EncounterId::new(7),
            ConceptId::new(concept).unwrap(),
            value,
        )
    }

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 4, 2, 14, 5, 0).unwrap()
    }

    #[test]
    fn test_event_carries_form_program_and_plain_date() {
        let event = transform_encounter(&[], &form_mapping(&[]), when(), &RecodeCatalog::default());
        assert_eq!(event.program, "PRG1");
        assert_eq!(event.program_stage, "STG1");
        assert_eq!(event.event_date.to_string(), "2023-04-02");
        assert_eq!(event.status, EventStatus::Completed);
        assert!(event.data_values.is_empty());
    }

    #[test]
    fn test_mapped_observation_produces_data_value() {
        let mapping = form_mapping(&[("887AAAA", "deGlucose")]);
        let observations = vec![obs(
            1,
            "887AAAA",
            ObsValue {
                numeric: Some(95.0),
                ..Default::default()
            },
        )];

        let event =
            transform_encounter(&observations, &mapping, when(), &RecodeCatalog::default());
        assert_eq!(event.data_values.len(), 1);
        assert_eq!(event.data_values[0].data_element, "deGlucose");
        assert_eq!(event.data_values[0].value, "95");
    }

    #[test]
    fn test_unmapped_concept_dropped_silently() {
        let mapping = form_mapping(&[("887AAAA", "deGlucose")]);
        let observations = vec![obs(
            1,
            "X",
            ObsValue {
                text: Some("anything".to_string()),
                ..Default::default()
            },
        )];

        let event =
            transform_encounter(&observations, &mapping, when(), &RecodeCatalog::default());
        assert!(event.data_values.is_empty());
    }

    #[test]
    fn test_numeric_precedence_over_coded() {
        let mapping = form_mapping(&[("887AAAA", "deGlucose")]);
        let observations = vec![obs(
            1,
            "887AAAA",
            ObsValue {
                numeric: Some(13467.0),
                coded: Some("1385AAAA".to_string()),
                ..Default::default()
            },
        )];

        let event =
            transform_encounter(&observations, &mapping, when(), &RecodeCatalog::default());
        assert_eq!(event.data_values[0].value, "13467");
    }

    #[test]
    fn test_recode_catalog_applied_after_mapping() {
        let mapping = form_mapping(&[("887AAAA", "deTestType")]);
        let catalog: RecodeCatalog = serde_json::from_value(serde_json::json!({
            "deTestType": {"13467": "random", "6689": "fasting"}
        }))
        .unwrap();

        let observations = vec![obs(
            1,
            "887AAAA",
            ObsValue {
                numeric: Some(13467.0),
                ..Default::default()
            },
        )];

        let event = transform_encounter(&observations, &mapping, when(), &catalog);
        assert_eq!(event.data_values[0].value, "random");
    }

    #[test]
    fn test_valueless_observation_skipped() {
        let mapping = form_mapping(&[("887AAAA", "deGlucose")]);
        let observations = vec![obs(1, "887AAAA", ObsValue::default())];

        let event =
            transform_encounter(&observations, &mapping, when(), &RecodeCatalog::default());
        assert!(event.data_values.is_empty());
    }
}
