//! Source fetcher abstraction
//!
//! The trait the transformation core consumes instead of a concrete
//! database client. All methods may fail with a connectivity error
//! (fatal to the run); empty results mean "no data", never an error.

use crate::domain::ids::{EncounterId, FormId, LocationId, PatientId};
use crate::domain::observation::RawObservation;
use crate::domain::patient::RawPatient;
use crate::domain::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Supplies raw source records to the migration coordinator
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetches one patient's demographics, validated into a [`RawPatient`]
    ///
    /// # Errors
    ///
    /// Returns an error on connectivity failure or when the patient does
    /// not exist.
    async fn fetch_patient(&self, patient: &PatientId) -> Result<RawPatient>;

    /// Fetches the encounter ids per patient for one location
    ///
    /// With a non-empty `forms` filter only encounters of those forms
    /// are returned. The map is ordered by patient id so runs process
    /// patients deterministically.
    ///
    /// # Errors
    ///
    /// Returns an error on connectivity failure.
    async fn fetch_encounter_ids(
        &self,
        location: &LocationId,
        forms: &[FormId],
    ) -> Result<BTreeMap<PatientId, Vec<EncounterId>>>;

    /// Fetches the observation rows of one encounter
    ///
    /// # Errors
    ///
    /// Returns an error on connectivity failure.
    async fn fetch_observations(&self, encounter: &EncounterId) -> Result<Vec<RawObservation>>;

    /// Fetches the form id an encounter was captured with
    ///
    /// # Errors
    ///
    /// Returns an error on connectivity failure or when the encounter
    /// does not exist.
    async fn fetch_form_id(&self, encounter: &EncounterId) -> Result<FormId>;

    /// Resolves a form id to its uuid, the alternate mapping-table key
    ///
    /// Returns `Ok(None)` when the form has no uuid or does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on connectivity failure.
    async fn fetch_form_uuid(&self, form: &FormId) -> Result<Option<String>>;

    /// Fetches an encounter's creation timestamp
    ///
    /// # Errors
    ///
    /// Returns an error on connectivity failure or when the encounter
    /// does not exist.
    async fn fetch_encounter_date(&self, encounter: &EncounterId) -> Result<DateTime<Utc>>;
}
