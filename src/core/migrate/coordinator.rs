//! Migration coordinator - the unit-of-work orchestration loop
//!
//! Drives one run over a location scope: fetch the patient/encounter
//! map, subtract already-processed patients, then transform, persist and
//! record each remaining patient one at a time. Failures inside a unit
//! are caught here, logged with the unit id and the stage reached, and
//! never abort the batch; source connectivity failures do.

use crate::adapters::openmrs::SourceFetcher;
use crate::core::ledger::ProgressLedger;
use crate::core::mapping::FormMapping;
use crate::core::migrate::context::MigrationContext;
use crate::core::migrate::summary::MigrationSummary;
use crate::core::migrate::unit::UnitStage;
use crate::core::outbox::UnitOutbox;
use crate::core::transform::{combine, transform_encounter, transform_patient};
use crate::domain::ids::{EncounterId, FormId, PatientId};
use crate::domain::tracked::TrackedEntityPayload;
use crate::domain::{ResolutionError, Result};
use crate::log_unit_failed;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

/// Coordinates one migration run
pub struct MigrationCoordinator {
    fetcher: Arc<dyn SourceFetcher>,
    ctx: MigrationContext,
    ledger: ProgressLedger,
    outbox: UnitOutbox,
    form_filter: Vec<FormId>,
    unit_limit: Option<usize>,
}

impl MigrationCoordinator {
    /// Creates a new coordinator for one location scope
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        ctx: MigrationContext,
        ledger: ProgressLedger,
        outbox: UnitOutbox,
    ) -> Self {
        Self {
            fetcher,
            ctx,
            ledger,
            outbox,
            form_filter: Vec::new(),
            unit_limit: None,
        }
    }

    /// Restricts the fetch to encounters of specific forms
    pub fn with_form_filter(mut self, forms: Vec<FormId>) -> Self {
        self.form_filter = forms;
        self
    }

    /// Caps how many units a single run processes
    pub fn with_unit_limit(mut self, limit: Option<usize>) -> Self {
        self.unit_limit = limit;
        self
    }

    /// Executes the run
    ///
    /// With `from_scratch` the location's ledger entry is cleared before
    /// any work; otherwise previously recorded patients are skipped
    /// (resume semantics: fetched ids minus recorded ids).
    ///
    /// # Errors
    ///
    /// Returns an error on source connectivity failures and on
    /// ledger/outbox write failures. Per-unit resolution and mapping
    /// failures are recorded in the summary instead.
    pub async fn run(&mut self, from_scratch: bool) -> Result<MigrationSummary> {
        let start = Instant::now();
        let scope = self.ctx.location.as_str().to_string();
        let mut summary = MigrationSummary::new(scope.clone());

        if from_scratch {
            tracing::info!(location = %scope, "Starting from scratch, clearing progress");
            self.ledger.reset(&scope)?;
        }

        let encounter_map = self
            .fetcher
            .fetch_encounter_ids(&self.ctx.location, &self.form_filter)
            .await?;
        summary.total_patients = encounter_map.len();

        let recorded: HashSet<i64> = self
            .ledger
            .get(&scope)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default();

        tracing::info!(
            location = %scope,
            patients = encounter_map.len(),
            already_processed = recorded.len(),
            "Starting migration run"
        );

        let mut attempted = 0usize;
        for (patient_id, encounters) in &encounter_map {
            if recorded.contains(&patient_id.as_i64()) {
                summary.already_processed += 1;
                continue;
            }

            if let Some(limit) = self.unit_limit {
                if attempted >= limit {
                    summary.deferred += 1;
                    continue;
                }
            }
            attempted += 1;

            let mut stage = UnitStage::Fetched;
            match self.process_patient(patient_id, encounters, &mut stage).await {
                Ok(payload) => {
                    self.outbox.write(patient_id, &payload)?;
                    stage = UnitStage::Persisted;
                    self.ledger.update(&scope, &[patient_id.as_i64()], false)?;
                    summary.transformed += 1;
                    tracing::debug!(patient_id = %patient_id, stage = %stage, "Unit completed");
                }
                Err(e) if e.is_unit_scoped() => {
                    log_unit_failed!(patient_id, stage, e);
                    summary.record_failure(*patient_id, stage, e.to_string());
                }
                Err(e) => {
                    tracing::error!(
                        patient_id = %patient_id,
                        error = %e,
                        "Run-level failure, aborting"
                    );
                    return Err(e);
                }
            }
        }

        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Processes one patient through the unit state machine
    async fn process_patient(
        &self,
        patient_id: &PatientId,
        encounters: &[EncounterId],
        stage: &mut UnitStage,
    ) -> Result<TrackedEntityPayload> {
        let patient = self.fetcher.fetch_patient(patient_id).await?;

        let (org_unit, attributes) = transform_patient(&patient, &self.ctx)?;
        *stage = UnitStage::AttributesMapped;

        let recode = self.ctx.mappings.recode_catalog()?;
        let mut events = Vec::with_capacity(encounters.len());
        let mut program = None;
        for encounter in encounters {
            let form_id = self.fetcher.fetch_form_id(encounter).await?;
            let mapping = self.form_mapping(&form_id).await?;
            let observations = self.fetcher.fetch_observations(encounter).await?;
            let encounter_date = self.fetcher.fetch_encounter_date(encounter).await?;

            let event = transform_encounter(&observations, &mapping, encounter_date, &recode);
            if program.is_none() {
                program = Some(mapping.program.clone());
            }
            events.push(event);
        }
        *stage = UnitStage::EventsMapped;

        let program = program.or_else(|| self.ctx.default_program.clone());
        let enrollment_date = patient.date_created.date_naive();
        let payload = combine(
            org_unit,
            attributes,
            events,
            program,
            enrollment_date,
            enrollment_date,
            &self.ctx.tracked_entity_type,
        );
        *stage = UnitStage::Combined;

        Ok(payload)
    }

    /// Resolves a form mapping by id, then by uuid alias
    ///
    /// Mapping tables may be keyed by the numeric form id or by the form
    /// uuid; only when neither addresses a document is the form declared
    /// unmappable (fatal to the unit, not the run).
    async fn form_mapping(&self, form_id: &FormId) -> Result<Arc<FormMapping>> {
        if let Some(mapping) = self.ctx.mappings.load_form(form_id.as_str())? {
            return Ok(mapping);
        }

        if let Some(uuid) = self.fetcher.fetch_form_uuid(form_id).await? {
            if let Some(mapping) = self.ctx.mappings.load_form(&uuid)? {
                tracing::debug!(form = %form_id, uuid = %uuid, "Form mapping resolved by uuid");
                self.ctx.mappings.alias_form(form_id.as_str(), mapping.clone());
                return Ok(mapping);
            }
        }

        Err(ResolutionError::FormMappingMissing {
            form: form_id.clone(),
        }
        .into())
    }
}
