//! Migration run summary
//!
//! Aggregated counts and per-unit failure records for one run, reported
//! at the end of the migrate command.

use super::unit::UnitStage;
use crate::domain::ids::PatientId;
use std::time::Duration;

/// One failed unit with the stage it reached
#[derive(Debug, Clone)]
pub struct UnitFailure {
    /// The patient the unit was keyed by
    pub patient: PatientId,

    /// Last stage reached before the failure
    pub stage: UnitStage,

    /// Error message
    pub message: String,
}

/// Summary of a migration run
#[derive(Debug, Clone)]
pub struct MigrationSummary {
    /// Location scope of the run
    pub location: String,

    /// Patients found in scope by the fetch
    pub total_patients: usize,

    /// Patients skipped because the ledger already records them
    pub already_processed: usize,

    /// Units transformed and persisted
    pub transformed: usize,

    /// Units that hit the per-run limit and were left for a later run
    pub deferred: usize,

    /// Per-unit failures
    pub failures: Vec<UnitFailure>,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl MigrationSummary {
    /// Creates an empty summary for a location scope
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            total_patients: 0,
            already_processed: 0,
            transformed: 0,
            deferred: 0,
            failures: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    /// Records a per-unit failure
    pub fn record_failure(
        &mut self,
        patient: PatientId,
        stage: UnitStage,
        message: impl Into<String>,
    ) {
        self.failures.push(UnitFailure {
            patient,
            stage,
            message: message.into(),
        });
    }

    /// Number of failed units
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every attempted unit succeeded
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }

    /// Percentage of attempted units that succeeded
    pub fn success_rate(&self) -> f64 {
        let attempted = self.transformed + self.failed();
        if attempted == 0 {
            100.0
        } else {
            self.transformed as f64 / attempted as f64 * 100.0
        }
    }

    /// Sets the run duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Logs the summary at the end of a run
    pub fn log_summary(&self) {
        tracing::info!(
            location = %self.location,
            total_patients = self.total_patients,
            already_processed = self.already_processed,
            transformed = self.transformed,
            failed = self.failed(),
            deferred = self.deferred,
            duration_ms = self.duration.as_millis(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Migration run completed"
        );

        for failure in &self.failures {
            tracing::warn!(
                patient_id = %failure.patient,
                stage = %failure.stage,
                error = %failure.message,
                "Unit failure"
            );
        }
    }
}
