//! Outbox submission
//!
//! Drains persisted units to DHIS2, oldest first: create the tracked
//! entity, attach the returned reference to every event, submit the
//! events, then mark the unit submitted. A rejected unit is logged and
//! left pending; the drain continues with the next unit.

use super::client::Dhis2Client;
use crate::core::outbox::{PendingUnit, UnitOutbox};
use crate::domain::Result;
use std::time::{Duration, Instant};

/// Summary of one submission run
#[derive(Debug, Clone)]
pub struct SubmitSummary {
    /// Units delivered and marked submitted
    pub submitted: usize,

    /// Units rejected and left pending
    pub failed: usize,

    /// Per-unit failure messages
    pub errors: Vec<String>,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl SubmitSummary {
    /// Whether every pending unit was delivered
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }
}

/// Drains the unit outbox to the DHIS2 API
pub struct Dhis2Submitter {
    client: Dhis2Client,
    outbox: UnitOutbox,
}

impl Dhis2Submitter {
    /// Creates a new submitter
    pub fn new(client: Dhis2Client, outbox: UnitOutbox) -> Self {
        Self { client, outbox }
    }

    /// Submits every pending unit, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error on transport-level failures (server unreachable,
    /// authentication rejected); import rejections are recorded in the
    /// summary and the corresponding unit files stay pending.
    pub async fn run(&self) -> Result<SubmitSummary> {
        let start = Instant::now();
        let pending = self.outbox.pending()?;
        tracing::info!(pending = pending.len(), "Starting submission run");

        let mut summary = SubmitSummary {
            submitted: 0,
            failed: 0,
            errors: Vec::new(),
            duration: Duration::ZERO,
        };

        for unit in &pending {
            match self.submit_unit(unit).await {
                Ok(entity) => {
                    self.outbox.mark_submitted(unit)?;
                    summary.submitted += 1;
                    tracing::info!(
                        patient_id = unit.patient(),
                        entity = %entity,
                        "Unit submitted"
                    );
                }
                Err(e) if e.is_unit_scoped() => {
                    tracing::warn!(
                        patient_id = unit.patient(),
                        error = %e,
                        "Unit rejected, left pending"
                    );
                    summary.failed += 1;
                    summary.errors.push(format!("patient {}: {e}", unit.patient()));
                }
                Err(e) => {
                    tracing::error!(error = %e, "Submission aborted");
                    return Err(e);
                }
            }
        }

        summary.duration = start.elapsed();
        tracing::info!(
            submitted = summary.submitted,
            failed = summary.failed,
            duration_ms = summary.duration.as_millis(),
            "Submission run completed"
        );
        Ok(summary)
    }

    /// Submits one unit: entity first, then its events with the
    /// returned reference attached
    async fn submit_unit(&self, unit: &PendingUnit) -> Result<String> {
        let payload = unit.load()?;
        let entity = self.client.post_tracked_entity(&payload).await?;

        for enrollment in &payload.enrollments {
            for event in &enrollment.events {
                let mut event = event.clone();
                event.tracked_entity_instance = Some(entity.clone());
                self.client.post_event(&event).await?;
            }
        }

        Ok(entity)
    }
}
