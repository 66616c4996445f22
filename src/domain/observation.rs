//! Raw observation domain model
//!
//! One clinical observation row from the source `obs` table. Source data
//! guarantees at most one non-null value variant per row; the engine
//! enforces that defensively with a fixed selection precedence.

use super::ids::{ConceptId, EncounterId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The value variants an observation row can carry
///
/// Exactly one variant should be non-null. When more than one is present
/// the effective value is selected by precedence: numeric, then coded,
/// then text, then datetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObsValue {
    /// Numeric value (`obs.value_numeric`)
    pub numeric: Option<f64>,

    /// Coded value, already resolved to the answer concept's identifier
    pub coded: Option<String>,

    /// Free-text value (`obs.value_text`)
    pub text: Option<String>,

    /// Datetime value (`obs.value_datetime`)
    pub datetime: Option<DateTime<Utc>>,
}

impl ObsValue {
    /// Selects the single effective value by precedence
    ///
    /// Returns `None` when every variant is null ("no data").
    /// Numeric values render without a trailing fraction when whole, so
    /// coded-as-number answers keep their source form (`13467`, not
    /// `13467.0`); datetimes render as plain calendar dates.
    pub fn effective(&self) -> Option<String> {
        if let Some(n) = self.numeric {
            return Some(format_numeric(n));
        }
        if let Some(c) = &self.coded {
            return Some(c.clone());
        }
        if let Some(t) = &self.text {
            return Some(t.clone());
        }
        self.datetime.map(|d| d.format("%Y-%m-%d").to_string())
    }

    /// Whether every variant is null
    pub fn is_empty(&self) -> bool {
        self.numeric.is_none()
            && self.coded.is_none()
            && self.text.is_none()
            && self.datetime.is_none()
    }
}

fn format_numeric(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// One raw observation belonging to an encounter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawObservation {
    /// Source observation id (`obs.obs_id`)
    pub id: i64,

    /// Encounter this observation belongs to
    pub encounter: EncounterId,

    /// The observed concept
    pub concept: ConceptId,

    /// The observation value
    pub value: ObsValue,
}

impl RawObservation {
    /// Creates a new RawObservation
    pub fn new(id: i64, encounter: EncounterId, concept: ConceptId, value: ObsValue) -> Self {
        Self {
            id,
            encounter,
            concept,
            value,
        }
    }
}
