//! Per-unit processing stages
//!
//! One unit of work is a single patient with their encounter set. The
//! stages mirror the processing order; a failure records the last stage
//! reached so manual follow-up knows how far the unit got.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage a unit of work has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStage {
    /// Raw records fetched from the source
    Fetched,
    /// Demographics transformed into attributes
    AttributesMapped,
    /// Encounters transformed into events
    EventsMapped,
    /// Parts combined into the destination payload
    Combined,
    /// Payload written to the outbox
    Persisted,
    /// Terminal failure state
    Failed,
}

impl UnitStage {
    /// The stage name as recorded in logs and failure reports
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStage::Fetched => "fetched",
            UnitStage::AttributesMapped => "attributes_mapped",
            UnitStage::EventsMapped => "events_mapped",
            UnitStage::Combined => "combined",
            UnitStage::Persisted => "persisted",
            UnitStage::Failed => "failed",
        }
    }

    /// Whether the unit has finished, successfully or not
    pub fn is_terminal(&self) -> bool {
        matches!(self, UnitStage::Persisted | UnitStage::Failed)
    }
}

impl fmt::Display for UnitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(UnitStage::Fetched.as_str(), "fetched");
        assert_eq!(UnitStage::AttributesMapped.as_str(), "attributes_mapped");
        assert_eq!(UnitStage::Persisted.to_string(), "persisted");
    }

    #[test]
    fn test_terminal_stages() {
        assert!(UnitStage::Persisted.is_terminal());
        assert!(UnitStage::Failed.is_terminal());
        assert!(!UnitStage::Combined.is_terminal());
        assert!(!UnitStage::Fetched.is_terminal());
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&UnitStage::EventsMapped).unwrap();
        assert_eq!(json, "\"events_mapped\"");
    }
}
