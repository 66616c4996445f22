//! Core domain types and models
//!
//! This module contains the domain layer for Transit:
//!
//! - [`ids`] - Validated identifier newtypes for source and destination
//! - [`patient`] - Raw patient demographics from the source system
//! - [`observation`] - Raw clinical observations with value precedence
//! - [`tracked`] - The DHIS2-shaped output aggregate
//! - [`errors`] - Domain error hierarchy
//! - [`result`] - Result type alias
//! - [`context`] - Error context extension trait

pub mod context;
pub mod errors;
pub mod ids;
pub mod observation;
pub mod patient;
pub mod result;
pub mod tracked;

// Re-export commonly used types
pub use errors::{Dhis2Error, ResolutionError, SourceError, TransitError};
pub use ids::{ConceptId, EncounterId, FormId, LocationId, OrgUnitId, PatientId};
pub use observation::{ObsValue, RawObservation};
pub use patient::{RawPatient, RawPatientBuilder};
pub use result::Result;
pub use tracked::{
    DataValue, Enrollment, EventStatus, TrackedEntityPayload, TrackedEntityPayloadBuilder,
    TransformedAttribute, TransformedEvent,
};
