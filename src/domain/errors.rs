//! Domain error types
//!
//! Error hierarchy for Transit. All errors are domain-specific and don't
//! expose third-party types. The hierarchy encodes the propagation policy:
//! unit-scoped errors (mapping resolution, malformed source rows, missing
//! per-form tables) are caught at the orchestration boundary and logged,
//! while run-level errors (source connectivity, ledger writes) terminate
//! the run.

use crate::domain::ids::{EncounterId, FormId, LocationId, PatientId};
use thiserror::Error;

/// Main Transit error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TransitError {
    /// Configuration-related errors (config file, mapping tables)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// OpenMRS source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// DHIS2 destination errors
    #[error("DHIS2 error: {0}")]
    Dhis2(#[from] Dhis2Error),

    /// Mapping resolution errors, scoped to a single unit of work
    #[error("Resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Progress ledger errors
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl TransitError {
    /// Whether this error is scoped to a single unit of work
    ///
    /// Unit-scoped errors mark the unit FAILED and let the run continue.
    /// Everything else propagates and terminates the run.
    pub fn is_unit_scoped(&self) -> bool {
        match self {
            TransitError::Resolution(_)
            | TransitError::Configuration(_)
            | TransitError::Serialization(_) => true,
            TransitError::Dhis2(e) => e.is_unit_scoped(),
            _ => false,
        }
    }
}

/// OpenMRS source-specific errors
///
/// Errors from the source database boundary. All of these are fatal to
/// the run: an unreachable or misbehaving source makes further units
/// pointless, and the atomic ledger writes make termination safe.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to connect to the source database
    #[error("Failed to connect to source database: {0}")]
    ConnectionFailed(String),

    /// Query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A row did not have the expected shape
    #[error("Invalid row for {entity}: {detail}")]
    InvalidRow { entity: String, detail: String },

    /// Referenced record does not exist
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// DHIS2 destination-specific errors
///
/// Connectivity problems are fatal to a submission run; import rejections
/// are scoped to the unit being submitted and leave its file pending.
#[derive(Debug, Error)]
pub enum Dhis2Error {
    /// Failed to reach the DHIS2 server
    #[error("Failed to connect to DHIS2 server: {0}")]
    ConnectionFailed(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Server rejected an import
    #[error("Import rejected ({status}): {message}")]
    ImportRejected { status: u16, message: String },

    /// Response did not contain the expected import summary
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl Dhis2Error {
    /// Whether submission can continue with the next pending unit
    pub fn is_unit_scoped(&self) -> bool {
        matches!(
            self,
            Dhis2Error::ImportRejected { .. } | Dhis2Error::InvalidResponse(_)
        )
    }
}

/// Mapping resolution errors
///
/// Always scoped to the unit being transformed; the coordinator logs the
/// unit id and the stage reached, then moves on.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The run's location has no entry in the location mapping table
    #[error("Location {location} has no org unit mapping")]
    LocationUnresolved { location: LocationId },

    /// No per-form mapping table, by id or by uuid alias
    #[error("No mapping table for form {form}")]
    FormMappingMissing { form: FormId },

    /// A raw record had an unexpected null or shape
    #[error("Malformed source data for patient {patient}: {detail}")]
    DataShape { patient: PatientId, detail: String },

    /// An encounter references data that cannot be transformed
    #[error("Encounter {encounter} cannot be transformed: {detail}")]
    EncounterUnmappable {
        encounter: EncounterId,
        detail: String,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for TransitError {
    fn from(err: std::io::Error) -> Self {
        TransitError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TransitError {
    fn from(err: serde_json::Error) -> Self {
        TransitError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TransitError {
    fn from(err: toml::de::Error) -> Self {
        TransitError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_transit_error_display() {
        let err = TransitError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_source_error_conversion() {
        let src_err = SourceError::ConnectionFailed("Network error".to_string());
        let err: TransitError = src_err.into();
        assert!(matches!(err, TransitError::Source(_)));
        assert!(!err.is_unit_scoped());
    }

    #[test]
    fn test_resolution_error_is_unit_scoped() {
        let res_err = ResolutionError::LocationUnresolved {
            location: LocationId::from_str("100").unwrap(),
        };
        let err: TransitError = res_err.into();
        assert!(err.is_unit_scoped());
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_missing_form_mapping_is_unit_scoped() {
        let err: TransitError = ResolutionError::FormMappingMissing {
            form: FormId::from_str("27").unwrap(),
        }
        .into();
        assert!(err.is_unit_scoped());
    }

    #[test]
    fn test_dhis2_import_rejection_unit_scoped() {
        let err = Dhis2Error::ImportRejected {
            status: 409,
            message: "conflict".to_string(),
        };
        assert!(err.is_unit_scoped());
        assert!(!Dhis2Error::ConnectionFailed("down".to_string()).is_unit_scoped());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: TransitError = io_err.into();
        assert!(matches!(err, TransitError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TransitError = json_err.into();
        assert!(matches!(err, TransitError::Serialization(_)));
    }

    #[test]
    fn test_transit_error_implements_std_error() {
        let err = TransitError::Ledger("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
