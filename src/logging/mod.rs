//! Logging and observability
//!
//! Structured logging built on the `tracing` crate: console output for
//! interactive runs, optional JSON file logging with rotation for
//! unattended ones.
//!
//! # Example
//!
//! ```no_run
//! use transit::logging::init_logging;
//! use transit::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Migration started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a failed unit of work with the stage it reached
///
/// # Example
///
/// ```no_run
/// use transit::log_unit_failed;
/// use transit::core::migrate::UnitStage;
/// use transit::domain::ids::PatientId;
///
/// let patient = PatientId::new(42);
/// let stage = UnitStage::EventsMapped;
/// log_unit_failed!(patient, stage, "no form mapping");
/// ```
#[macro_export]
macro_rules! log_unit_failed {
    ($patient:expr, $stage:expr, $error:expr) => {
        tracing::warn!(
            patient_id = %$patient,
            stage = %$stage,
            error = %$error,
            "Unit failed, continuing run"
        );
    };
}

/// Log the completion of a migration or submission phase
///
/// # Example
///
/// ```no_run
/// use transit::log_phase_complete;
/// use std::time::Duration;
///
/// log_phase_complete!("migrate", 42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_phase_complete {
    ($phase:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            phase = $phase,
            count = $count,
            duration_ms = $duration.as_millis(),
            "Phase completed"
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_compile() {
        // These tests just verify that the macros compile correctly
        // Actual logging output is not tested in unit tests
    }
}
