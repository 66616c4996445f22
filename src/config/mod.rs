//! Configuration management for Transit.
//!
//! TOML-based configuration loading, parsing, and validation.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [openmrs]
//! connection_string = "postgresql://openmrs:${TRANSIT_OPENMRS_PASSWORD}@db:5432/openmrs"
//!
//! [dhis2]
//! base_url = "https://dhis2.example.org"
//! username = "transit"
//! password = "${TRANSIT_DHIS2_PASSWORD}"
//!
//! [mappings]
//! directory = "mappings"
//! citizenship_code = "RW"
//! tracked_entity_type = "nEenWmSyUEp"
//!
//! [migration]
//! ledger_path = "state/progress.json"
//! outbox_dir = "outbox"
//! unit_limit = 20
//! ```
//!
//! Use `${VAR_NAME}` syntax for environment variable substitution;
//! `TRANSIT_*` prefixed variables override individual keys after
//! parsing. Validation runs on every load.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, Dhis2Config, LoggingConfig, MappingsConfig, MigrationConfig, OpenmrsConfig,
    TransitConfig,
};
pub use secret::{SecretString, SecretValue};
