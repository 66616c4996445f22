//! Per-run migration context
//!
//! An immutable value carrying the run's scope and configuration-derived
//! constants into the pure transformation calls, instead of threading
//! individual settings through every signature.

use crate::core::mapping::MappingStore;
use crate::domain::ids::LocationId;
use std::sync::Arc;

/// Immutable context for one migration run
///
/// Constructed once per run from the loaded configuration and shared by
/// reference with every transformation call. The location is a run-level
/// scope, not a per-patient field: every unit in the run resolves its
/// org unit from it.
#[derive(Clone)]
pub struct MigrationContext {
    /// Location scope for this run
    pub location: LocationId,

    /// Mapping store handle, one cache for the whole run
    pub mappings: Arc<MappingStore>,

    /// Fixed destination citizenship code; country/citizenship source
    /// values are replaced with it unconditionally
    pub citizenship_code: String,

    /// Destination tracked entity type id
    pub tracked_entity_type: String,

    /// Program used for enrollments when a patient has no mapped
    /// encounters to take one from
    pub default_program: Option<String>,
}

impl MigrationContext {
    /// Creates a new MigrationContext
    pub fn new(
        location: LocationId,
        mappings: Arc<MappingStore>,
        citizenship_code: impl Into<String>,
        tracked_entity_type: impl Into<String>,
        default_program: Option<String>,
    ) -> Self {
        Self {
            location,
            mappings,
            citizenship_code: citizenship_code.into(),
            tracked_entity_type: tracked_entity_type.into(),
            default_program,
        }
    }
}
