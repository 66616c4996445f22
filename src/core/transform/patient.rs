//! Patient demographics transformation
//!
//! Resolves the run's org unit and maps patient attributes onto
//! destination attribute ids, applying field-specific normalization
//! before each table lookup. Only fields present in the attribute
//! mapping table can reach the output; nothing unmapped leaks through.

use crate::core::mapping::MappingName;
use crate::core::migrate::MigrationContext;
use crate::domain::ids::OrgUnitId;
use crate::domain::patient::{fields, RawPatient};
use crate::domain::{ResolutionError, Result, TransformedAttribute, TransitError};

/// Transforms one patient's demographics
///
/// Returns the resolved org unit and one [`TransformedAttribute`] per
/// attribute-table entry that has a non-null value in the patient
/// record.
///
/// # Errors
///
/// Returns [`ResolutionError::LocationUnresolved`] when the run's
/// location has no entry in the location table; the caller drops the
/// unit. Missing mapping table files surface as configuration errors
/// with the same per-unit scope.
pub fn transform_patient(
    patient: &RawPatient,
    ctx: &MigrationContext,
) -> Result<(OrgUnitId, Vec<TransformedAttribute>)> {
    let locations = ctx.mappings.load(MappingName::Location)?;
    let org_unit = locations.get(ctx.location.as_str()).ok_or_else(|| {
        ResolutionError::LocationUnresolved {
            location: ctx.location.clone(),
        }
    })?;
    let org_unit = OrgUnitId::new(org_unit).map_err(|e| {
        TransitError::Configuration(format!(
            "Invalid org unit for location {}: {e}",
            ctx.location
        ))
    })?;

    let attribute_table = ctx.mappings.load(MappingName::Attribute)?;
    let mut attributes = Vec::with_capacity(attribute_table.len());
    for (field, destination) in attribute_table.iter() {
        let Some(raw) = patient.attribute(field) else {
            continue;
        };
        let value = normalize_field(field, raw, ctx)?;
        attributes.push(TransformedAttribute::new(destination, value));
    }

    Ok((org_unit, attributes))
}

/// Applies the field-specific normalization rules before mapping
fn normalize_field(field: &str, raw: &str, ctx: &MigrationContext) -> Result<String> {
    match field {
        fields::GENDER => Ok(normalize_sex(raw)),
        // Only one citizenship value is supported downstream; the source
        // value is discarded by design
        fields::COUNTRY | fields::CITIZENSHIP => Ok(ctx.citizenship_code.clone()),
        fields::STATE_PROVINCE => normalize_province(raw, ctx),
        fields::COUNTY_DISTRICT => normalize_district(raw, ctx),
        _ => Ok(raw.to_string()),
    }
}

/// Source sex codes to destination labels; unknown codes pass through
fn normalize_sex(raw: &str) -> String {
    match raw {
        "F" => "Female".to_string(),
        "M" => "Male".to_string(),
        other => other.to_string(),
    }
}

/// Province code table lookup with free-text passthrough
fn normalize_province(raw: &str, ctx: &MigrationContext) -> Result<String> {
    let table = ctx.mappings.load(MappingName::Province)?;
    Ok(match table.get(raw) {
        Some(code) => code.to_string(),
        None => {
            tracing::warn!(value = raw, "Province not in code table, passing through");
            raw.to_string()
        }
    })
}

/// District normalization: first `/`-segment, trimmed, then the code table
fn normalize_district(raw: &str, ctx: &MigrationContext) -> Result<String> {
    let segment = raw.split('/').next().unwrap_or(raw).trim();
    let table = ctx.mappings.load(MappingName::District)?;
    Ok(match table.get(segment) {
        Some(code) => code.to_string(),
        None => {
            tracing::warn!(value = segment, "District not in code table, passing through");
            segment.to_string()
        }
    })
}
