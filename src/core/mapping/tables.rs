//! Mapping table models
//!
//! Typed views over the externally configured mapping documents: named
//! source-key to destination-key tables, per-form mappings, and the
//! value-recoding catalog. Tables are immutable once loaded; the store
//! caches them for the process lifetime.

use crate::domain::{Result, TransitError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The named mapping tables a run can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingName {
    /// Source location id to destination org unit
    Location,
    /// Normalized patient field name to destination attribute id
    Attribute,
    /// Province free text to province code
    Province,
    /// District free text to district code
    District,
}

impl MappingName {
    /// The table name as used in file names and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingName::Location => "location",
            MappingName::Attribute => "attribute",
            MappingName::Province => "province",
            MappingName::District => "district",
        }
    }

    /// The mapping document file name for this table
    pub fn file_name(&self) -> String {
        format!("{}_mappings.json", self.as_str())
    }
}

impl fmt::Display for MappingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MappingName {
    type Err = TransitError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "location" => Ok(Self::Location),
            "attribute" => Ok(Self::Attribute),
            "province" => Ok(Self::Province),
            "district" => Ok(Self::District),
            _ => Err(TransitError::Configuration(format!(
                "Unknown mapping table: {s}. Expected location, attribute, province or district"
            ))),
        }
    }
}

/// One source-key to destination-key mapping table
///
/// Backed by an ordered map so iteration order, and therefore every
/// derived output, is deterministic across runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    entries: BTreeMap<String, String>,
}

impl MappingTable {
    /// Creates a table from explicit entries
    pub fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Looks up the destination key for a source key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-form mapping: observation concepts to data elements plus the
/// destination program identifiers for events built from the form
///
/// The file format:
///
/// ```json
/// {
///   "program": "vIpBngITCYm",
///   "program_stage": "xP4RSzzyQrp",
///   "observations": {
///     "887AAAAA": "rVZlkzOwWhi",
///     "5089AAAA": "y7hKDSuqEtH"
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FormMapping {
    /// Destination program id
    pub program: String,

    /// Destination program stage id
    pub program_stage: String,

    /// Concept id to data element id; intentionally partial, covering
    /// only the fields of interest
    #[serde(default)]
    pub observations: BTreeMap<String, String>,
}

impl FormMapping {
    /// Looks up the destination data element for a concept
    pub fn observation(&self, concept: &str) -> Option<&str> {
        self.observations.get(concept).map(String::as_str)
    }
}

/// Value-recoding rules keyed by destination data element id
///
/// Models clinical recodings (e.g. a glucose data element recoding the
/// numeric source codes `13467` to `random` and `6689` to `fasting`)
/// as data rather than code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RecodeCatalog {
    rules: BTreeMap<String, BTreeMap<String, String>>,
}

impl RecodeCatalog {
    /// Applies any recoding rule for a data element to a mapped value
    ///
    /// Returns the recoded value when a rule matches, the input
    /// otherwise.
    pub fn apply(&self, data_element: &str, value: &str) -> String {
        self.rules
            .get(data_element)
            .and_then(|r| r.get(value))
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }

    /// Whether the catalog has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_name_file_name() {
        assert_eq!(MappingName::Location.file_name(), "location_mappings.json");
        assert_eq!(MappingName::District.file_name(), "district_mappings.json");
    }

    #[test]
    fn test_mapping_name_from_str() {
        assert_eq!(
            MappingName::from_str("Attribute").unwrap(),
            MappingName::Attribute
        );
        assert!(MappingName::from_str("observation").is_err());
    }

    #[test]
    fn test_mapping_table_deserialize_and_get() {
        let table: MappingTable = serde_json::from_str(r#"{"100": "OU123", "101": "OU456"}"#)
            .expect("valid mapping json");
        assert_eq!(table.get("100"), Some("OU123"));
        assert_eq!(table.get("999"), None);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_mapping_table_iteration_is_ordered() {
        let table: MappingTable =
            serde_json::from_str(r#"{"b": "2", "a": "1", "c": "3"}"#).unwrap();
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_form_mapping_deserialize() {
        let json = r#"{
            "program": "vIpBngITCYm",
            "program_stage": "xP4RSzzyQrp",
            "observations": {"887AAAAA": "rVZlkzOwWhi"}
        }"#;
        let mapping: FormMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping.observation("887AAAAA"), Some("rVZlkzOwWhi"));
        assert_eq!(mapping.observation("nope"), None);
        assert_eq!(mapping.program, "vIpBngITCYm");
    }

    #[test]
    fn test_form_mapping_observations_default_empty() {
        let json = r#"{"program": "P", "program_stage": "S"}"#;
        let mapping: FormMapping = serde_json::from_str(json).unwrap();
        assert!(mapping.observations.is_empty());
    }

    #[test]
    fn test_recode_catalog_apply() {
        let catalog: RecodeCatalog = serde_json::from_str(
            r#"{"gLUCde": {"13467": "random", "6689": "fasting"}}"#,
        )
        .unwrap();
        assert_eq!(catalog.apply("gLUCde", "13467"), "random");
        assert_eq!(catalog.apply("gLUCde", "6689"), "fasting");
        // Unknown value or data element passes through
        assert_eq!(catalog.apply("gLUCde", "42"), "42");
        assert_eq!(catalog.apply("other", "13467"), "13467");
    }

    #[test]
    fn test_recode_catalog_default_is_empty() {
        let catalog = RecodeCatalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.apply("x", "y"), "y");
    }
}
