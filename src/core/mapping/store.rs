//! Mapping store with per-run caching
//!
//! Loads named mapping tables and per-form mappings from the configured
//! mappings directory, lazily on first use, cached for the process
//! lifetime. A missing directory is a process-fatal configuration error;
//! a missing table surfaces as an error only when a unit actually needs
//! it.

use super::tables::{FormMapping, MappingName, MappingTable, RecodeCatalog};
use crate::domain::{Result, TransitError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const RECODE_FILE: &str = "recode_mappings.json";

/// Cached loader for the mapping documents of one run
///
/// Constructed once per run and shared behind an `Arc`; there is no
/// cache invalidation inside a run.
///
/// # Examples
///
/// ```no_run
/// use transit::core::mapping::{MappingName, MappingStore};
///
/// # fn example() -> transit::domain::Result<()> {
/// let store = MappingStore::new("mappings")?;
/// let locations = store.load(MappingName::Location)?;
/// if let Some(org_unit) = locations.get("100") {
///     println!("location 100 -> {org_unit}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct MappingStore {
    dir: PathBuf,
    tables: Mutex<HashMap<MappingName, Arc<MappingTable>>>,
    forms: Mutex<HashMap<String, Arc<FormMapping>>>,
    recode: Mutex<Option<Arc<RecodeCatalog>>>,
}

impl MappingStore {
    /// Creates a store over a mappings directory
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the directory does not exist --
    /// without it no unit can be transformed, so this fails the process
    /// at startup.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(TransitError::Configuration(format!(
                "Mappings directory not found: {}",
                dir.display()
            )));
        }
        Ok(Self {
            dir,
            tables: Mutex::new(HashMap::new()),
            forms: Mutex::new(HashMap::new()),
            recode: Mutex::new(None),
        })
    }

    /// Loads a named mapping table, cached
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the table file is missing or
    /// malformed. Callers treat this as fatal to the unit that required
    /// the table, not to the run.
    pub fn load(&self, name: MappingName) -> Result<Arc<MappingTable>> {
        let mut cache = self.tables.lock().expect("mapping cache poisoned");
        if let Some(table) = cache.get(&name) {
            return Ok(table.clone());
        }

        let path = self.dir.join(name.file_name());
        let table: MappingTable = read_mapping_file(&path)?;
        tracing::debug!(
            table = %name,
            entries = table.len(),
            path = %path.display(),
            "Loaded mapping table"
        );

        let table = Arc::new(table);
        cache.insert(name, table.clone());
        Ok(table)
    }

    /// Loads a per-form mapping by form id or uuid alias, cached
    ///
    /// Returns `Ok(None)` when no mapping document exists under this
    /// key, so the caller can resolve the form's alternate identifier
    /// and retry before declaring the form unmappable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the document exists but is
    /// malformed.
    pub fn load_form(&self, key: &str) -> Result<Option<Arc<FormMapping>>> {
        let mut cache = self.forms.lock().expect("form mapping cache poisoned");
        if let Some(mapping) = cache.get(key) {
            return Ok(Some(mapping.clone()));
        }

        let path = self.dir.join("forms").join(format!("form_{key}_mappings.json"));
        if !path.is_file() {
            return Ok(None);
        }

        let mapping: FormMapping = read_mapping_file(&path)?;
        tracing::debug!(
            form = key,
            observations = mapping.observations.len(),
            "Loaded form mapping"
        );

        let mapping = Arc::new(mapping);
        cache.insert(key.to_string(), mapping.clone());
        Ok(Some(mapping))
    }

    /// Caches a form mapping under an additional key
    ///
    /// Used after alternate-key resolution so subsequent encounters with
    /// the same numeric form id hit the cache directly.
    pub fn alias_form(&self, key: &str, mapping: Arc<FormMapping>) {
        self.forms
            .lock()
            .expect("form mapping cache poisoned")
            .insert(key.to_string(), mapping);
    }

    /// Loads the value-recoding catalog, cached
    ///
    /// The catalog file is optional; an absent file yields an empty
    /// catalog.
    pub fn recode_catalog(&self) -> Result<Arc<RecodeCatalog>> {
        let mut cache = self.recode.lock().expect("recode cache poisoned");
        if let Some(catalog) = cache.as_ref() {
            return Ok(catalog.clone());
        }

        let path = self.dir.join(RECODE_FILE);
        let catalog = if path.is_file() {
            read_mapping_file::<RecodeCatalog>(&path)?
        } else {
            RecodeCatalog::default()
        };

        let catalog = Arc::new(catalog);
        *cache = Some(catalog.clone());
        Ok(catalog)
    }

    /// The mappings directory this store reads from
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn read_mapping_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        TransitError::Configuration(format!(
            "Mapping file not found or unreadable: {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        TransitError::Configuration(format!("Malformed mapping file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, MappingStore) {
        let dir = TempDir::new().unwrap();
        for (name, contents) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        let store = MappingStore::new(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let result = MappingStore::new("/nonexistent/mappings");
        assert!(matches!(result, Err(TransitError::Configuration(_))));
    }

    #[test]
    fn test_load_and_cache_table() {
        let (_dir, store) = store_with(&[("location_mappings.json", r#"{"100": "OU123"}"#)]);

        let first = store.load(MappingName::Location).unwrap();
        assert_eq!(first.get("100"), Some("OU123"));

        // Second load returns the same cached table
        let second = store.load(MappingName::Location).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_table_is_error() {
        let (_dir, store) = store_with(&[]);
        let result = store.load(MappingName::Attribute);
        assert!(matches!(result, Err(TransitError::Configuration(_))));
    }

    #[test]
    fn test_malformed_table_is_error() {
        let (_dir, store) = store_with(&[("province_mappings.json", "not json")]);
        let result = store.load(MappingName::Province);
        assert!(matches!(result, Err(TransitError::Configuration(_))));
    }

    #[test]
    fn test_load_form_absent_is_none() {
        let (_dir, store) = store_with(&[]);
        assert!(store.load_form("27").unwrap().is_none());
    }

    #[test]
    fn test_load_form_by_key() {
        let (_dir, store) = store_with(&[(
            "forms/form_27_mappings.json",
            r#"{"program": "P1", "program_stage": "S1", "observations": {"c1": "de1"}}"#,
        )]);

        let mapping = store.load_form("27").unwrap().unwrap();
        assert_eq!(mapping.observation("c1"), Some("de1"));
    }

    #[test]
    fn test_alias_form_hits_cache() {
        let (_dir, store) = store_with(&[(
            "forms/form_abc-uuid_mappings.json",
            r#"{"program": "P1", "program_stage": "S1"}"#,
        )]);

        let by_uuid = store.load_form("abc-uuid").unwrap().unwrap();
        store.alias_form("27", by_uuid.clone());

        let by_id = store.load_form("27").unwrap().unwrap();
        assert!(Arc::ptr_eq(&by_uuid, &by_id));
    }

    #[test]
    fn test_recode_catalog_optional() {
        let (_dir, store) = store_with(&[]);
        let catalog = store.recode_catalog().unwrap();
        assert!(catalog.is_empty());

        let (_dir2, store2) = store_with(&[(
            "recode_mappings.json",
            r#"{"gLUCde": {"13467": "random"}}"#,
        )]);
        let catalog2 = store2.recode_catalog().unwrap();
        assert_eq!(catalog2.apply("gLUCde", "13467"), "random");
    }
}
