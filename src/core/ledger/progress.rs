//! Progress ledger for resumable runs
//!
//! Tracks, per scope key (location), the patient ids already processed.
//! Every mutation persists synchronously: the state is serialized to a
//! temp file in the target directory and renamed over the live file, so
//! the on-disk representation is never observed half-written and a
//! terminated run resumes from exactly the completed units.

use crate::domain::{Result, TransitError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Write-through ledger of processed unit ids per scope key
///
/// # Examples
///
/// ```no_run
/// use transit::core::ledger::ProgressLedger;
///
/// # fn example() -> transit::domain::Result<()> {
/// let mut ledger = ProgressLedger::open("state/progress.json")?;
/// ledger.update("100", &[42], false)?;
/// assert_eq!(ledger.get("100"), Some(&[42][..]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProgressLedger {
    path: PathBuf,
    entries: BTreeMap<String, Vec<i64>>,
}

impl ProgressLedger {
    /// Opens a ledger, loading existing state when the file is present
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    /// A corrupt ledger is not silently replaced; resolving it is a
    /// manual decision.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.is_file() {
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                TransitError::Ledger(format!("Failed to read {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&contents).map_err(|e| {
                TransitError::Ledger(format!("Corrupt ledger file {}: {}", path.display(), e))
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    /// Returns the processed ids recorded for a scope key
    pub fn get(&self, scope: &str) -> Option<&[i64]> {
        self.entries.get(scope).map(Vec::as_slice)
    }

    /// Clears the entry for a scope key ("start from scratch")
    ///
    /// # Errors
    ///
    /// Returns an error if the cleared state cannot be persisted.
    pub fn reset(&mut self, scope: &str) -> Result<()> {
        if self.entries.remove(scope).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    /// Records processed ids for a scope key
    ///
    /// Ids already recorded are not duplicated. With `reset` the scope's
    /// previous entry is cleared first and the whole mutation lands in
    /// one persisted write.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated state cannot be persisted.
    pub fn update(&mut self, scope: &str, ids: &[i64], reset: bool) -> Result<()> {
        let entry = self.entries.entry(scope.to_string()).or_default();
        if reset {
            entry.clear();
        }
        for id in ids {
            if !entry.contains(id) {
                entry.push(*id);
            }
        }
        self.persist()
    }

    /// Scope keys currently tracked, with their processed counts
    pub fn scopes(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.len()))
    }

    /// The ledger file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            std::fs::create_dir_all(parent).map_err(|e| {
                TransitError::Ledger(format!(
                    "Failed to create ledger directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| TransitError::Ledger(format!("Failed to serialize ledger: {e}")))?;

        // Temp file in the same directory, then rename: readers only
        // ever observe a complete ledger
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|e| {
            TransitError::Ledger(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            TransitError::Ledger(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(())
    }
}
