//! Durable unit storage between transformation and submission
//!
//! One JSON file per patient, named by patient id, written atomically
//! and overwritten wholesale on a re-run. Submission renames the file
//! with a `.submitted` marker so pending and delivered units are
//! distinguishable by listing alone. Pending units are returned oldest
//! first to preserve audit ordering at the destination.

use crate::domain::ids::PatientId;
use crate::domain::tracked::TrackedEntityPayload;
use crate::domain::{Result, TransitError};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const PENDING_SUFFIX: &str = ".json";
const SUBMITTED_SUFFIX: &str = ".json.submitted";

/// One-file-per-patient outbox
pub struct UnitOutbox {
    dir: PathBuf,
}

/// A persisted unit awaiting submission
#[derive(Debug, Clone)]
pub struct PendingUnit {
    path: PathBuf,
    patient: String,
    modified: SystemTime,
}

impl PendingUnit {
    /// The source patient id the unit was keyed by
    pub fn patient(&self) -> &str {
        &self.patient
    }

    /// The unit file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the payload from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<TrackedEntityPayload> {
        let contents = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&contents).map_err(|e| {
            TransitError::Serialization(format!(
                "Corrupt unit file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl UnitOutbox {
    /// Opens (and creates if needed) the outbox directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            TransitError::Io(format!(
                "Failed to create outbox directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// Writes one unit, keyed by patient id, replacing any previous file
    ///
    /// A re-run of the same patient overwrites the unit wholesale; the
    /// write is temp-file-and-rename so a crash never leaves a partial
    /// unit behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write(&self, patient: &PatientId, payload: &TrackedEntityPayload) -> Result<PathBuf> {
        let path = self.dir.join(format!("{patient}{PENDING_SUFFIX}"));
        let contents = serde_json::to_string_pretty(payload)?;

        let tmp = self.dir.join(format!("{patient}.json.tmp"));
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &path)?;

        tracing::debug!(patient = %patient, path = %path.display(), "Unit persisted");
        Ok(path)
    }

    /// Lists pending units, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn pending(&self) -> Result<Vec<PendingUnit>> {
        let mut units = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(PENDING_SUFFIX) || name.ends_with(SUBMITTED_SUFFIX) {
                continue;
            }
            let patient = name
                .trim_end_matches(PENDING_SUFFIX)
                .to_string();
            let modified = entry
                .metadata()?
                .modified()
                .unwrap_or(SystemTime::UNIX_EPOCH);
            units.push(PendingUnit {
                path: entry.path(),
                patient,
                modified,
            });
        }

        units.sort_by(|a, b| a.modified.cmp(&b.modified).then(a.patient.cmp(&b.patient)));
        Ok(units)
    }

    /// Counts pending and submitted units
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn counts(&self) -> Result<(usize, usize)> {
        let mut pending = 0;
        let mut submitted = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(SUBMITTED_SUFFIX) {
                submitted += 1;
            } else if name.ends_with(PENDING_SUFFIX) {
                pending += 1;
            }
        }
        Ok((pending, submitted))
    }

    /// Marks a unit as submitted by renaming it
    ///
    /// The unit file is never deleted; a marker rename keeps the
    /// delivered payload on disk for audit.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    pub fn mark_submitted(&self, unit: &PendingUnit) -> Result<PathBuf> {
        let target = self
            .dir
            .join(format!("{}{SUBMITTED_SUFFIX}", unit.patient));
        std::fs::rename(&unit.path, &target)?;
        Ok(target)
    }

    /// The outbox directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
