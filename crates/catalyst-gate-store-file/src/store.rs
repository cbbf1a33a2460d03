// crates/catalyst-gate-store-file/src/store.rs
// ============================================================================
// Module: File Usage Store
// Description: Durable UsageStore backed by a human-readable JSON file.
// Purpose: Persist usage records atomically across process restarts.
// Dependencies: catalyst-gate-core, serde_json, tempfile
// ============================================================================

//! ## Overview
//! This module implements a durable [`UsageStore`] over one JSON file. Saves
//! write to a temporary file in the same directory, sync, then rename into
//! place, so a reader never observes a partially written record and a crash
//! mid-write never corrupts the live file. Corrupt or unreadable files
//! degrade to "no data, start fresh" on load; failed writes are errors
//! because a count increment must never be lost silently.
//!
//! The whole load-mutate-save sequence of `increment_and_get` is serialized
//! behind one mutex, so concurrent callers within a process cannot
//! interleave increments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use catalyst_gate_core::License;
use catalyst_gate_core::UsageData;
use catalyst_gate_core::UsageStore;
use catalyst_gate_core::UsageStoreError;
use catalyst_gate_core::interfaces::EnforcementLog;
use catalyst_gate_core::interfaces::LogLevel;
use tempfile::NamedTempFile;
use time::Date;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default usage file name, kept alongside the deployment.
pub const DEFAULT_USAGE_FILE: &str = "catalyst-usage.json";

// ============================================================================
// SECTION: File Usage Store
// ============================================================================

/// JSON file-backed implementation of [`UsageStore`].
pub struct FileUsageStore {
    /// Path of the live usage file.
    path: PathBuf,
    /// Lock serializing every load-mutate-save sequence.
    lock: Mutex<()>,
    /// Optional sink for corrupt-file notices.
    log: Option<Box<dyn EnforcementLog>>,
}

impl FileUsageStore {
    /// Creates a store over the given usage file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
            log: None,
        }
    }

    /// Attaches a sink for corrupt-file and recovery notices.
    #[must_use]
    pub fn with_log(mut self, log: Box<dyn EnforcementLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Returns the usage file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquires the store lock, mapping poisoning to a store error.
    fn acquire(&self) -> Result<MutexGuard<'_, ()>, UsageStoreError> {
        self.lock
            .lock()
            .map_err(|_| UsageStoreError::Store("usage store mutex poisoned".to_string()))
    }

    /// Reads the current record without taking the lock.
    ///
    /// Missing, unreadable, and unparsable files all degrade to `None`;
    /// a fresh record supersedes whatever was on disk.
    fn read_record(&self) -> Option<UsageData> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return None,
            Err(error) => {
                self.note(&format!(
                    "usage file {} is unreadable ({error}); starting fresh",
                    self.path.display(),
                ));
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(error) => {
                self.note(&format!(
                    "usage file {} is corrupt ({error}); starting fresh",
                    self.path.display(),
                ));
                None
            }
        }
    }

    /// Writes the record atomically without taking the lock.
    ///
    /// Writes to a temporary file in the target directory, syncs it, then
    /// renames it over the live file.
    fn write_record(&self, data: &UsageData) -> Result<(), UsageStoreError> {
        let json = serde_json::to_string_pretty(data)
            .map_err(|error| UsageStoreError::Store(error.to_string()))?;

        let directory = self.path.parent().filter(|parent| !parent.as_os_str().is_empty());
        let mut temp = NamedTempFile::new_in(directory.unwrap_or_else(|| Path::new(".")))
            .map_err(|error| UsageStoreError::Io(error.to_string()))?;
        temp.write_all(json.as_bytes()).map_err(|error| UsageStoreError::Io(error.to_string()))?;
        temp.as_file().sync_all().map_err(|error| UsageStoreError::Io(error.to_string()))?;
        temp.persist(&self.path).map_err(|error| UsageStoreError::Io(error.to_string()))?;
        Ok(())
    }

    /// Emits a store notice when a sink is attached.
    fn note(&self, message: &str) {
        if let Some(log) = &self.log {
            log.emit(LogLevel::Warn, &format!("[CATALYST] {message}"));
        }
    }
}

impl UsageStore for FileUsageStore {
    fn load(&self) -> Result<Option<UsageData>, UsageStoreError> {
        let _guard = self.acquire()?;
        Ok(self.read_record())
    }

    fn save(&self, data: &UsageData) -> Result<(), UsageStoreError> {
        let _guard = self.acquire()?;
        self.write_record(data)
    }

    fn increment_and_get(
        &self,
        license: Option<&License>,
        today: Date,
    ) -> Result<UsageData, UsageStoreError> {
        let _guard = self.acquire()?;
        let existing = self.read_record();
        let updated = UsageData::advance(existing, license, today);
        self.write_record(&updated)?;
        Ok(updated)
    }
}

impl fmt::Debug for FileUsageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUsageStore").field("path", &self.path).finish_non_exhaustive()
    }
}
