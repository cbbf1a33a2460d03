// crates/catalyst-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Catalyst Gate Interfaces
// Description: Backend-agnostic interfaces for persistence, licenses, and logs.
// Purpose: Define the contract surfaces used by the enforcement engine.
// Dependencies: crate::core, serde, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the enforcement engine integrates with storage and
//! operator-facing logging without embedding backend details. Store
//! implementations must fail closed on write errors (a lost count increment
//! is unacceptable) and degrade to "no data" on corrupt reads. License
//! sources must never let a validation failure escape the loading boundary;
//! an invalid key is an enforcement condition, not an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use thiserror::Error;
use time::Date;

use crate::core::License;
use crate::core::LicenseParseError;
use crate::core::UsageData;

// ============================================================================
// SECTION: Usage Store
// ============================================================================

/// Usage store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum UsageStoreError {
    /// Store I/O error.
    #[error("usage store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails to parse.
    #[error("usage store corruption: {0}")]
    Corrupt(String),
    /// Store reported an error.
    #[error("usage store error: {0}")]
    Store(String),
}

/// Persistence seam for the per-year usage record.
///
/// Implementations serialize the whole load-mutate-save sequence of
/// [`UsageStore::increment_and_get`] behind one lock so concurrent callers
/// within a process can never lose or double-count an increment.
pub trait UsageStore {
    /// Loads the current persisted record, if one exists.
    ///
    /// Corrupt or unreadable data degrades to `Ok(None)` (start fresh)
    /// rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`UsageStoreError`] when the store itself is unavailable
    /// (for example a poisoned lock).
    fn load(&self) -> Result<Option<UsageData>, UsageStoreError>;

    /// Persists the record atomically.
    ///
    /// A reader must never observe a partially written record.
    ///
    /// # Errors
    ///
    /// Returns [`UsageStoreError`] when persisting fails; callers must treat
    /// this as fatal to the current call.
    fn save(&self, data: &UsageData) -> Result<(), UsageStoreError>;

    /// Atomically increments the execution count and returns the new record.
    ///
    /// Applies the year-rollover rule: a record for a different year is
    /// superseded by a brand-new record whose shape depends on license
    /// presence (see [`UsageData::advance`]).
    ///
    /// # Errors
    ///
    /// Returns [`UsageStoreError`] when the updated record cannot be
    /// persisted.
    fn increment_and_get(
        &self,
        license: Option<&License>,
        today: Date,
    ) -> Result<UsageData, UsageStoreError>;
}

// ============================================================================
// SECTION: License Source
// ============================================================================

/// Outcome of attempting to load a license from a source.
///
/// # Invariants
/// - `Rejected` carries the validation failure for logging only; callers
///   treat it the same as `Absent` for enforcement purposes.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedLicense {
    /// A license was found and validated.
    Valid(License),
    /// No license material was found.
    Absent,
    /// A key was found but failed validation.
    Rejected(LicenseParseError),
}

impl LoadedLicense {
    /// Returns the validated license, if any.
    #[must_use]
    pub const fn license(&self) -> Option<&License> {
        match self {
            Self::Valid(license) => Some(license),
            Self::Absent | Self::Rejected(_) => None,
        }
    }
}

/// Source of license material (typically a file next to the deployment).
pub trait LicenseSource {
    /// Attempts to load and validate the license.
    ///
    /// Never fails: a missing file is [`LoadedLicense::Absent`] and an
    /// invalid key is [`LoadedLicense::Rejected`].
    fn load(&self) -> LoadedLicense;

    /// Returns true if license material is present at the source.
    fn exists(&self) -> bool;

    /// Returns an operator-facing description of the expected location.
    fn location(&self) -> String;
}

// ============================================================================
// SECTION: Enforcement Log
// ============================================================================

/// Severity of an operator-facing enforcement message.
///
/// # Invariants
/// - Variants are stable for log labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LogLevel {
    /// Informational message.
    Info,
    /// Warning message.
    Warn,
    /// Error message.
    Error,
}

impl LogLevel {
    /// Returns a stable label for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

/// Sink for operator-facing enforcement messages.
///
/// Implementations must never fail the caller; write errors are swallowed.
pub trait EnforcementLog: Send + Sync {
    /// Emits one message at the given level.
    fn emit(&self, level: LogLevel, message: &str);
}

/// Enforcement log writing one `LEVEL message` line per emit to a writer.
///
/// # Invariants
/// - The writer is guarded by a mutex; a poisoned lock drops the message.
#[derive(Debug)]
pub struct WriterLog<W> {
    /// Underlying writer protected by a mutex.
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterLog<W> {
    /// Creates a log sink over the provided writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> EnforcementLog for WriterLog<W> {
    fn emit(&self, level: LogLevel, message: &str) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{} {}", level.as_str(), message);
        }
    }
}
