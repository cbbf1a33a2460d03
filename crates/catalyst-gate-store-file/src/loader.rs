// crates/catalyst-gate-store-file/src/loader.rs
// ============================================================================
// Module: File License Source
// Description: License file reader tolerant of comments and blank lines.
// Purpose: Locate and validate the license key without ever failing the caller.
// Dependencies: catalyst-gate-core, std
// ============================================================================

//! ## Overview
//! The license file is plain UTF-8 text: blank lines and lines starting with
//! `#` are skipped, and the first line starting with the key prefix is the
//! candidate key. Any other non-comment content is noted with a warning and
//! otherwise ignored. A missing file or unusable key is `Absent`, a present
//! but invalid key is `Rejected`; neither aborts the caller, only downstream
//! enforcement reacts.
//!
//! License file format:
//!
//! ```text
//! # Comments start with hash
//! # Blank lines are ignored
//! CAT1.eyJ0aWVy...base64...SIGNATURE
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use catalyst_gate_core::KEY_PREFIX;
use catalyst_gate_core::LicenseSource;
use catalyst_gate_core::LoadedLicense;
use catalyst_gate_core::interfaces::EnforcementLog;
use catalyst_gate_core::interfaces::LogLevel;
use catalyst_gate_core::validate_key;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default license file name, kept alongside the deployment.
pub const DEFAULT_LICENSE_FILE: &str = "catalyst.lic";

// ============================================================================
// SECTION: File License Source
// ============================================================================

/// License file implementation of [`LicenseSource`].
pub struct FileLicenseSource {
    /// Path of the license file.
    path: PathBuf,
    /// Optional sink for unexpected-content notices.
    log: Option<Box<dyn EnforcementLog>>,
}

impl FileLicenseSource {
    /// Creates a source over the given license file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            log: None,
        }
    }

    /// Attaches a sink for unexpected-content notices.
    #[must_use]
    pub fn with_log(mut self, log: Box<dyn EnforcementLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Returns the license file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extracts the candidate key line, skipping comments and blanks.
    ///
    /// Non-comment lines that do not start with the key prefix are noted
    /// with a warning and ignored; loading continues.
    fn extract_key(&self, contents: &str) -> Option<String> {
        for line in contents.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with(KEY_PREFIX) {
                return Some(trimmed.to_string());
            }
            let preview: String = trimmed.chars().take(30).collect();
            self.note(&format!(
                "unexpected content in license file {}: {preview}...",
                self.path.display(),
            ));
        }
        None
    }

    /// Emits a loader notice when a sink is attached.
    fn note(&self, message: &str) {
        if let Some(log) = &self.log {
            log.emit(LogLevel::Warn, &format!("[CATALYST] {message}"));
        }
    }
}

impl LicenseSource for FileLicenseSource {
    fn load(&self) -> LoadedLicense {
        if !self.exists() {
            return LoadedLicense::Absent;
        }

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) => {
                self.note(&format!(
                    "failed to read license file {}: {error}",
                    self.path.display(),
                ));
                return LoadedLicense::Absent;
            }
        };

        let Some(key) = self.extract_key(&contents) else {
            self.note(&format!(
                "license file {} is empty or contains no usable key",
                self.path.display(),
            ));
            return LoadedLicense::Absent;
        };

        match validate_key(&key) {
            Ok(license) => LoadedLicense::Valid(license),
            Err(error) => LoadedLicense::Rejected(error),
        }
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

impl fmt::Debug for FileLicenseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLicenseSource").field("path", &self.path).finish_non_exhaustive()
    }
}
