// crates/catalyst-gate-core/src/runtime/store.rs
// ============================================================================
// Module: Catalyst Gate In-Memory Store
// Description: In-memory usage store and static license source.
// Purpose: Provide deterministic implementations for tests and local demos.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! This module provides a simple in-memory implementation of [`UsageStore`]
//! and a static [`LicenseSource`] for tests and local demos. They share the
//! exact year-rollover semantics of the file-backed store via
//! [`UsageData::advance`]. Not intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use time::Date;

use crate::core::License;
use crate::core::UsageData;
use crate::interfaces::LicenseSource;
use crate::interfaces::LoadedLicense;
use crate::interfaces::UsageStore;
use crate::interfaces::UsageStoreError;

// ============================================================================
// SECTION: In-Memory Usage Store
// ============================================================================

/// In-memory usage store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUsageStore {
    /// Current record protected by a mutex.
    record: Arc<Mutex<Option<UsageData>>>,
}

impl InMemoryUsageStore {
    /// Creates a new empty in-memory usage store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            record: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a store pre-seeded with an existing record.
    #[must_use]
    pub fn with_record(record: UsageData) -> Self {
        Self {
            record: Arc::new(Mutex::new(Some(record))),
        }
    }
}

impl UsageStore for InMemoryUsageStore {
    fn load(&self) -> Result<Option<UsageData>, UsageStoreError> {
        let guard = self
            .record
            .lock()
            .map_err(|_| UsageStoreError::Store("usage store mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, data: &UsageData) -> Result<(), UsageStoreError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|_| UsageStoreError::Store("usage store mutex poisoned".to_string()))?;
        *guard = Some(data.clone());
        Ok(())
    }

    fn increment_and_get(
        &self,
        license: Option<&License>,
        today: Date,
    ) -> Result<UsageData, UsageStoreError> {
        let mut guard = self
            .record
            .lock()
            .map_err(|_| UsageStoreError::Store("usage store mutex poisoned".to_string()))?;
        let updated = UsageData::advance(guard.clone(), license, today);
        *guard = Some(updated.clone());
        Ok(updated)
    }
}

// ============================================================================
// SECTION: Static License Source
// ============================================================================

/// License source returning a fixed outcome, for tests and examples.
#[derive(Debug, Clone)]
pub struct StaticLicenseSource {
    /// Outcome returned by every load.
    outcome: LoadedLicense,
}

impl StaticLicenseSource {
    /// Creates a source that always returns the given validated license.
    #[must_use]
    pub fn valid(license: License) -> Self {
        Self {
            outcome: LoadedLicense::Valid(license),
        }
    }

    /// Creates a source that never finds license material.
    #[must_use]
    pub const fn absent() -> Self {
        Self {
            outcome: LoadedLicense::Absent,
        }
    }

    /// Creates a source returning the given outcome.
    #[must_use]
    pub fn with_outcome(outcome: LoadedLicense) -> Self {
        Self {
            outcome,
        }
    }
}

impl LicenseSource for StaticLicenseSource {
    fn load(&self) -> LoadedLicense {
        self.outcome.clone()
    }

    fn exists(&self) -> bool {
        !matches!(self.outcome, LoadedLicense::Absent)
    }

    fn location(&self) -> String {
        "static license source".to_string()
    }
}
