// crates/catalyst-gate-core/src/core/usage.rs
// ============================================================================
// Module: Catalyst Gate Usage Record
// Description: Versioned, per-year execution and enforcement state record.
// Purpose: Capture the persisted state mutated on every tracked execution.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! One [`UsageData`] record tracks a single calendar year. Every execution,
//! warning, or enforcement transition produces a new immutable copy via the
//! `with_*` helpers; stores persist each copy. Records are superseded on
//! year rollover, never deleted.
//!
//! The file schema uses camelCase field names and omits absent optionals so
//! they round-trip as absent rather than as sentinel values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::Date;

use crate::core::dates::iso_date;
use crate::core::dates::iso_date_option;
use crate::core::enforcement::EnforcementTrigger;
use crate::core::enforcement::LimpMode;
use crate::core::license::License;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Current schema version for the usage file.
pub const CURRENT_USAGE_VERSION: u32 = 1;

// ============================================================================
// SECTION: Usage Record
// ============================================================================

/// Persisted usage and enforcement state for one calendar year.
///
/// # Invariants
/// - `count >= 1` once created.
/// - A grace period is active iff both `trigger_activated` and
///   `active_trigger` are present (both-or-neither).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageData {
    /// Schema version of the record.
    pub version: u32,
    /// License key the record is associated with, absent when unlicensed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_key: Option<String>,
    /// Calendar year this record tracks.
    pub year: i32,
    /// Execution count for the year.
    pub count: u32,
    /// Date of the first execution in the year.
    #[serde(with = "iso_date")]
    pub first_execution: Date,
    /// Date of the most recent execution.
    #[serde(with = "iso_date")]
    pub last_execution: Date,
    /// Date the missing-license condition was first detected.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_date_option")]
    pub no_license_detected: Option<Date>,
    /// Date the active trigger was first detected (grace day 1).
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_date_option")]
    pub trigger_activated: Option<Date>,
    /// The trigger currently driving the grace period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_trigger: Option<EnforcementTrigger>,
    /// The last limp mode applied by the engine.
    #[serde(default)]
    pub last_limp_mode: LimpMode,
    /// Date of the last daily-throttled warning.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_date_option")]
    pub last_daily_warn: Option<Date>,
    /// Date of the last weekly-throttled warning.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "iso_date_option")]
    pub last_weekly_warn: Option<Date>,
}

impl UsageData {
    /// Creates the initial record for a licensed year.
    #[must_use]
    pub fn initial(license_key: impl Into<String>, year: i32, today: Date) -> Self {
        Self {
            version: CURRENT_USAGE_VERSION,
            license_key: Some(license_key.into()),
            year,
            count: 1,
            first_execution: today,
            last_execution: today,
            no_license_detected: None,
            trigger_activated: None,
            active_trigger: None,
            last_limp_mode: LimpMode::None,
            last_daily_warn: None,
            last_weekly_warn: None,
        }
    }

    /// Creates the initial record for an unlicensed year.
    ///
    /// The record starts already in grace: the missing-license trigger is
    /// active as of `today` (day 1) at [`LimpMode::Status1`].
    #[must_use]
    pub fn initial_no_license(year: i32, today: Date) -> Self {
        Self {
            version: CURRENT_USAGE_VERSION,
            license_key: None,
            year,
            count: 1,
            first_execution: today,
            last_execution: today,
            no_license_detected: Some(today),
            trigger_activated: Some(today),
            active_trigger: Some(EnforcementTrigger::NoLicense),
            last_limp_mode: LimpMode::Status1,
            last_daily_warn: None,
            last_weekly_warn: None,
        }
    }

    /// Applies the per-execution advance rule to an optional existing record.
    ///
    /// Missing record or year rollover yields a brand-new record (clean when
    /// a license is present, no-license grace otherwise); a same-year record
    /// is incremented.
    #[must_use]
    pub fn advance(existing: Option<Self>, license: Option<&License>, today: Date) -> Self {
        let year = today.year();
        match existing {
            Some(current) if current.year == year => current.with_incremented_count(today),
            _ => license.map_or_else(
                || Self::initial_no_license(year, today),
                |license| Self::initial(license.key.clone(), year, today),
            ),
        }
    }

    /// Returns a copy with the count incremented and last execution updated.
    #[must_use]
    pub fn with_incremented_count(self, today: Date) -> Self {
        Self {
            count: self.count.saturating_add(1),
            last_execution: today,
            ..self
        }
    }

    /// Returns a copy with a grace period started for the given trigger.
    ///
    /// The missing-license detection date is recorded only for the
    /// [`EnforcementTrigger::NoLicense`] trigger.
    #[must_use]
    pub fn with_grace_period_started(self, today: Date, trigger: EnforcementTrigger) -> Self {
        let no_license_detected = if trigger == EnforcementTrigger::NoLicense {
            Some(today)
        } else {
            self.no_license_detected
        };
        Self {
            trigger_activated: Some(today),
            active_trigger: Some(trigger),
            last_limp_mode: LimpMode::Status1,
            no_license_detected,
            ..self
        }
    }

    /// Returns a copy with all grace fields cleared in one step (recovery).
    #[must_use]
    pub fn with_grace_period_cleared(self) -> Self {
        Self {
            trigger_activated: None,
            active_trigger: None,
            no_license_detected: None,
            last_limp_mode: LimpMode::None,
            ..self
        }
    }

    /// Returns a copy with the last applied limp mode updated.
    #[must_use]
    pub fn with_limp_mode(self, limp_mode: LimpMode) -> Self {
        Self {
            last_limp_mode: limp_mode,
            ..self
        }
    }

    /// Returns a copy with the last daily warning date updated.
    #[must_use]
    pub fn with_daily_warn_date(self, date: Option<Date>) -> Self {
        Self {
            last_daily_warn: date,
            ..self
        }
    }

    /// Returns a copy with the last weekly warning date updated.
    #[must_use]
    pub fn with_weekly_warn_date(self, date: Option<Date>) -> Self {
        Self {
            last_weekly_warn: date,
            ..self
        }
    }

    /// Returns true if a grace period is currently active.
    #[must_use]
    pub const fn in_grace_period(&self) -> bool {
        self.trigger_activated.is_some() && self.active_trigger.is_some()
    }
}
