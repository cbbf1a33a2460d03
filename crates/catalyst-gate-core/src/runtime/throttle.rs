// crates/catalyst-gate-core/src/runtime/throttle.rs
// ============================================================================
// Module: Catalyst Gate Log Throttler
// Description: Weekly and daily suppression of repeated warnings.
// Purpose: Keep warnings visible without ever spamming the log stream.
// Dependencies: crate::core, time
// ============================================================================

//! ## Overview
//! The throttler tracks when weekly- and daily-frequency warnings were last
//! logged. State is in-memory but seeded from the persisted usage record at
//! the start of every engine call, so throttling survives process restarts.
//! Every-execution warnings are never throttled and never recorded here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;

use crate::core::UsageData;
use crate::core::days_between;

// ============================================================================
// SECTION: Throttler
// ============================================================================

/// Tracks last-logged dates for weekly and daily warning frequencies.
///
/// # Invariants
/// - Dates only move forward via the `record_*` methods; seeding replaces
///   them wholesale from persisted state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogThrottler {
    /// Date of the last weekly-frequency warning.
    last_weekly: Option<Date>,
    /// Date of the last daily-frequency warning.
    last_daily: Option<Date>,
}

impl LogThrottler {
    /// Creates an empty throttler (everything eligible to log).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_weekly: None,
            last_daily: None,
        }
    }

    /// Seeds the throttler from persisted usage data.
    pub const fn seed_from(&mut self, usage: &UsageData) {
        self.last_weekly = usage.last_weekly_warn;
        self.last_daily = usage.last_daily_warn;
    }

    /// Returns true if a weekly warning may be logged as of `today`.
    ///
    /// Allowed when never logged or when 7 or more days have elapsed.
    #[must_use]
    pub fn should_log_weekly(&self, today: Date) -> bool {
        self.last_weekly.is_none_or(|last| days_between(last, today) >= 7)
    }

    /// Returns true if a daily warning may be logged as of `today`.
    ///
    /// Allowed when never logged or when `today` is a different calendar day.
    #[must_use]
    pub fn should_log_daily(&self, today: Date) -> bool {
        self.last_daily.is_none_or(|last| last != today)
    }

    /// Records that a weekly warning was logged and returns the date.
    pub const fn record_weekly(&mut self, today: Date) -> Date {
        self.last_weekly = Some(today);
        today
    }

    /// Records that a daily warning was logged and returns the date.
    pub const fn record_daily(&mut self, today: Date) -> Date {
        self.last_daily = Some(today);
        today
    }

    /// Returns the last weekly warning date, if any.
    #[must_use]
    pub const fn last_weekly_log_date(&self) -> Option<Date> {
        self.last_weekly
    }

    /// Returns the last daily warning date, if any.
    #[must_use]
    pub const fn last_daily_log_date(&self) -> Option<Date> {
        self.last_daily
    }

    /// Clears all throttle state.
    pub const fn reset(&mut self) {
        self.last_weekly = None;
        self.last_daily = None;
    }
}
