// crates/catalyst-gate-core/src/core/runrate.rs
// ============================================================================
// Module: Catalyst Gate Run Rate Model
// Description: Derived projection of annual usage from the observed pace.
// Purpose: Predict whether the current execution rate will exceed the limit.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! A [`RunRate`] compares the observed daily execution rate against the rate
//! the annual limit allows (limit / 365) and projects the year-end total.
//! It is computed fresh from usage data, the license, and `today`; it is
//! never persisted and never mutated.
//!
//! Projections need at least 7 days of data to be reliable; callers must
//! check [`RunRate::sufficient_data`] before acting on them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use time::Date;

use crate::core::dates::iso_date_option;

// ============================================================================
// SECTION: Run Rate Record
// ============================================================================

/// Immutable projection of annual usage based on the current execution rate.
///
/// # Invariants
/// - `days_until_limit` and `projected_limit_date` are present only when the
///   rate ratio exceeds 1.0 (over pace) and both are absent otherwise.
/// - `days_elapsed >= 1` (the first execution day counts as day 1).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunRate {
    /// Observed execution rate (executions per day).
    pub current_rate: f64,
    /// Allowed execution rate (annual limit / 365).
    pub allowed_rate: f64,
    /// Ratio of current to allowed rate; values above 1.0 mean over pace.
    pub rate_ratio: f64,
    /// Projected year-end total at the current pace.
    pub projected_annual_total: u32,
    /// Projected total as a percentage of the annual limit.
    pub projected_percent: u32,
    /// Estimated days until the limit is reached; absent when not over pace.
    pub days_until_limit: Option<u32>,
    /// Projected date the limit will be reached; absent when not over pace.
    #[serde(skip_serializing_if = "Option::is_none", with = "iso_date_option")]
    pub projected_limit_date: Option<Date>,
    /// Days elapsed since the first execution, inclusive of both endpoints.
    pub days_elapsed: i64,
    /// Days remaining until license expiry; negative once expired.
    pub days_remaining: i64,
    /// True when at least the minimum observation window has elapsed.
    pub sufficient_data: bool,
    /// Current execution count.
    pub current_usage: u32,
    /// Annual execution limit.
    pub annual_limit: u32,
}

impl RunRate {
    /// Returns true if the current rate exceeds the allowed rate.
    #[must_use]
    pub fn is_over_pace(&self) -> bool {
        self.rate_ratio > 1.0
    }

    /// Returns true if 20-50% over pace (moderate warning band).
    #[must_use]
    pub fn is_moderately_over_pace(&self) -> bool {
        self.rate_ratio >= 1.2 && self.rate_ratio < 1.5
    }

    /// Returns true if 50% or more over pace (severe warning band).
    #[must_use]
    pub fn is_severely_over_pace(&self) -> bool {
        self.rate_ratio >= 1.5
    }

    /// Returns the rounded percentage over pace (0 when at or under pace).
    #[must_use]
    pub fn over_pace_percent(&self) -> u32 {
        if self.rate_ratio <= 1.0 {
            return 0;
        }
        round_ratio_percent(self.rate_ratio - 1.0)
    }

    /// Returns the executions remaining before the limit is hit.
    #[must_use]
    pub const fn remaining_executions(&self) -> u32 {
        self.annual_limit.saturating_sub(self.current_usage)
    }
}

// ============================================================================
// SECTION: Numeric Helpers
// ============================================================================

/// Rounds a non-negative ratio to a whole percentage.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is clamped to the u32 range before the cast."
)]
#[must_use]
fn round_ratio_percent(ratio: f64) -> u32 {
    (ratio * 100.0).round().clamp(0.0, f64::from(u32::MAX)) as u32
}
