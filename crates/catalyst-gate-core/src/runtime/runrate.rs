// crates/catalyst-gate-core/src/runtime/runrate.rs
// ============================================================================
// Module: Catalyst Gate Run Rate Calculator
// Description: Pure projection of annual usage from usage data and a license.
// Purpose: Derive the RunRate record for a given date, deterministically.
// Dependencies: crate::core, crate::config, time
// ============================================================================

//! ## Overview
//! The calculator is a pure function of usage data, the license, and
//! `today`. Day one of usage counts as one elapsed day (inclusive of both
//! endpoints), which also guards the division on the first day.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;
use time::Duration;

use crate::config::DAYS_IN_YEAR;
use crate::config::EnforcementConfig;
use crate::core::License;
use crate::core::RunRate;
use crate::core::UsageData;
use crate::core::days_between;

// ============================================================================
// SECTION: Calculator
// ============================================================================

/// Calculates annual usage run rate and projections.
#[derive(Debug, Clone, Default)]
pub struct RunRateCalculator {
    /// Thresholds governing the minimum observation window.
    config: EnforcementConfig,
}

impl RunRateCalculator {
    /// Creates a calculator with the given configuration.
    #[must_use]
    pub const fn new(config: EnforcementConfig) -> Self {
        Self {
            config,
        }
    }

    /// Calculates the run rate projection as of `today`.
    #[must_use]
    pub fn calculate(&self, usage: &UsageData, license: &License, today: Date) -> RunRate {
        let executions_used = usage.count;
        let annual_limit = license.annual_limit;

        let days_elapsed = days_between(usage.first_execution, today).saturating_add(1).max(1);
        let days_remaining = days_between(today, license.expiry_date);
        let sufficient_data = days_elapsed >= self.config.min_days_for_run_rate;

        let current_rate = f64::from(executions_used) / days_as_f64(days_elapsed);
        let allowed_rate = f64::from(annual_limit) / f64::from(DAYS_IN_YEAR);
        let rate_ratio = if allowed_rate > 0.0 { current_rate / allowed_rate } else { 0.0 };

        let projected_annual_total = round_projection(current_rate * f64::from(DAYS_IN_YEAR));
        let projected_percent = if annual_limit == 0 {
            0
        } else {
            round_projection(
                f64::from(projected_annual_total) / f64::from(annual_limit) * 100.0,
            )
        };

        let (days_until_limit, projected_limit_date) = if rate_ratio > 1.0 && current_rate > 0.0 {
            let remaining = annual_limit.saturating_sub(executions_used);
            if remaining > 0 {
                let days = round_projection((f64::from(remaining) / current_rate).ceil());
                (Some(days), checked_future_date(today, days))
            } else {
                (Some(0), Some(today))
            }
        } else {
            (None, None)
        };

        RunRate {
            current_rate,
            allowed_rate,
            rate_ratio,
            projected_annual_total,
            projected_percent,
            days_until_limit,
            projected_limit_date,
            days_elapsed,
            days_remaining,
            sufficient_data,
            current_usage: executions_used,
            annual_limit,
        }
    }
}

// ============================================================================
// SECTION: Numeric Helpers
// ============================================================================

/// Converts a day count to `f64` for rate arithmetic.
#[allow(
    clippy::cast_precision_loss,
    reason = "Elapsed day counts are far below the f64 integer precision limit."
)]
const fn days_as_f64(days: i64) -> f64 {
    days as f64
}

/// Rounds a non-negative projection to the nearest whole count.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is clamped to the u32 range before the cast."
)]
fn round_projection(value: f64) -> u32 {
    value.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Returns `today + days`, saturating at the calendar boundary.
fn checked_future_date(today: Date, days: u32) -> Option<Date> {
    today.checked_add(Duration::days(i64::from(days)))
}
