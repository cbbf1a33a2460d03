// crates/catalyst-gate-core/src/config.rs
// ============================================================================
// Module: Catalyst Gate Enforcement Configuration
// Description: Thresholds for grace steps, expiry warnings, and pace warnings.
// Purpose: Provide production defaults with per-field overrides for testing.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`EnforcementConfig`] collects every tunable threshold in one place. The
//! defaults are the production values; tests override individual fields.
//! The limp-mode day table itself is normative and lives on
//! [`crate::core::LimpMode::from_grace_days`]; this config carries the total
//! grace duration used for days-remaining display and the warning bands.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Days in a year for rate calculations.
pub const DAYS_IN_YEAR: u32 = 365;

/// Default total grace period duration in days.
const fn default_grace_total_days() -> i64 {
    90
}

/// Default end of the first grace step (days 1-30).
const fn default_grace_step1_days() -> i64 {
    30
}

/// Default end of the second grace step (days 31-60).
const fn default_grace_step2_days() -> i64 {
    60
}

/// Default days before expiry to start weekly warnings.
const fn default_expiry_warn_weekly_days() -> i64 {
    90
}

/// Default days before expiry to start daily warnings.
const fn default_expiry_warn_daily_days() -> i64 {
    60
}

/// Default days before expiry to warn on every execution.
const fn default_expiry_warn_every_days() -> i64 {
    30
}

/// Default rate ratio for weekly over-pace warnings (20% over).
const fn default_moderate_over_pace_ratio() -> f64 {
    1.20
}

/// Default rate ratio for daily over-pace warnings (50% over).
const fn default_severe_over_pace_ratio() -> f64 {
    1.50
}

/// Default minimum days of data for reliable run rate projection.
const fn default_min_days_for_run_rate() -> i64 {
    7
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Enforcement threshold configuration.
///
/// # Invariants
/// - Day thresholds are interpreted as whole calendar days.
/// - `moderate_over_pace_ratio <= severe_over_pace_ratio` is assumed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnforcementConfig {
    /// Total grace period duration in days.
    #[serde(default = "default_grace_total_days")]
    pub grace_total_days: i64,
    /// End of the first grace step.
    #[serde(default = "default_grace_step1_days")]
    pub grace_step1_days: i64,
    /// End of the second grace step.
    #[serde(default = "default_grace_step2_days")]
    pub grace_step2_days: i64,
    /// Days before expiry at which weekly warnings begin.
    #[serde(default = "default_expiry_warn_weekly_days")]
    pub expiry_warn_weekly_days: i64,
    /// Days before expiry at which daily warnings begin.
    #[serde(default = "default_expiry_warn_daily_days")]
    pub expiry_warn_daily_days: i64,
    /// Days before expiry at which every execution warns.
    #[serde(default = "default_expiry_warn_every_days")]
    pub expiry_warn_every_days: i64,
    /// Rate ratio at which weekly over-pace warnings begin.
    #[serde(default = "default_moderate_over_pace_ratio")]
    pub moderate_over_pace_ratio: f64,
    /// Rate ratio at which daily over-pace warnings begin.
    #[serde(default = "default_severe_over_pace_ratio")]
    pub severe_over_pace_ratio: f64,
    /// Minimum days of data required before projections are acted on.
    #[serde(default = "default_min_days_for_run_rate")]
    pub min_days_for_run_rate: i64,
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            grace_total_days: default_grace_total_days(),
            grace_step1_days: default_grace_step1_days(),
            grace_step2_days: default_grace_step2_days(),
            expiry_warn_weekly_days: default_expiry_warn_weekly_days(),
            expiry_warn_daily_days: default_expiry_warn_daily_days(),
            expiry_warn_every_days: default_expiry_warn_every_days(),
            moderate_over_pace_ratio: default_moderate_over_pace_ratio(),
            severe_over_pace_ratio: default_severe_over_pace_ratio(),
            min_days_for_run_rate: default_min_days_for_run_rate(),
        }
    }
}
