// crates/catalyst-gate-core/src/runtime/pregrace.rs
// ============================================================================
// Module: Catalyst Gate Pre-Grace Evaluator
// Description: Advisory warning policy for expiry and usage pace.
// Purpose: Decide warning frequency before any enforcement trigger activates.
// Dependencies: crate::core, crate::config, time
// ============================================================================

//! ## Overview
//! Pre-grace warnings are advisories, not penalties: they fire while the
//! license is still valid and under its limit. Two independent policies
//! (expiry proximity and usage pace) each yield an [`AlertLevel`]; the
//! combined level is the more severe of the two.
//!
//! These are stateless policy functions. Throttling is applied by the
//! logger, never here; identical inputs always yield identical levels.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;

use crate::config::EnforcementConfig;
use crate::core::AlertLevel;
use crate::core::License;
use crate::core::RunRate;

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Evaluates pre-grace warning conditions.
#[derive(Debug, Clone, Default)]
pub struct PreGraceEvaluator {
    /// Warning band thresholds.
    config: EnforcementConfig,
}

impl PreGraceEvaluator {
    /// Creates an evaluator with the given configuration.
    #[must_use]
    pub const fn new(config: EnforcementConfig) -> Self {
        Self {
            config,
        }
    }

    /// Evaluates the license expiry warning level as of `today`.
    ///
    /// Default bands: weekly for 61-90 days remaining, daily for 31-60,
    /// every execution for 1-30. At or past expiry the state machine takes
    /// over and no pre-grace warning fires.
    #[must_use]
    pub fn evaluate_expiry_warning(&self, license: &License, today: Date) -> AlertLevel {
        let days_remaining = license.days_until_expiry(today);

        if days_remaining <= 0 || days_remaining > self.config.expiry_warn_weekly_days {
            return AlertLevel::None;
        }
        if days_remaining <= self.config.expiry_warn_every_days {
            return AlertLevel::ErrorEvery;
        }
        if days_remaining <= self.config.expiry_warn_daily_days {
            return AlertLevel::WarnDaily;
        }
        AlertLevel::WarnWeekly
    }

    /// Evaluates the run rate warning level.
    ///
    /// Default bands: weekly for 20-50% over pace, daily for 50%+ over.
    /// Projections below the minimum observation window are ignored.
    #[must_use]
    pub fn evaluate_run_rate_warning(&self, run_rate: Option<&RunRate>) -> AlertLevel {
        let Some(run_rate) = run_rate else {
            return AlertLevel::None;
        };
        if !run_rate.sufficient_data {
            return AlertLevel::None;
        }

        if run_rate.rate_ratio >= self.config.severe_over_pace_ratio {
            return AlertLevel::WarnDaily;
        }
        if run_rate.rate_ratio >= self.config.moderate_over_pace_ratio {
            return AlertLevel::WarnWeekly;
        }
        AlertLevel::None
    }

    /// Evaluates both warnings and returns the combined (more severe) level.
    #[must_use]
    pub fn evaluate(
        &self,
        license: &License,
        run_rate: Option<&RunRate>,
        today: Date,
    ) -> AlertLevel {
        let expiry = self.evaluate_expiry_warning(license, today);
        let pace = self.evaluate_run_rate_warning(run_rate);
        AlertLevel::most_severe(expiry, pace)
    }
}
