// crates/catalyst-gate-core/src/runtime/limp.rs
// ============================================================================
// Module: Catalyst Gate Limp Mode Evaluator
// Description: Trigger detection and grace-period state machine.
// Purpose: Derive the current trigger and punitive level from elapsed days.
// Dependencies: crate::core, crate::config, time
// ============================================================================

//! ## Overview
//! All three triggers share one 90-day escalation path driven purely by
//! grace days elapsed since the trigger first activated. Trigger evaluation
//! runs fresh on every call with first match wins: missing license, then
//! expired license, then exceeded limit. A trigger that was never recorded
//! activates today (day 1); the machine does not backdate activation to when
//! the underlying condition may have silently begun.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;

use crate::config::EnforcementConfig;
use crate::core::EnforcementStatus;
use crate::core::EnforcementTrigger;
use crate::core::License;
use crate::core::LimpMode;
use crate::core::UsageData;
use crate::core::days_between;

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Evaluates enforcement triggers and the grace-period state machine.
#[derive(Debug, Clone, Default)]
pub struct LimpModeEvaluator {
    /// Grace duration used for days-remaining calculations.
    config: EnforcementConfig,
}

impl LimpModeEvaluator {
    /// Creates an evaluator with the given configuration.
    #[must_use]
    pub const fn new(config: EnforcementConfig) -> Self {
        Self {
            config,
        }
    }

    /// Determines which trigger condition, if any, is currently active.
    ///
    /// First match wins: no license, expired license, limit exceeded.
    #[must_use]
    pub fn evaluate_trigger(
        &self,
        license_exists: bool,
        license: Option<&License>,
        executions_used: u32,
        today: Date,
    ) -> Option<EnforcementTrigger> {
        let Some(license) = license else {
            return Some(EnforcementTrigger::NoLicense);
        };
        if !license_exists {
            return Some(EnforcementTrigger::NoLicense);
        }
        if license.is_expired(today) {
            return Some(EnforcementTrigger::Expired);
        }
        if executions_used > license.annual_limit {
            return Some(EnforcementTrigger::LimitExceeded);
        }
        None
    }

    /// Returns the number of grace days elapsed as of `today`.
    ///
    /// The activation day counts as day 1; once a trigger is recorded the
    /// result is clamped to at least 1. Zero when no activation is recorded.
    #[must_use]
    pub fn grace_days_elapsed(&self, usage: &UsageData, today: Date) -> i64 {
        usage.trigger_activated.map_or(0, |activated| {
            days_between(activated, today).saturating_add(1).max(1)
        })
    }

    /// Returns the grace days remaining before disablement (never negative).
    #[must_use]
    pub fn grace_days_remaining(&self, grace_days_elapsed: i64) -> i64 {
        (self.config.grace_total_days - grace_days_elapsed).max(0)
    }

    /// Returns true when the limp mode changed relative to the previous one.
    ///
    /// Entering the first step (`None -> Status1`) counts as a transition.
    #[must_use]
    pub fn is_step_transition(&self, previous: LimpMode, current: LimpMode) -> bool {
        previous != current
    }

    /// Evaluates the complete enforcement status for `today`.
    #[must_use]
    pub fn evaluate(
        &self,
        license_exists: bool,
        license: Option<&License>,
        usage: &UsageData,
        executions_used: u32,
        today: Date,
    ) -> EnforcementStatus {
        let Some(trigger) = self.evaluate_trigger(license_exists, license, executions_used, today)
        else {
            return EnforcementStatus::normal(license.cloned(), executions_used, None);
        };

        // A trigger with no recorded activation is newly detected: day 1.
        let grace_days_elapsed = if usage.trigger_activated.is_some() {
            self.grace_days_elapsed(usage, today)
        } else {
            1
        };

        let limp_mode = LimpMode::from_grace_days(grace_days_elapsed);
        let step_transition = self.is_step_transition(usage.last_limp_mode, limp_mode);

        if limp_mode.is_blocked() {
            return EnforcementStatus::disabled(
                license.cloned(),
                executions_used,
                trigger,
                grace_days_elapsed,
            );
        }

        EnforcementStatus::limp_mode(
            license.cloned(),
            executions_used,
            limp_mode,
            trigger,
            grace_days_elapsed,
            self.grace_days_remaining(grace_days_elapsed),
            step_transition,
        )
    }
}
