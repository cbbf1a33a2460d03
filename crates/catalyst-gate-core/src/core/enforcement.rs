// crates/catalyst-gate-core/src/core/enforcement.rs
// ============================================================================
// Module: Catalyst Gate Enforcement Model
// Description: Triggers, limp modes, alert levels, and per-call status.
// Purpose: Provide the closed enforcement vocabulary with behavior tables.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Enforcement is described by three closed sets: the trigger that started a
//! grace period, the limp mode derived from grace days elapsed, and the
//! alert level for pre-grace warnings. Each set carries its behavior table
//! (delays, headlines, remediation URLs) on the enum itself so adding a
//! variant is a compile-time-checked change.
//! Wire names keep the SCREAMING_SNAKE spellings of the original usage-file
//! format so existing files load unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::core::license::License;
use crate::core::runrate::RunRate;

// ============================================================================
// SECTION: Enforcement Triggers
// ============================================================================

/// The three conditions that can start a grace period.
///
/// All triggers share one 90-day graduated escalation path; at most one is
/// active at a time, evaluated in declaration order with first match wins.
///
/// # Invariants
/// - Variants are stable for serialization and usage-file compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnforcementTrigger {
    /// No license file found, or the license failed to load or validate.
    NoLicense,
    /// The license has passed its expiry date.
    Expired,
    /// The annual execution count has exceeded the license limit.
    LimitExceeded,
}

impl EnforcementTrigger {
    /// Returns a human-readable description of the trigger.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::NoLicense => "no license",
            Self::Expired => "license expired",
            Self::LimitExceeded => "limit exceeded",
        }
    }

    /// Returns the URL where the operator can remedy this trigger.
    #[must_use]
    pub const fn action_url(self) -> &'static str {
        match self {
            Self::NoLicense => "https://catalyst.io/pricing",
            Self::Expired => "https://catalyst.io/renew",
            Self::LimitExceeded => "https://catalyst.io/upgrade",
        }
    }
}

// ============================================================================
// SECTION: Limp Modes
// ============================================================================

/// Graduated enforcement levels with Fibonacci-spaced delays.
///
/// Delays step through 3, 8, and 21 seconds so each escalation is a
/// noticeable change, then the service blocks entirely:
/// - days 1-30: [`Self::Status1`] (3 s delay)
/// - days 31-60: [`Self::Status2`] (8 s delay)
/// - days 61-90: [`Self::Status3`] (21 s delay)
/// - days 91+: [`Self::Disabled`] (blocked)
///
/// # Invariants
/// - Declaration order is the escalation order; `Ord` follows it.
/// - Variants are stable for serialization and usage-file compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LimpMode {
    /// Normal operation, no enforcement active.
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// Days 1-30: service degraded, 3 second delay per execution.
    #[serde(rename = "STATUS_1")]
    Status1,
    /// Days 31-60: service impaired, 8 second delay per execution.
    #[serde(rename = "STATUS_2")]
    Status2,
    /// Days 61-90: service critical, 21 second delay per execution.
    #[serde(rename = "STATUS_3")]
    Status3,
    /// Days 91+: service blocked entirely.
    #[serde(rename = "DISABLED")]
    Disabled,
}

impl LimpMode {
    /// Returns the numeric level (0-4).
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Status1 => 1,
            Self::Status2 => 2,
            Self::Status3 => 3,
            Self::Disabled => 4,
        }
    }

    /// Returns the per-execution delay for degraded modes.
    ///
    /// `None` for [`Self::None`] (no penalty) and [`Self::Disabled`]
    /// (blocked outright; the penalty is effectively infinite).
    #[must_use]
    pub const fn delay(self) -> Option<Duration> {
        match self {
            Self::None | Self::Disabled => None,
            Self::Status1 => Some(Duration::from_millis(3_000)),
            Self::Status2 => Some(Duration::from_millis(8_000)),
            Self::Status3 => Some(Duration::from_millis(21_000)),
        }
    }

    /// Returns the headline for operator log messages.
    #[must_use]
    pub const fn headline(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Status1 => Some("SERVICE DEGRADED"),
            Self::Status2 => Some("SERVICE IMPAIRED"),
            Self::Status3 => Some("SERVICE CRITICAL"),
            Self::Disabled => Some("SERVICE UNAVAILABLE"),
        }
    }

    /// Returns true if the service is blocked entirely.
    #[must_use]
    pub const fn is_blocked(self) -> bool {
        matches!(self, Self::Disabled)
    }

    /// Returns true if a delay applies (`Status1`, `Status2`, or `Status3`).
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Status1 | Self::Status2 | Self::Status3)
    }

    /// Returns true if any enforcement is active (not [`Self::None`]).
    #[must_use]
    pub const fn is_enforced(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Determines the limp mode for the given number of grace days elapsed.
    ///
    /// Day 1 is the activation day; day 91 is the first disabled day.
    #[must_use]
    pub const fn from_grace_days(grace_days: i64) -> Self {
        if grace_days <= 0 {
            Self::None
        } else if grace_days <= 30 {
            Self::Status1
        } else if grace_days <= 60 {
            Self::Status2
        } else if grace_days <= 90 {
            Self::Status3
        } else {
            Self::Disabled
        }
    }
}

// ============================================================================
// SECTION: Alert Levels
// ============================================================================

/// Logging frequency for pre-grace warnings.
///
/// # Invariants
/// - Declaration order is severity order; `Ord` follows it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    /// No warning required.
    #[default]
    None,
    /// Log at most once per week.
    WarnWeekly,
    /// Log at most once per calendar day.
    WarnDaily,
    /// Log on every execution, never throttled.
    ErrorEvery,
}

impl AlertLevel {
    /// Returns the more severe of two alert levels.
    #[must_use]
    pub fn most_severe(a: Self, b: Self) -> Self {
        a.max(b)
    }
}

// ============================================================================
// SECTION: Enforcement Status
// ============================================================================

/// Complete enforcement state for one `enforce()` call.
///
/// Derived fresh per call and never persisted as such; the relevant fields
/// are folded into the usage record by the engine.
///
/// # Invariants
/// - `trigger` is present whenever `limp_mode` is enforced.
/// - `grace_days_remaining` is zero once blocked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnforcementStatus {
    /// Current license, absent when no valid license exists.
    pub license: Option<License>,
    /// Execution count for the tracked year, including this call.
    pub executions_used: u32,
    /// Run rate projection when one was computed.
    pub run_rate: Option<RunRate>,
    /// Current limp mode.
    pub limp_mode: LimpMode,
    /// Active enforcement trigger, if any.
    pub trigger: Option<EnforcementTrigger>,
    /// Days elapsed in the grace period (day 1 is the activation day).
    pub grace_days_elapsed: i64,
    /// Days remaining before disablement.
    pub grace_days_remaining: i64,
    /// True when the limp mode changed relative to the persisted mode.
    pub step_transition: bool,
    /// Combined pre-grace warning level.
    pub pre_grace_alert: AlertLevel,
}

impl EnforcementStatus {
    /// Creates a status for normal operation with no enforcement.
    #[must_use]
    pub fn normal(license: Option<License>, executions_used: u32, run_rate: Option<RunRate>) -> Self {
        Self {
            license,
            executions_used,
            run_rate,
            limp_mode: LimpMode::None,
            trigger: None,
            grace_days_elapsed: 0,
            grace_days_remaining: 0,
            step_transition: false,
            pre_grace_alert: AlertLevel::None,
        }
    }

    /// Creates a status carrying a pre-grace warning.
    #[must_use]
    pub fn warning(
        license: Option<License>,
        executions_used: u32,
        run_rate: Option<RunRate>,
        alert: AlertLevel,
    ) -> Self {
        Self {
            pre_grace_alert: alert,
            ..Self::normal(license, executions_used, run_rate)
        }
    }

    /// Creates a status for an active (degraded) limp mode.
    #[must_use]
    pub fn limp_mode(
        license: Option<License>,
        executions_used: u32,
        limp_mode: LimpMode,
        trigger: EnforcementTrigger,
        grace_days_elapsed: i64,
        grace_days_remaining: i64,
        step_transition: bool,
    ) -> Self {
        Self {
            license,
            executions_used,
            run_rate: None,
            limp_mode,
            trigger: Some(trigger),
            grace_days_elapsed,
            grace_days_remaining,
            step_transition,
            pre_grace_alert: AlertLevel::ErrorEvery,
        }
    }

    /// Creates a status for the disabled (blocked) state.
    #[must_use]
    pub fn disabled(
        license: Option<License>,
        executions_used: u32,
        trigger: EnforcementTrigger,
        grace_days_elapsed: i64,
    ) -> Self {
        Self {
            license,
            executions_used,
            run_rate: None,
            limp_mode: LimpMode::Disabled,
            trigger: Some(trigger),
            grace_days_elapsed,
            grace_days_remaining: 0,
            step_transition: false,
            pre_grace_alert: AlertLevel::ErrorEvery,
        }
    }

    /// Returns true if a delay should be applied for this call.
    #[must_use]
    pub const fn requires_delay(&self) -> bool {
        self.limp_mode.is_degraded()
    }

    /// Returns the delay to apply, if any.
    #[must_use]
    pub const fn delay(&self) -> Option<Duration> {
        self.limp_mode.delay()
    }

    /// Returns true if the service is blocked for this call.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.limp_mode.is_blocked()
    }

    /// Returns true if any enforcement is active (degraded or blocked).
    #[must_use]
    pub const fn is_enforced(&self) -> bool {
        self.limp_mode.is_enforced()
    }

    /// Returns true for normal operation with no warning and no enforcement.
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.limp_mode == LimpMode::None && self.pre_grace_alert == AlertLevel::None
    }

    /// Returns true when a pre-grace warning should be surfaced.
    #[must_use]
    pub fn has_pre_grace_warning(&self) -> bool {
        self.pre_grace_alert != AlertLevel::None
    }

    /// Returns true when the limp mode changed on this call.
    #[must_use]
    pub const fn is_step_transition(&self) -> bool {
        self.step_transition
    }
}
