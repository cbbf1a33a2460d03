// crates/catalyst-gate-core/src/runtime/logger.rs
// ============================================================================
// Module: Catalyst Gate Enforcement Logger
// Description: Throttle-aware routing of enforcement messages to a sink.
// Purpose: Log every required warning exactly as often as its level allows.
// Dependencies: crate::core, crate::interfaces, crate::runtime::{messages, throttle}
// ============================================================================

//! ## Overview
//! The logger owns the throttler and the output sink. Weekly and daily
//! warnings consult the throttler before emitting and record the log date on
//! success; every-execution warnings bypass throttling entirely. Transitions
//! use the bordered box shapes, steady-state notices the single-line shapes.
//!
//! The throttler must be seeded from the persisted usage record at the start
//! of each engine call so suppression survives restarts; the engine is
//! responsible for folding recorded dates back into the usage record.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;

use time::Date;

use crate::core::AlertLevel;
use crate::core::EnforcementStatus;
use crate::core::EnforcementTrigger;
use crate::core::License;
use crate::core::LicenseParseError;
use crate::core::RunRate;
use crate::core::UsageData;
use crate::interfaces::EnforcementLog;
use crate::interfaces::LogLevel;
use crate::runtime::messages;
use crate::runtime::throttle::LogThrottler;

// ============================================================================
// SECTION: Logger
// ============================================================================

/// Formats and logs all enforcement messages through a sink.
pub struct EnforcementLogger {
    /// Throttle state guarded for concurrent engine callers.
    throttler: Mutex<LogThrottler>,
    /// Output sink for operator-facing messages.
    sink: Box<dyn EnforcementLog>,
}

impl EnforcementLogger {
    /// Creates a logger over the given sink with an empty throttler.
    #[must_use]
    pub fn new(sink: Box<dyn EnforcementLog>) -> Self {
        Self {
            throttler: Mutex::new(LogThrottler::new()),
            sink,
        }
    }

    /// Seeds the throttler from persisted usage data.
    pub fn seed_throttler(&self, usage: &UsageData) {
        if let Ok(mut throttler) = self.throttler.lock() {
            throttler.seed_from(usage);
        }
    }

    /// Returns the current (weekly, daily) last-logged dates.
    #[must_use]
    pub fn throttle_dates(&self) -> (Option<Date>, Option<Date>) {
        self.throttler.lock().map_or((None, None), |throttler| {
            (throttler.last_weekly_log_date(), throttler.last_daily_log_date())
        })
    }

    // ========================================================================
    // SECTION: Pre-Grace Warnings
    // ========================================================================

    /// Logs an expiry warning if throttling allows; returns whether it logged.
    pub fn log_expiry_warning(
        &self,
        license: &License,
        days_remaining: i64,
        level: AlertLevel,
        today: Date,
    ) -> bool {
        if !self.should_log(level, today) {
            return false;
        }
        let message = messages::expiry_warning(license, days_remaining);
        self.emit_at(level, &message);
        self.record_log(level, today);
        true
    }

    /// Logs a run rate warning if throttling allows; returns whether it logged.
    pub fn log_run_rate_warning(
        &self,
        run_rate: &RunRate,
        level: AlertLevel,
        today: Date,
    ) -> bool {
        if !self.should_log(level, today) {
            return false;
        }
        let message = messages::run_rate_warning(run_rate);
        self.emit_at(level, &message);
        self.record_log(level, today);
        true
    }

    // ========================================================================
    // SECTION: Limp Mode and Terminal Messages
    // ========================================================================

    /// Logs a limp-mode step transition (box message, never throttled).
    pub fn log_limp_mode_transition(&self, status: &EnforcementStatus) {
        self.sink.emit(LogLevel::Error, &messages::limp_mode_box(status));
    }

    /// Logs the steady-state per-execution grace line (never throttled).
    pub fn log_limp_mode_per_execution(&self, status: &EnforcementStatus) {
        self.sink.emit(LogLevel::Warn, &messages::grace_status(status));
    }

    /// Logs the disabled box.
    pub fn log_disabled(&self, trigger: EnforcementTrigger) {
        self.sink.emit(LogLevel::Error, &messages::disabled_box(trigger));
    }

    /// Logs the recovery box.
    pub fn log_recovery(&self, license: &License, executions_used: u32, year: i32) {
        self.sink.emit(LogLevel::Info, &messages::recovery_box(license, executions_used, year));
    }

    // ========================================================================
    // SECTION: License Status Messages
    // ========================================================================

    /// Logs that a license was loaded successfully.
    pub fn log_license_loaded(&self, license: &License) {
        self.sink.emit(LogLevel::Info, &messages::license_loaded(license));
    }

    /// Logs that no license material was found.
    pub fn log_no_license_found(&self, location: &str) {
        self.sink.emit(LogLevel::Warn, &messages::no_license_found(location));
    }

    /// Logs that a license key was present but failed validation.
    pub fn log_license_rejected(&self, error: &LicenseParseError) {
        self.sink.emit(
            LogLevel::Error,
            &messages::license_rejected(error.reason_code(), &error.to_string()),
        );
    }

    // ========================================================================
    // SECTION: Throttle Helpers
    // ========================================================================

    /// Returns true if a message at the level may be logged as of `today`.
    fn should_log(&self, level: AlertLevel, today: Date) -> bool {
        let Ok(throttler) = self.throttler.lock() else {
            return false;
        };
        match level {
            AlertLevel::None => false,
            AlertLevel::WarnWeekly => throttler.should_log_weekly(today),
            AlertLevel::WarnDaily => throttler.should_log_daily(today),
            AlertLevel::ErrorEvery => true,
        }
    }

    /// Records a successful log at the level.
    fn record_log(&self, level: AlertLevel, today: Date) {
        let Ok(mut throttler) = self.throttler.lock() else {
            return;
        };
        match level {
            AlertLevel::WarnWeekly => {
                throttler.record_weekly(today);
            }
            AlertLevel::WarnDaily => {
                throttler.record_daily(today);
            }
            AlertLevel::None | AlertLevel::ErrorEvery => {}
        }
    }

    /// Emits a message at the sink level matching the alert level.
    fn emit_at(&self, level: AlertLevel, message: &str) {
        let sink_level =
            if level == AlertLevel::ErrorEvery { LogLevel::Error } else { LogLevel::Warn };
        self.sink.emit(sink_level, message);
    }
}
