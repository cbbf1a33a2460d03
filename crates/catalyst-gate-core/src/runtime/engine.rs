// crates/catalyst-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Catalyst Gate Enforcement Engine
// Description: Per-execution orchestration of the enforcement pipeline.
// Purpose: Compose license loading, usage tracking, evaluation, and penalties.
// Dependencies: crate::{config, core, interfaces, runtime}, thiserror, time
// ============================================================================

//! ## Overview
//! The engine is the single entry point the connector calls before each unit
//! of work. One call loads the cached license, atomically increments usage,
//! evaluates the trigger and limp mode, and either returns a status (after
//! logging any throttled warnings and applying a blocking delay when
//! degraded) or fails with the disabling trigger attached.
//!
//! The engine is instantiated once and invoked concurrently by caller
//! threads. The license cache and last-applied limp mode live behind one
//! mutex; the usage store serializes its own load-mutate-save sequence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use thiserror::Error;
use time::Date;
use time::OffsetDateTime;

use crate::config::EnforcementConfig;
use crate::core::AlertLevel;
use crate::core::EnforcementStatus;
use crate::core::EnforcementTrigger;
use crate::core::License;
use crate::core::LimpMode;
use crate::core::UsageData;
use crate::interfaces::EnforcementLog;
use crate::interfaces::LicenseSource;
use crate::interfaces::LoadedLicense;
use crate::interfaces::UsageStore;
use crate::interfaces::UsageStoreError;
use crate::runtime::delay::DelayEnforcer;
use crate::runtime::limp::LimpModeEvaluator;
use crate::runtime::logger::EnforcementLogger;
use crate::runtime::pregrace::PreGraceEvaluator;
use crate::runtime::runrate::RunRateCalculator;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Clock capability returning the current calendar date.
type ClockFn = Box<dyn Fn() -> Date + Send + Sync>;

/// Returns today's date from the system clock (UTC).
fn system_today() -> Date {
    OffsetDateTime::now_utc().date()
}

// ============================================================================
// SECTION: Engine State
// ============================================================================

/// Mutable engine state guarded by one mutex.
#[derive(Debug, Default)]
struct EngineState {
    /// Cached license from the first load attempt.
    cached_license: Option<License>,
    /// True once a load attempt (successful or not) happened.
    license_load_attempted: bool,
    /// Last limp mode this engine applied.
    last_limp_mode: LimpMode,
}

// ============================================================================
// SECTION: Enforcement Engine
// ============================================================================

/// Orchestrator for license enforcement, called once per unit of work.
pub struct EnforcementEngine<S, L> {
    /// Usage persistence implementation.
    store: S,
    /// License source implementation.
    license_source: L,
    /// Run rate projection calculator.
    run_rate: RunRateCalculator,
    /// Pre-grace warning policy.
    pre_grace: PreGraceEvaluator,
    /// Trigger and grace-period evaluator.
    limp: LimpModeEvaluator,
    /// Throttle-aware message logger.
    logger: EnforcementLogger,
    /// Blocking penalty delay.
    delay: DelayEnforcer,
    /// Clock capability supplying `today`.
    clock: ClockFn,
    /// License cache and last-applied mode behind one mutex.
    state: Mutex<EngineState>,
}

impl<S, L> EnforcementEngine<S, L>
where
    S: UsageStore,
    L: LicenseSource,
{
    /// Creates an engine with default configuration over the given seams.
    #[must_use]
    pub fn new(store: S, license_source: L, sink: Box<dyn EnforcementLog>) -> Self {
        Self::with_config(store, license_source, sink, EnforcementConfig::default())
    }

    /// Creates an engine with a custom configuration.
    #[must_use]
    pub fn with_config(
        store: S,
        license_source: L,
        sink: Box<dyn EnforcementLog>,
        config: EnforcementConfig,
    ) -> Self {
        Self {
            store,
            license_source,
            run_rate: RunRateCalculator::new(config.clone()),
            pre_grace: PreGraceEvaluator::new(config.clone()),
            limp: LimpModeEvaluator::new(config),
            logger: EnforcementLogger::new(sink),
            delay: DelayEnforcer::new(),
            clock: Box::new(system_today),
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Replaces the clock capability (for tests).
    #[must_use]
    pub fn with_clock(mut self, clock: ClockFn) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the sleep capability (for tests).
    #[must_use]
    pub fn with_sleeper(mut self, sleep: Box<dyn Fn(Duration) + Send + Sync>) -> Self {
        self.delay = DelayEnforcer::with_sleeper(sleep);
        self
    }

    /// Evaluates enforcement for one unit of work and applies any penalty.
    ///
    /// Increments the usage counter, evaluates the trigger and limp mode,
    /// logs what the throttle allows, blocks for the current delay when
    /// degraded, and persists every state change.
    ///
    /// # Errors
    ///
    /// Returns [`EnforceError::Disabled`] when the grace period is exhausted
    /// (the unit of work must not run) and [`EnforceError::Store`] when a
    /// count increment or state change could not be persisted.
    pub fn enforce(&self) -> Result<EnforcementStatus, EnforceError> {
        let today = (self.clock)();

        // Step 1: load license (cached after the first attempt).
        let license = self.load_license()?;

        // Step 2: increment usage and get the updated record.
        let usage = self.store.increment_and_get(license.as_ref(), today)?;

        // Step 3: seed the throttler from persisted state.
        self.logger.seed_throttler(&usage);

        // Step 4: evaluate the trigger and limp mode.
        let license_exists = self.license_source.exists();
        let status =
            self.limp.evaluate(license_exists, license.as_ref(), &usage, usage.count, today);

        // Step 5: act on the status.
        if status.is_blocked() {
            return Err(self.handle_disabled(&status, &usage)?);
        }
        if status.is_enforced() {
            self.handle_limp_mode(&status, &usage, today)?;
            return Ok(status);
        }
        self.handle_normal_operation(license.as_ref(), &usage, today, status)
    }

    /// Forces a license reload on the next `enforce()` call.
    ///
    /// Useful after an operator replaces the license file.
    ///
    /// # Errors
    ///
    /// Returns [`EnforceError::State`] when the engine state lock is
    /// poisoned.
    pub fn invalidate_license_cache(&self) -> Result<(), EnforceError> {
        let mut state = self.lock_state()?;
        state.cached_license = None;
        state.license_load_attempted = false;
        Ok(())
    }

    /// Returns the cached license, if one was loaded.
    ///
    /// # Errors
    ///
    /// Returns [`EnforceError::State`] when the engine state lock is
    /// poisoned.
    pub fn cached_license(&self) -> Result<Option<License>, EnforceError> {
        Ok(self.lock_state()?.cached_license.clone())
    }

    // ========================================================================
    // SECTION: Call Handling
    // ========================================================================

    /// Persists the disabled state, logs it, and builds the fatal error.
    fn handle_disabled(
        &self,
        status: &EnforcementStatus,
        usage: &UsageData,
    ) -> Result<EnforceError, EnforceError> {
        let updated = usage.clone().with_limp_mode(LimpMode::Disabled);
        self.store.save(&updated)?;

        let trigger = status.trigger.unwrap_or(EnforcementTrigger::NoLicense);
        self.logger.log_disabled(trigger);

        Ok(EnforceError::Disabled {
            trigger,
        })
    }

    /// Logs, persists, and delays for a degraded limp mode.
    fn handle_limp_mode(
        &self,
        status: &EnforcementStatus,
        usage: &UsageData,
        today: Date,
    ) -> Result<(), EnforceError> {
        if status.is_step_transition() {
            self.logger.log_limp_mode_transition(status);
        } else {
            self.logger.log_limp_mode_per_execution(status);
        }

        {
            let mut state = self.lock_state()?;
            if state.last_limp_mode != status.limp_mode {
                let mut updated = usage.clone();
                if usage.trigger_activated.is_none()
                    && let Some(trigger) = status.trigger
                {
                    updated = updated.with_grace_period_started(today, trigger);
                }
                let updated = updated.with_limp_mode(status.limp_mode);
                self.store.save(&updated)?;
                state.last_limp_mode = status.limp_mode;
            }
        }

        self.delay.enforce(status.limp_mode);
        Ok(())
    }

    /// Handles normal operation: pre-grace warnings and recovery.
    ///
    /// Returns the status enriched with the run rate projection and the
    /// combined pre-grace alert level.
    fn handle_normal_operation(
        &self,
        license: Option<&License>,
        usage: &UsageData,
        today: Date,
        status: EnforcementStatus,
    ) -> Result<EnforcementStatus, EnforceError> {
        let Some(license) = license else {
            return Ok(status);
        };

        let run_rate = self.run_rate.calculate(usage, license, today);
        let mut updated = usage.clone();

        let expiry_level = self.pre_grace.evaluate_expiry_warning(license, today);
        let rate_level = self.pre_grace.evaluate_run_rate_warning(Some(&run_rate));

        let mut logged = false;
        if expiry_level != AlertLevel::None {
            logged |= self.logger.log_expiry_warning(
                license,
                license.days_until_expiry(today),
                expiry_level,
                today,
            );
        }
        if rate_level != AlertLevel::None {
            logged |= self.logger.log_run_rate_warning(&run_rate, rate_level, today);
        }

        if logged {
            let (weekly, daily) = self.logger.throttle_dates();
            if weekly != usage.last_weekly_warn {
                updated = updated.with_weekly_warn_date(weekly);
            }
            if daily != usage.last_daily_warn {
                updated = updated.with_daily_warn_date(daily);
            }
        }

        // Recovery: the trigger cleared, so any remembered or persisted
        // degraded state is wiped in one step.
        let mut state = self.lock_state()?;
        let was_degraded = state.last_limp_mode != LimpMode::None
            || usage.last_limp_mode != LimpMode::None
            || usage.in_grace_period();
        if was_degraded {
            self.logger.log_recovery(license, usage.count, usage.year);
            updated = updated.with_grace_period_cleared();
            state.last_limp_mode = LimpMode::None;
        }
        drop(state);

        if updated != *usage {
            self.store.save(&updated)?;
        }

        Ok(EnforcementStatus::warning(
            status.license,
            status.executions_used,
            Some(run_rate),
            AlertLevel::most_severe(expiry_level, rate_level),
        ))
    }

    // ========================================================================
    // SECTION: License Cache
    // ========================================================================

    /// Loads the license, using the cached value after the first attempt.
    fn load_license(&self) -> Result<Option<License>, EnforceError> {
        let mut state = self.lock_state()?;
        if !state.license_load_attempted {
            match self.license_source.load() {
                LoadedLicense::Valid(license) => {
                    self.logger.log_license_loaded(&license);
                    state.cached_license = Some(license);
                }
                LoadedLicense::Absent => {
                    self.logger.log_no_license_found(&self.license_source.location());
                }
                LoadedLicense::Rejected(error) => {
                    self.logger.log_license_rejected(&error);
                }
            }
            state.license_load_attempted = true;
        }
        Ok(state.cached_license.clone())
    }

    /// Locks the engine state, mapping poisoning to an engine error.
    fn lock_state(&self) -> Result<MutexGuard<'_, EngineState>, EnforceError> {
        self.state
            .lock()
            .map_err(|_| EnforceError::State("engine state mutex poisoned".to_string()))
    }
}

impl<S, L> fmt::Debug for EnforcementEngine<S, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnforcementEngine").finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Enforcement call errors.
///
/// # Invariants
/// - `Disabled` is the only variant callers are expected to branch on.
#[derive(Debug, Error)]
pub enum EnforceError {
    /// The grace period is exhausted and the service is blocked.
    #[error(
        "catalyst gate is disabled due to {}: grace period of 90 days has been exhausted; \
         visit {} to restore service",
        .trigger.display_name(),
        .trigger.action_url()
    )]
    Disabled {
        /// The trigger that exhausted its grace period.
        trigger: EnforcementTrigger,
    },
    /// A usage record could not be persisted.
    #[error(transparent)]
    Store(#[from] UsageStoreError),
    /// Engine-internal state error.
    #[error("enforcement engine state error: {0}")]
    State(String),
}

impl EnforceError {
    /// Returns the remediation URL when the call was blocked by a trigger.
    #[must_use]
    pub const fn action_url(&self) -> Option<&'static str> {
        match self {
            Self::Disabled {
                trigger,
            } => Some(trigger.action_url()),
            Self::Store(_) | Self::State(_) => None,
        }
    }
}
