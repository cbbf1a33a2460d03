// crates/catalyst-gate-core/src/runtime/delay.rs
// ============================================================================
// Module: Catalyst Gate Delay Enforcer
// Description: Blocking penalty delays for degraded limp modes.
// Purpose: Make the caller's thread feel the enforcement cost directly.
// Dependencies: crate::core, std
// ============================================================================

//! ## Overview
//! The penalty delay is a deliberately blocking sleep on the calling thread;
//! it is never fired and forgotten. The sleep function is an injectable
//! capability so tests substitute a recorder and never incur real waits.
//! Disabled mode applies no delay: disablement is a hard stop, not a
//! penalty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use crate::core::LimpMode;

// ============================================================================
// SECTION: Delay Enforcer
// ============================================================================

/// Sleep capability applied on the caller's thread.
type SleepFn = Box<dyn Fn(Duration) + Send + Sync>;

/// Applies blocking delays for degraded limp modes.
pub struct DelayEnforcer {
    /// Injected sleep function.
    sleep: SleepFn,
}

impl DelayEnforcer {
    /// Creates an enforcer that sleeps with [`std::thread::sleep`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_sleeper(Box::new(std::thread::sleep))
    }

    /// Creates an enforcer with a custom sleep function.
    #[must_use]
    pub fn with_sleeper(sleep: SleepFn) -> Self {
        Self {
            sleep,
        }
    }

    /// Applies the delay for the given limp mode, if one applies.
    ///
    /// Only degraded modes carry a delay; [`LimpMode::None`] and
    /// [`LimpMode::Disabled`] return immediately.
    pub fn enforce(&self, limp_mode: LimpMode) {
        if !limp_mode.is_degraded() {
            return;
        }
        if let Some(delay) = limp_mode.delay() {
            (self.sleep)(delay);
        }
    }
}

impl Default for DelayEnforcer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DelayEnforcer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayEnforcer").finish_non_exhaustive()
    }
}
