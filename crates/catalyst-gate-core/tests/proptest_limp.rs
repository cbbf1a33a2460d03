// crates/catalyst-gate-core/tests/proptest_limp.rs
// ============================================================================
// Module: Limp Mode Property-Based Tests
// Description: Property tests for the grace-day transition function.
// Purpose: Verify monotonicity and table consistency across the input range.
// ============================================================================

//! Property-based tests for limp-mode invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use catalyst_gate_core::LimpMode;
use proptest::prelude::*;

proptest! {
    /// `from_grace_days` never de-escalates as days increase.
    #[test]
    fn from_grace_days_is_monotonic(a in -1_000i64 .. 1_000, b in -1_000i64 .. 1_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let low_mode = LimpMode::from_grace_days(low);
        let high_mode = LimpMode::from_grace_days(high);
        prop_assert!(low_mode <= high_mode);
    }

    /// Level numbers agree with the enum ordering.
    #[test]
    fn level_agrees_with_ordering(a in -200i64 .. 200, b in -200i64 .. 200) {
        let mode_a = LimpMode::from_grace_days(a);
        let mode_b = LimpMode::from_grace_days(b);
        prop_assert_eq!(mode_a <= mode_b, mode_a.level() <= mode_b.level());
    }

    /// Exactly the degraded modes carry a delay.
    #[test]
    fn delay_exists_iff_degraded(days in -200i64 .. 200) {
        let mode = LimpMode::from_grace_days(days);
        prop_assert_eq!(mode.delay().is_some(), mode.is_degraded());
    }

    /// Every enforced mode carries a headline for the operator log.
    #[test]
    fn enforced_modes_have_headlines(days in -200i64 .. 200) {
        let mode = LimpMode::from_grace_days(days);
        prop_assert_eq!(mode.headline().is_some(), mode.is_enforced());
    }
}
