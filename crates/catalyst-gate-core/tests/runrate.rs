// crates/catalyst-gate-core/tests/runrate.rs
// ============================================================================
// Module: Run Rate Calculator Tests
// Description: Projection arithmetic and pace predicate scenarios.
// Purpose: Pin the documented pace scenarios and day-boundary guards.
// Dependencies: catalyst-gate-core
// ============================================================================

//! Run rate projection behavior tests.

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
    clippy::float_cmp,
    reason = "Test-only assertions and exact expected floats are permitted."
)]

mod common;

use catalyst_gate_core::EnforcementConfig;
use catalyst_gate_core::RunRateCalculator;
use catalyst_gate_core::UsageData;

use common::day;
use common::sample_license;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a usage record with a fixed first-execution date and count.
fn usage_with(count: u32, first: time::Date, last: time::Date) -> UsageData {
    let mut usage = UsageData::initial("CAT1.x.y", first.year(), first);
    usage.count = count;
    usage.last_execution = last;
    usage
}

// ============================================================================
// SECTION: Pace Scenarios
// ============================================================================

/// Tests an under-pace year reports no over-pace condition.
#[test]
fn under_pace_has_no_overage() {
    // 10,000 limit allows ~27.4/day; 2,740 executions over 101 inclusive
    // days is just under that pace.
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));
    let usage = usage_with(2_740, day(2024, 1, 1), day(2024, 4, 10));

    let run_rate = calculator.calculate(&usage, &license, day(2024, 4, 10));

    assert_eq!(run_rate.days_elapsed, 101);
    assert!(!run_rate.is_over_pace());
    assert_eq!(run_rate.over_pace_percent(), 0);
    assert_eq!(run_rate.days_until_limit, None);
    assert_eq!(run_rate.projected_limit_date, None);
    assert!(run_rate.sufficient_data);
}

/// Tests a moderately over-pace year lands in the 20-50% band.
#[test]
fn moderately_over_pace_is_flagged() {
    // Same license, 3,500 executions by 2024-04-10: 35/day against an
    // allowed 27.4/day, roughly 28% over pace.
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));
    let usage = usage_with(3_500, day(2024, 1, 1), day(2024, 4, 10));

    let run_rate = calculator.calculate(&usage, &license, day(2024, 4, 10));

    assert!(run_rate.is_over_pace());
    assert!(run_rate.is_moderately_over_pace());
    assert!(!run_rate.is_severely_over_pace());
    assert!(run_rate.days_until_limit.is_some());
    assert!(run_rate.projected_limit_date.is_some());
}

/// Tests a severely over-pace year crosses the 50% band.
#[test]
fn severely_over_pace_is_flagged() {
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));
    let usage = usage_with(4_200, day(2024, 1, 1), day(2024, 4, 10));

    let run_rate = calculator.calculate(&usage, &license, day(2024, 4, 10));

    assert!(run_rate.is_severely_over_pace());
    assert!(!run_rate.is_moderately_over_pace());
}

// ============================================================================
// SECTION: Projections
// ============================================================================

/// Tests the projected totals for the exact-pace scenario.
#[test]
fn projection_matches_rate_times_year() {
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));
    let usage = usage_with(2_740, day(2024, 1, 1), day(2024, 4, 10));

    let run_rate = calculator.calculate(&usage, &license, day(2024, 4, 10));

    // 2,740 / 101 days = ~27.13/day; * 365 = 9,902 projected, 99% of limit.
    assert_eq!(run_rate.projected_annual_total, 9_902);
    assert_eq!(run_rate.projected_percent, 99);
}

/// Tests days-until-limit uses a ceiling division of the remaining budget.
#[test]
fn days_until_limit_is_ceiling() {
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));
    let usage = usage_with(3_500, day(2024, 1, 1), day(2024, 4, 10));

    let run_rate = calculator.calculate(&usage, &license, day(2024, 4, 10));

    // 6,500 remaining at 3,500/101 = ~34.65/day: ceil(187.6) = 188 days.
    assert_eq!(run_rate.days_until_limit, Some(188));
    let expected = day(2024, 4, 10).checked_add(time::Duration::days(188));
    assert_eq!(run_rate.projected_limit_date, expected);
}

/// Tests an at-or-over limit count reports zero days until the limit.
#[test]
fn at_limit_reports_zero_days_until_limit() {
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(1_000, day(2024, 1, 1), day(2024, 12, 31));
    let usage = usage_with(1_000, day(2024, 1, 1), day(2024, 1, 31));

    let run_rate = calculator.calculate(&usage, &license, day(2024, 1, 31));

    assert!(run_rate.is_over_pace());
    assert_eq!(run_rate.days_until_limit, Some(0));
    assert_eq!(run_rate.projected_limit_date, Some(day(2024, 1, 31)));
    assert_eq!(run_rate.remaining_executions(), 0);
}

// ============================================================================
// SECTION: Day Boundaries
// ============================================================================

/// Tests the first day counts as one elapsed day, guarding the division.
#[test]
fn first_day_counts_as_one() {
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));
    let usage = usage_with(5, day(2024, 6, 1), day(2024, 6, 1));

    let run_rate = calculator.calculate(&usage, &license, day(2024, 6, 1));

    assert_eq!(run_rate.days_elapsed, 1);
    assert_eq!(run_rate.current_rate, 5.0);
    assert!(!run_rate.sufficient_data);
}

/// Tests the sufficiency flag flips at the seven-day window.
#[test]
fn sufficiency_requires_seven_days() {
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));
    let usage = usage_with(10, day(2024, 6, 1), day(2024, 6, 6));

    // Day 6 of data: insufficient.
    let run_rate = calculator.calculate(&usage, &license, day(2024, 6, 6));
    assert_eq!(run_rate.days_elapsed, 6);
    assert!(!run_rate.sufficient_data);

    // Day 7 of data: sufficient.
    let run_rate = calculator.calculate(&usage, &license, day(2024, 6, 7));
    assert_eq!(run_rate.days_elapsed, 7);
    assert!(run_rate.sufficient_data);
}

/// Tests days remaining go negative once the license has expired.
#[test]
fn days_remaining_can_be_negative() {
    let calculator = RunRateCalculator::new(EnforcementConfig::default());
    let license = sample_license(10_000, day(2023, 1, 1), day(2023, 12, 31));
    let usage = usage_with(100, day(2024, 1, 1), day(2024, 1, 10));

    let run_rate = calculator.calculate(&usage, &license, day(2024, 1, 10));

    assert_eq!(run_rate.days_remaining, -10);
}
