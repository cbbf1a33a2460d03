// crates/catalyst-gate-core/tests/throttle.rs
// ============================================================================
// Module: Log Throttler Tests
// Description: Weekly and daily suppression windows and persistence seeding.
// Purpose: Ensure warnings repeat exactly as often as their level allows.
// Dependencies: catalyst-gate-core
// ============================================================================

//! Warning throttle behavior tests.

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

mod common;

use catalyst_gate_core::LogThrottler;
use catalyst_gate_core::UsageData;

use common::day;

// ============================================================================
// SECTION: Weekly Window
// ============================================================================

/// Tests a never-logged throttler allows the first weekly warning.
#[test]
fn weekly_allows_when_never_logged() {
    let throttler = LogThrottler::new();
    assert!(throttler.should_log_weekly(day(2024, 6, 1)));
}

/// Tests the weekly window suppresses through day six and opens on day seven.
#[test]
fn weekly_window_opens_on_day_seven() {
    let mut throttler = LogThrottler::new();
    let logged = day(2024, 6, 1);
    assert_eq!(throttler.record_weekly(logged), logged);

    assert!(!throttler.should_log_weekly(day(2024, 6, 1)));
    assert!(!throttler.should_log_weekly(day(2024, 6, 7))); // day +6
    assert!(throttler.should_log_weekly(day(2024, 6, 8))); // day +7
}

// ============================================================================
// SECTION: Daily Window
// ============================================================================

/// Tests the daily window is once per calendar day, not a 24-hour window.
#[test]
fn daily_window_is_calendar_day() {
    let mut throttler = LogThrottler::new();
    assert!(throttler.should_log_daily(day(2024, 6, 1)));

    throttler.record_daily(day(2024, 6, 1));
    assert!(!throttler.should_log_daily(day(2024, 6, 1)));
    assert!(throttler.should_log_daily(day(2024, 6, 2)));
}

/// Tests the two windows track independently.
#[test]
fn weekly_and_daily_are_independent() {
    let mut throttler = LogThrottler::new();
    throttler.record_daily(day(2024, 6, 1));

    assert!(throttler.should_log_weekly(day(2024, 6, 1)));
    assert!(!throttler.should_log_daily(day(2024, 6, 1)));
}

// ============================================================================
// SECTION: Seeding and Reset
// ============================================================================

/// Tests seeding from persisted usage data restores both windows.
#[test]
fn seed_from_usage_restores_windows() {
    let usage = UsageData::initial("CAT1.x.y", 2024, day(2024, 6, 1))
        .with_weekly_warn_date(Some(day(2024, 6, 1)))
        .with_daily_warn_date(Some(day(2024, 6, 3)));

    let mut throttler = LogThrottler::new();
    throttler.seed_from(&usage);

    assert_eq!(throttler.last_weekly_log_date(), Some(day(2024, 6, 1)));
    assert_eq!(throttler.last_daily_log_date(), Some(day(2024, 6, 3)));
    assert!(!throttler.should_log_weekly(day(2024, 6, 4)));
    assert!(!throttler.should_log_daily(day(2024, 6, 3)));
    assert!(throttler.should_log_daily(day(2024, 6, 4)));
}

/// Tests seeding from a record without warn dates clears the windows.
#[test]
fn seed_from_clean_usage_clears_windows() {
    let mut throttler = LogThrottler::new();
    throttler.record_weekly(day(2024, 6, 1));
    throttler.record_daily(day(2024, 6, 1));

    let usage = UsageData::initial("CAT1.x.y", 2024, day(2024, 6, 2));
    throttler.seed_from(&usage);

    assert!(throttler.should_log_weekly(day(2024, 6, 2)));
    assert!(throttler.should_log_daily(day(2024, 6, 2)));
}

/// Tests reset clears all throttle state.
#[test]
fn reset_clears_state() {
    let mut throttler = LogThrottler::new();
    throttler.record_weekly(day(2024, 6, 1));
    throttler.record_daily(day(2024, 6, 1));

    throttler.reset();

    assert_eq!(throttler.last_weekly_log_date(), None);
    assert_eq!(throttler.last_daily_log_date(), None);
}
