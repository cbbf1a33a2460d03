// crates/catalyst-gate-core/tests/usage.rs
// ============================================================================
// Module: Usage Record Tests
// Description: Serialization round-trips and copy-update semantics.
// Purpose: Ensure the usage file schema is stable and optionals stay absent.
// Dependencies: catalyst-gate-core, serde_json
// ============================================================================

//! Usage record serialization and lifecycle tests.

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

use catalyst_gate_core::CURRENT_USAGE_VERSION;
use catalyst_gate_core::EnforcementTrigger;
use catalyst_gate_core::LimpMode;
use catalyst_gate_core::UsageData;
use serde_json::Value;

use common::day;
use common::sample_license;

// ============================================================================
// SECTION: Round-Trips
// ============================================================================

/// Tests a minimal record round-trips field for field.
#[test]
fn minimal_record_round_trips() {
    let usage = UsageData::initial("CAT1.abc.def", 2024, day(2024, 1, 15));

    let json = serde_json::to_string_pretty(&usage).expect("serialize");
    let restored: UsageData = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(usage, restored);
}

/// Tests a fully populated record round-trips field for field.
#[test]
fn full_record_round_trips() {
    let usage = UsageData::initial("CAT1.abc.def", 2024, day(2024, 1, 15))
        .with_incremented_count(day(2024, 2, 1))
        .with_grace_period_started(day(2024, 3, 1), EnforcementTrigger::LimitExceeded)
        .with_limp_mode(LimpMode::Status2)
        .with_daily_warn_date(Some(day(2024, 2, 20)))
        .with_weekly_warn_date(Some(day(2024, 2, 14)));

    let json = serde_json::to_string(&usage).expect("serialize");
    let restored: UsageData = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(usage, restored);
}

/// Tests absent optionals are omitted from the output entirely.
#[test]
fn absent_optionals_stay_absent() {
    let usage = UsageData::initial("CAT1.abc.def", 2024, day(2024, 1, 15));

    let json = serde_json::to_value(&usage).expect("serialize");
    let object = json.as_object().expect("object");

    for absent in
        ["noLicenseDetected", "triggerActivated", "activeTrigger", "lastDailyWarn", "lastWeeklyWarn"]
    {
        assert!(!object.contains_key(absent), "field should be absent: {absent}");
    }
}

/// Tests the wire format keeps the legacy camelCase and enum spellings.
#[test]
fn wire_format_is_stable() {
    let usage = UsageData::initial_no_license(2024, day(2024, 3, 1));

    let json = serde_json::to_value(&usage).expect("serialize");

    assert_eq!(json["version"], Value::from(CURRENT_USAGE_VERSION));
    assert_eq!(json["year"], Value::from(2024));
    assert_eq!(json["count"], Value::from(1));
    assert_eq!(json["firstExecution"], Value::from("2024-03-01"));
    assert_eq!(json["lastExecution"], Value::from("2024-03-01"));
    assert_eq!(json["noLicenseDetected"], Value::from("2024-03-01"));
    assert_eq!(json["triggerActivated"], Value::from("2024-03-01"));
    assert_eq!(json["activeTrigger"], Value::from("NO_LICENSE"));
    assert_eq!(json["lastLimpMode"], Value::from("STATUS_1"));
}

/// Tests a record written by an older process with no limp mode defaults.
#[test]
fn missing_limp_mode_defaults_to_none() {
    let json = "{\"version\":1,\"year\":2024,\"count\":3,\
                \"firstExecution\":\"2024-01-01\",\"lastExecution\":\"2024-01-03\"}";
    let restored: UsageData = serde_json::from_str(json).expect("deserialize");

    assert_eq!(restored.last_limp_mode, LimpMode::None);
    assert_eq!(restored.license_key, None);
    assert!(!restored.in_grace_period());
}

// ============================================================================
// SECTION: Lifecycle
// ============================================================================

/// Tests the no-license initial record starts in grace at day one.
#[test]
fn no_license_initial_starts_in_grace() {
    let usage = UsageData::initial_no_license(2024, day(2024, 3, 1));

    assert_eq!(usage.count, 1);
    assert!(usage.in_grace_period());
    assert_eq!(usage.active_trigger, Some(EnforcementTrigger::NoLicense));
    assert_eq!(usage.trigger_activated, Some(day(2024, 3, 1)));
    assert_eq!(usage.last_limp_mode, LimpMode::Status1);
}

/// Tests the grace invariant: both-or-neither fields.
#[test]
fn grace_period_requires_both_fields() {
    let mut usage = UsageData::initial("CAT1.abc.def", 2024, day(2024, 1, 15));
    assert!(!usage.in_grace_period());

    usage.trigger_activated = Some(day(2024, 2, 1));
    assert!(!usage.in_grace_period());

    usage.active_trigger = Some(EnforcementTrigger::Expired);
    assert!(usage.in_grace_period());
}

/// Tests clearing the grace period removes every grace field in one step.
#[test]
fn clearing_grace_resets_all_fields() {
    let usage = UsageData::initial_no_license(2024, day(2024, 3, 1))
        .with_limp_mode(LimpMode::Status3)
        .with_grace_period_cleared();

    assert!(!usage.in_grace_period());
    assert_eq!(usage.no_license_detected, None);
    assert_eq!(usage.trigger_activated, None);
    assert_eq!(usage.active_trigger, None);
    assert_eq!(usage.last_limp_mode, LimpMode::None);
}

/// Tests grace start records the no-license date only for that trigger.
#[test]
fn grace_start_records_no_license_date_selectively() {
    let base = UsageData::initial("CAT1.abc.def", 2024, day(2024, 1, 15));

    let expired = base.clone().with_grace_period_started(day(2024, 2, 1), EnforcementTrigger::Expired);
    assert_eq!(expired.no_license_detected, None);
    assert_eq!(expired.last_limp_mode, LimpMode::Status1);

    let unlicensed =
        base.with_grace_period_started(day(2024, 2, 1), EnforcementTrigger::NoLicense);
    assert_eq!(unlicensed.no_license_detected, Some(day(2024, 2, 1)));
}

// ============================================================================
// SECTION: Advance Rule
// ============================================================================

/// Tests advancing with no record creates the right initial shape.
#[test]
fn advance_creates_initial_records() {
    let today = day(2024, 5, 1);
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));

    let licensed = UsageData::advance(None, Some(&license), today);
    assert_eq!(licensed.count, 1);
    assert_eq!(licensed.license_key.as_deref(), Some(license.key.as_str()));
    assert!(!licensed.in_grace_period());

    let unlicensed = UsageData::advance(None, None, today);
    assert_eq!(unlicensed.count, 1);
    assert!(unlicensed.in_grace_period());
}

/// Tests advancing within the same year increments in place.
#[test]
fn advance_same_year_increments() {
    let license = sample_license(10_000, day(2024, 1, 1), day(2024, 12, 31));
    let first = UsageData::advance(None, Some(&license), day(2024, 5, 1));
    let second = UsageData::advance(Some(first), Some(&license), day(2024, 5, 2));

    assert_eq!(second.count, 2);
    assert_eq!(second.first_execution, day(2024, 5, 1));
    assert_eq!(second.last_execution, day(2024, 5, 2));
}

/// Tests year rollover resets the count and clears grace state.
#[test]
fn advance_rollover_resets_record() {
    let license = sample_license(10_000, day(2024, 1, 1), day(2026, 12, 31));
    let old = UsageData::initial(license.key.clone(), 2024, day(2024, 2, 1))
        .with_grace_period_started(day(2024, 11, 1), EnforcementTrigger::LimitExceeded)
        .with_limp_mode(LimpMode::Status2);

    let rolled = UsageData::advance(Some(old), Some(&license), day(2025, 1, 1));

    assert_eq!(rolled.year, 2025);
    assert_eq!(rolled.count, 1);
    assert!(!rolled.in_grace_period());
    assert_eq!(rolled.last_limp_mode, LimpMode::None);
    assert_eq!(rolled.first_execution, day(2025, 1, 1));
}

/// Tests rollover without a license starts the fresh year in grace.
#[test]
fn advance_rollover_without_license_starts_grace() {
    let old = UsageData::initial_no_license(2024, day(2024, 12, 1));
    let rolled = UsageData::advance(Some(old), None, day(2025, 1, 2));

    assert_eq!(rolled.year, 2025);
    assert_eq!(rolled.count, 1);
    assert!(rolled.in_grace_period());
    assert_eq!(rolled.trigger_activated, Some(day(2025, 1, 2)));
    assert_eq!(rolled.last_limp_mode, LimpMode::Status1);
}
