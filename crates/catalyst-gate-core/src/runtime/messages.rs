// crates/catalyst-gate-core/src/runtime/messages.rs
// ============================================================================
// Module: Catalyst Gate Log Messages
// Description: Message templates for operator-facing enforcement output.
// Purpose: Keep every log shape in one place with the [CATALYST] prefix.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! All enforcement messages carry the `[CATALYST]` prefix for log filtering.
//! State transitions (limp-mode entry, disablement, recovery) render as
//! multi-line bordered boxes so operators scanning a log stream see them as
//! visually distinct events; steady-state per-execution notices stay on one
//! line.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::EnforcementStatus;
use crate::core::EnforcementTrigger;
use crate::core::License;
use crate::core::RunRate;
use crate::core::format_iso_date;
use crate::core::license::group_digits;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix for every Catalyst log message.
pub const PREFIX: &str = "[CATALYST]";

/// Horizontal border for box messages.
const BOX_BORDER: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

// ============================================================================
// SECTION: License Status Messages
// ============================================================================

/// Formats the license-loaded notice.
#[must_use]
pub fn license_loaded(license: &License) -> String {
    format!(
        "{PREFIX} License loaded: {} ({} tier, {} executions/year, expires {})",
        license.masked_key(),
        license.tier,
        group_digits(u64::from(license.annual_limit)),
        format_iso_date(license.expiry_date),
    )
}

/// Formats the no-license-found notice.
#[must_use]
pub fn no_license_found(location: &str) -> String {
    format!(
        "{PREFIX} No valid license found at {location}. Visit {} to obtain a license.",
        EnforcementTrigger::NoLicense.action_url(),
    )
}

/// Formats the invalid-license notice with its stable reason code.
#[must_use]
pub fn license_rejected(reason_code: &str, detail: &str) -> String {
    format!(
        "{PREFIX} Invalid license: {detail} ({reason_code}). Visit {} to obtain a license.",
        EnforcementTrigger::NoLicense.action_url(),
    )
}

// ============================================================================
// SECTION: Pre-Grace Warning Messages
// ============================================================================

/// Formats the license expiry warning.
#[must_use]
pub fn expiry_warning(license: &License, days_remaining: i64) -> String {
    format!(
        "{PREFIX} License expires in {days_remaining} days ({}). Visit {} to renew.",
        format_iso_date(license.expiry_date),
        EnforcementTrigger::Expired.action_url(),
    )
}

/// Formats the run rate warning, including days-until-limit when over pace.
#[must_use]
pub fn run_rate_warning(run_rate: &RunRate) -> String {
    let projection = format!(
        "{PREFIX} Projected annual usage: {} executions ({}% of {} limit).",
        group_digits(u64::from(run_rate.projected_annual_total)),
        run_rate.projected_percent,
        group_digits(u64::from(run_rate.annual_limit)),
    );
    match run_rate.days_until_limit {
        Some(days) => {
            format!("{projection} At current pace, limit will be exceeded in {days} days.")
        }
        None => projection,
    }
}

// ============================================================================
// SECTION: Grace Period Messages
// ============================================================================

/// Formats the steady-state per-execution grace status line.
#[must_use]
pub fn grace_status(status: &EnforcementStatus) -> String {
    let headline = status.limp_mode.headline().unwrap_or_default();
    let delay_secs = status.delay().map_or(0, |delay| delay.as_secs());
    let reason = status.trigger.map_or("unknown", EnforcementTrigger::display_name);
    let action = status.trigger.map_or("", EnforcementTrigger::action_url);
    format!(
        "{PREFIX} {headline} - Grace period day {}/90. {delay_secs}s delay applied. \
         DISABLED in {} days. Reason: {reason}. Action: {action}",
        status.grace_days_elapsed, status.grace_days_remaining,
    )
}

/// Formats the limp-mode transition box.
#[must_use]
pub fn limp_mode_box(status: &EnforcementStatus) -> String {
    let headline = status.limp_mode.headline().unwrap_or_default();
    let delay_secs = status.delay().map_or(0, |delay| delay.as_secs());
    let reason = status.trigger.map_or("unknown", EnforcementTrigger::display_name);
    let action = status.trigger.map_or("", EnforcementTrigger::action_url);
    let masked =
        status.license.as_ref().map_or_else(|| "none".to_string(), License::masked_key);
    format!(
        "\n{BOX_BORDER}\n\
         {PREFIX} {headline}\n\
         {PREFIX} \n\
         {PREFIX} Reason: {reason}\n\
         {PREFIX} Grace Period: Day {}/90\n\
         {PREFIX} Current Delay: {delay_secs} seconds per execution\n\
         {PREFIX} DISABLED MODE in {} days\n\
         {PREFIX} \n\
         {PREFIX} License: {masked}\n\
         {PREFIX} Action: {action}\n\
         {BOX_BORDER}\n",
        status.grace_days_elapsed, status.grace_days_remaining,
    )
}

/// Formats the disabled box.
#[must_use]
pub fn disabled_box(trigger: EnforcementTrigger) -> String {
    format!(
        "\n{BOX_BORDER}\n\
         {PREFIX} SERVICE UNAVAILABLE\n\
         {PREFIX} \n\
         {PREFIX} Catalyst Gate has been disabled.\n\
         {PREFIX} Reason: {}\n\
         {PREFIX} Grace period of 90 days has been exhausted.\n\
         {PREFIX} \n\
         {PREFIX} To restore service:\n\
         {PREFIX} {}\n\
         {BOX_BORDER}\n",
        trigger.display_name(),
        trigger.action_url(),
    )
}

/// Formats the recovery box.
#[must_use]
pub fn recovery_box(license: &License, executions_used: u32, year: i32) -> String {
    format!(
        "\n{BOX_BORDER}\n\
         {PREFIX} SERVICE RESTORED\n\
         {PREFIX} \n\
         {PREFIX} Catalyst Gate is now operating normally.\n\
         {PREFIX} License: {} ({} tier)\n\
         {PREFIX} Executions: {}/{} for {year}\n\
         {BOX_BORDER}\n",
        license.masked_key(),
        license.tier,
        group_digits(u64::from(executions_used)),
        group_digits(u64::from(license.annual_limit)),
    )
}
