// crates/catalyst-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for catalyst-gate-core tests.
// Purpose: Provide reusable licenses, keys, sinks, and clocks for tests.
// Dependencies: catalyst-gate-core, base64
// ============================================================================

//! ## Overview
//! Provides shared helper functions and test doubles for the enforcement
//! engine and evaluator integration tests.

#![allow(
    dead_code,
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only helpers; not every test binary uses every helper."
)]

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use catalyst_gate_core::License;
use catalyst_gate_core::LicenseTier;
use catalyst_gate_core::LogLevel;
use catalyst_gate_core::interfaces::EnforcementLog;
use time::Date;
use time::Month;

// ============================================================================
// SECTION: Date Helpers
// ============================================================================

/// Builds a calendar date from year, month, and day numbers.
pub fn day(year: i32, month: u8, day: u8) -> Date {
    let month = Month::try_from(month).expect("valid month");
    Date::from_calendar_date(year, month, day).expect("valid calendar date")
}

// ============================================================================
// SECTION: License Helpers
// ============================================================================

/// Builds a starter-tier license with the given limit and validity window.
pub fn sample_license(annual_limit: u32, start: Date, expiry: Date) -> License {
    License {
        key: "CAT1.eyJ0aWVyIjoic3RhcnRlciJ9.SIGNATURE".to_string(),
        key_version: 1,
        tier: LicenseTier::Starter,
        annual_limit,
        customer: "Acme Integration".to_string(),
        start_date: start,
        expiry_date: expiry,
    }
}

/// Builds a valid license key string around the given JSON payload.
pub fn key_for_payload(payload_json: &str) -> String {
    format!("CAT1.{}.SIGNATURE", STANDARD.encode(payload_json))
}

/// Builds a valid license key for a starter license with the given dates.
pub fn starter_key(annual_limit: u32, start: &str, expiry: &str) -> String {
    key_for_payload(&format!(
        "{{\"tier\":\"starter\",\"annualLimit\":{annual_limit},\"customer\":\"Acme\",\
         \"startDate\":\"{start}\",\"expiryDate\":\"{expiry}\"}}"
    ))
}

// ============================================================================
// SECTION: Log Capture
// ============================================================================

/// Enforcement log capturing every emitted message for assertions.
#[derive(Debug, Clone, Default)]
pub struct CapturedLog {
    /// Recorded (level, message) pairs.
    records: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl CapturedLog {
    /// Creates an empty capture sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured messages.
    pub fn messages(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().expect("log lock").clone()
    }

    /// Returns true if any captured message contains the snippet.
    pub fn contains(&self, snippet: &str) -> bool {
        self.messages().iter().any(|(_, message)| message.contains(snippet))
    }

    /// Returns the number of captured messages containing the snippet.
    pub fn count_containing(&self, snippet: &str) -> usize {
        self.messages().iter().filter(|(_, message)| message.contains(snippet)).count()
    }
}

impl EnforcementLog for CapturedLog {
    fn emit(&self, level: LogLevel, message: &str) {
        self.records.lock().expect("log lock").push((level, message.to_string()));
    }
}

// ============================================================================
// SECTION: Sleep Capture
// ============================================================================

/// Recording sleeper capturing requested delays instead of waiting.
#[derive(Debug, Clone, Default)]
pub struct RecordedSleeps {
    /// Recorded delay durations.
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordedSleeps {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a boxed sleep function feeding this recorder.
    pub fn sleeper(&self) -> Box<dyn Fn(Duration) + Send + Sync> {
        let delays = Arc::clone(&self.delays);
        Box::new(move |delay| {
            delays.lock().expect("sleep lock").push(delay);
        })
    }

    /// Returns all recorded delays.
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().expect("sleep lock").clone()
    }
}
