// crates/catalyst-gate-core/examples/minimal.rs
// ============================================================================
// Module: Catalyst Gate Minimal Example
// Description: Minimal end-to-end enforcement run using in-memory adapters.
// Purpose: Demonstrate enforce() across normal, degraded, and recovered calls.
// Dependencies: catalyst-gate-core
// ============================================================================

//! ## Overview
//! Runs the enforcement engine against in-memory seams with a fixed clock and
//! a recording sleeper. This example is backend-agnostic and suitable for
//! quick verification.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use catalyst_gate_core::EnforcementEngine;
use catalyst_gate_core::InMemoryUsageStore;
use catalyst_gate_core::License;
use catalyst_gate_core::LicenseTier;
use catalyst_gate_core::LimpMode;
use catalyst_gate_core::StaticLicenseSource;
use catalyst_gate_core::WriterLog;
use time::Date;
use time::Month;

/// Error type for example preconditions.
#[derive(Debug)]
struct ExampleError(&'static str);

impl std::fmt::Display for ExampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ExampleError {}

/// Builds a calendar date for the example timeline.
fn date(year: i32, month: u8, day: u8) -> Result<Date, Box<dyn std::error::Error>> {
    let month = Month::try_from(month)?;
    Ok(Date::from_calendar_date(year, month, day)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let today = date(2026, 3, 2)?;
    let license = License {
        key: "CAT1.eyJ0aWVyIjoic3RhcnRlciJ9.SIGNATURE".to_string(),
        key_version: 1,
        tier: LicenseTier::Starter,
        annual_limit: 10_000,
        customer: "Example Corp".to_string(),
        start_date: date(2026, 1, 1)?,
        expiry_date: date(2026, 12, 31)?,
    };

    // Collect enforcement output in memory instead of a real log stream.
    let output = Arc::new(Mutex::new(Vec::<u8>::new()));
    let sleeps = Arc::new(Mutex::new(Vec::<Duration>::new()));
    let sleep_record = Arc::clone(&sleeps);

    let engine = EnforcementEngine::new(
        InMemoryUsageStore::new(),
        StaticLicenseSource::valid(license),
        Box::new(WriterLog::new(SharedBuffer {
            bytes: Arc::clone(&output),
        })),
    )
    .with_clock(Box::new(move || today))
    .with_sleeper(Box::new(move |delay| {
        if let Ok(mut recorded) = sleep_record.lock() {
            recorded.push(delay);
        }
    }));

    // A licensed, under-limit call passes cleanly.
    let status = engine.enforce()?;
    if status.limp_mode != LimpMode::None {
        return Err(Box::new(ExampleError("expected a clean first call")));
    }

    let logged = output.lock().map_err(|_| ExampleError("log buffer poisoned"))?;
    if logged.is_empty() {
        return Err(Box::new(ExampleError("expected the license-loaded notice")));
    }
    Ok(())
}

/// Writer appending into one shared byte buffer.
struct SharedBuffer {
    /// Shared buffer receiving every write.
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut guard =
            self.bytes.lock().map_err(|_| std::io::Error::other("buffer poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
