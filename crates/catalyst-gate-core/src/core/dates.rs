// crates/catalyst-gate-core/src/core/dates.rs
// ============================================================================
// Module: Catalyst Gate Date Helpers
// Description: Day arithmetic and ISO-8601 date serialization helpers.
// Purpose: Provide deterministic, signed day calculations and stable wire dates.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! All enforcement decisions are driven by whole-day arithmetic on calendar
//! dates. The core never reads wall-clock time directly; callers supply
//! `today` explicitly so evaluation stays deterministic and testable.
//! Dates serialize as ISO-8601 `YYYY-MM-DD` strings in license payloads and
//! the usage file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// ISO-8601 calendar date format (`YYYY-MM-DD`) used on every wire surface.
pub const ISO_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

// ============================================================================
// SECTION: Day Arithmetic
// ============================================================================

/// Returns the signed number of whole days from `from` to `to`.
///
/// Negative when `to` precedes `from`. Both endpoints are calendar dates;
/// the result is exact (no time-of-day component exists).
#[must_use]
pub fn days_between(from: Date, to: Date) -> i64 {
    (to - from).whole_days()
}

/// Parses an ISO-8601 `YYYY-MM-DD` string into a calendar date.
///
/// # Errors
///
/// Returns a [`time::error::Parse`] error when the text is not a valid
/// ISO-8601 calendar date.
pub fn parse_iso_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, ISO_DATE_FORMAT)
}

/// Formats a calendar date as ISO-8601 `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    date.format(ISO_DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

// ============================================================================
// SECTION: Serde Adapters
// ============================================================================

/// Serde adapter rendering [`time::Date`] as an ISO-8601 `YYYY-MM-DD` string.
pub mod iso_date {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use time::Date;

    use super::ISO_DATE_FORMAT;

    /// Serializes a date as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns a serializer error when the date cannot be formatted.
    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = date.format(ISO_DATE_FORMAT).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    /// Deserializes a `YYYY-MM-DD` string into a date.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error when the text is not a valid date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Date::parse(&text, ISO_DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter rendering `Option<time::Date>` as an optional ISO-8601 string.
///
/// Absent values are skipped by callers via `skip_serializing_if`, so an
/// unset optional never appears in the output and round-trips as absent.
pub mod iso_date_option {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use time::Date;

    use super::ISO_DATE_FORMAT;

    /// Serializes a present date as `YYYY-MM-DD` and an absent one as null.
    ///
    /// # Errors
    ///
    /// Returns a serializer error when the date cannot be formatted.
    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(value) => {
                let text = value.format(ISO_DATE_FORMAT).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional `YYYY-MM-DD` string into an optional date.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error when a present value is not a valid date.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text: Option<String> = Option::deserialize(deserializer)?;
        text.map(|value| Date::parse(&value, ISO_DATE_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
