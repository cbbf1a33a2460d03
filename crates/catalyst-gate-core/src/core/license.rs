// crates/catalyst-gate-core/src/core/license.rs
// ============================================================================
// Module: Catalyst Gate License Model
// Description: Immutable license record, tier table, and validation errors.
// Purpose: Provide the canonical license terms extracted from a signed key.
// Dependencies: serde, thiserror, time
// ============================================================================

//! ## Overview
//! A [`License`] is the immutable result of validating a signed license key.
//! Once constructed every field is populated; there is no partially valid
//! license. Tiers form a closed set with fixed default annual limits, so
//! adding a tier is a compile-time-checked change.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::Date;

use crate::core::dates::days_between;
use crate::core::dates::iso_date;

// ============================================================================
// SECTION: License Tiers
// ============================================================================

/// License tier with a fixed default annual execution limit.
///
/// # Invariants
/// - Variants are stable for serialization and payload matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseTier {
    /// Micro tier: 1,200 executions per year.
    Micro,
    /// Starter tier: 10,000 executions per year.
    Starter,
    /// Professional tier: 50,000 executions per year.
    Professional,
    /// Enterprise tier: 100,000 executions per year.
    Enterprise,
}

impl LicenseTier {
    /// Returns the default annual execution limit for the tier.
    #[must_use]
    pub const fn default_annual_limit(self) -> u32 {
        match self {
            Self::Micro => 1_200,
            Self::Starter => 10_000,
            Self::Professional => 50_000,
            Self::Enterprise => 100_000,
        }
    }

    /// Returns the lowercase tier name used in license payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Micro => "micro",
            Self::Starter => "starter",
            Self::Professional => "professional",
            Self::Enterprise => "enterprise",
        }
    }

    /// Parses a tier name case-insensitively.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "micro" => Some(Self::Micro),
            "starter" => Some(Self::Starter),
            "professional" => Some(Self::Professional),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }
}

impl fmt::Display for LicenseTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: License Record
// ============================================================================

/// Immutable representation of a validated Catalyst license.
///
/// # Invariants
/// - All fields are populated once constructed.
/// - `expiry_date >= start_date` is assumed but not separately enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// Full original license key string.
    pub key: String,
    /// Key format version (1 or 2) for key rotation support.
    pub key_version: u32,
    /// License tier.
    pub tier: LicenseTier,
    /// Maximum executions allowed per year.
    pub annual_limit: u32,
    /// Customer identifier.
    pub customer: String,
    /// License validity start date.
    #[serde(with = "iso_date")]
    pub start_date: Date,
    /// License validity end date.
    #[serde(with = "iso_date")]
    pub expiry_date: Date,
}

impl License {
    /// Returns true if the license has expired as of the given date.
    #[must_use]
    pub fn is_expired(&self, as_of: Date) -> bool {
        as_of > self.expiry_date
    }

    /// Returns the number of days until expiry from the given date.
    ///
    /// Negative once the license has expired; that is valid output, not an
    /// error.
    #[must_use]
    pub fn days_until_expiry(&self, as_of: Date) -> i64 {
        days_between(as_of, self.expiry_date)
    }

    /// Returns a masked version of the key safe for logging.
    ///
    /// Shows the key prefix and hides the remainder, e.g.
    /// `CAT1.eyJ0aWVy...****`.
    #[must_use]
    pub fn masked_key(&self) -> String {
        if self.key.chars().count() <= 20 {
            let visible: String = self.key.chars().take(10).collect();
            format!("{visible}****")
        } else {
            let visible: String = self.key.chars().take(15).collect();
            format!("{visible}...****")
        }
    }

    /// Returns a short display name for the license.
    ///
    /// Example: `ACME-STARTER-****`.
    #[must_use]
    pub fn display_name(&self) -> String {
        let customer: String =
            self.customer.to_uppercase().replace(' ', "-").chars().take(10).collect();
        format!("{}-{}-****", customer, self.tier.as_str().to_uppercase())
    }

    /// Returns a formatted tier display name.
    ///
    /// Example: `Starter (10,000 executions/year)`.
    #[must_use]
    pub fn tier_display_name(&self) -> String {
        let name = self.tier.as_str();
        let mut chars = name.chars();
        let capitalized = chars.next().map_or_else(String::new, |first| {
            format!("{}{}", first.to_uppercase(), chars.as_str())
        });
        format!("{} ({} executions/year)", capitalized, group_digits(u64::from(self.annual_limit)))
    }
}

// ============================================================================
// SECTION: Validation Errors
// ============================================================================

/// License key validation failure with a stable machine-readable reason.
///
/// # Invariants
/// - Variants are stable for programmatic handling; [`Self::reason_code`]
///   values never change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LicenseParseError {
    /// The key string is empty or blank.
    #[error("license key is empty")]
    EmptyKey,
    /// The key does not match the `CAT{version}.{payload}.{signature}` shape.
    #[error("license key format is invalid (expected CAT{{version}}.{{payload}}.{{signature}})")]
    MalformedKey,
    /// The key version is not in the supported whitelist.
    #[error("license key version {version} is not supported")]
    InvalidVersion {
        /// The unsupported version number.
        version: u32,
    },
    /// The Base64 payload could not be decoded.
    #[error("license key payload could not be decoded: {0}")]
    DecodeFailed(String),
    /// The signature failed verification.
    #[error("license key signature is invalid")]
    SignatureInvalid,
    /// The decoded payload is not a valid JSON object.
    #[error("license payload is invalid: {0}")]
    InvalidPayload(String),
    /// A required payload field is absent.
    #[error("required field '{field}' is missing")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
    /// A payload field has the wrong type.
    #[error("field '{field}' has the wrong type")]
    InvalidField {
        /// Name of the mistyped field.
        field: &'static str,
    },
    /// A payload date field is not a valid ISO-8601 date.
    #[error("field '{field}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate {
        /// Name of the invalid date field.
        field: &'static str,
    },
    /// The payload tier is not one of the known tier names.
    #[error("unknown license tier: {tier}")]
    InvalidTier {
        /// The unrecognized tier text.
        tier: String,
    },
}

impl LicenseParseError {
    /// Returns the stable machine-readable reason code for the failure.
    #[must_use]
    pub const fn reason_code(&self) -> &'static str {
        match self {
            Self::EmptyKey => "EMPTY_KEY",
            Self::MalformedKey => "MALFORMED_KEY",
            Self::InvalidVersion {
                ..
            } => "INVALID_VERSION",
            Self::DecodeFailed(_) => "DECODE_FAILED",
            Self::SignatureInvalid => "SIGNATURE_INVALID",
            Self::InvalidPayload(_) => "INVALID_PAYLOAD",
            Self::MissingField {
                ..
            } => "MISSING_FIELD",
            Self::InvalidField {
                ..
            } => "INVALID_FIELD",
            Self::InvalidDate {
                ..
            } => "INVALID_DATE",
            Self::InvalidTier {
                ..
            } => "INVALID_TIER",
        }
    }
}

// ============================================================================
// SECTION: Formatting Helpers
// ============================================================================

/// Formats an integer with comma digit grouping (e.g. `10,000`).
#[must_use]
pub(crate) fn group_digits(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
