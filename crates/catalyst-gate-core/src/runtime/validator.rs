// crates/catalyst-gate-core/src/runtime/validator.rs
// ============================================================================
// Module: Catalyst Gate License Validator
// Description: Offline validation and decoding of signed license keys.
// Purpose: Turn a raw key string into an immutable License or a stable reason.
// Dependencies: crate::core, base64, serde_json, time
// ============================================================================

//! ## Overview
//! License keys have the shape `CAT{version}.{base64-payload}.{signature}`.
//! Validation is entirely offline and deterministic for a given key string:
//! format, version whitelist, Base64 decode, signature check, and payload
//! field extraction each fail with a distinct stable reason code.
//!
//! Signature verification is a placeholder hook: any non-empty signature is
//! accepted until real cryptographic verification lands. The stub must not
//! be silently tightened or loosened.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Map;
use serde_json::Value;
use time::Date;

use crate::core::License;
use crate::core::LicenseParseError;
use crate::core::LicenseTier;
use crate::core::dates::parse_iso_date;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix every license key starts with.
pub const KEY_PREFIX: &str = "CAT";

/// Key format versions this validator accepts.
const SUPPORTED_VERSIONS: &[u32] = &[1, 2];

// ============================================================================
// SECTION: Key Validation
// ============================================================================

/// Validates a license key string and returns the decoded license.
///
/// # Errors
///
/// Returns [`LicenseParseError`] with a stable reason code when any
/// validation step fails; see the module overview for the step order.
pub fn validate_key(key: &str) -> Result<License, LicenseParseError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(LicenseParseError::EmptyKey);
    }

    let (version, payload, signature) = split_key(trimmed)?;

    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(LicenseParseError::InvalidVersion {
            version,
        });
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|err| LicenseParseError::DecodeFailed(err.to_string()))?;
    let decoded_payload = String::from_utf8(decoded)
        .map_err(|err| LicenseParseError::InvalidPayload(err.to_string()))?;

    if !verify_signature(payload, signature, version) {
        return Err(LicenseParseError::SignatureInvalid);
    }

    parse_payload(trimmed, version, &decoded_payload)
}

/// Splits a trimmed key into its version, payload, and signature parts.
///
/// The payload is restricted to the standard Base64 alphabet and the
/// signature to the Base64 alphabet plus the URL-safe characters.
fn split_key(key: &str) -> Result<(u32, &str, &str), LicenseParseError> {
    let rest = key.strip_prefix(KEY_PREFIX).ok_or(LicenseParseError::MalformedKey)?;
    let mut parts = rest.splitn(3, '.');
    let version_text = parts.next().ok_or(LicenseParseError::MalformedKey)?;
    let payload = parts.next().ok_or(LicenseParseError::MalformedKey)?;
    let signature = parts.next().ok_or(LicenseParseError::MalformedKey)?;

    if version_text.is_empty() || !version_text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(LicenseParseError::MalformedKey);
    }
    if payload.is_empty() || !payload.bytes().all(is_payload_byte) {
        return Err(LicenseParseError::MalformedKey);
    }
    if signature.is_empty() || !signature.bytes().all(is_signature_byte) {
        return Err(LicenseParseError::MalformedKey);
    }

    let version = version_text.parse::<u32>().map_err(|_| LicenseParseError::MalformedKey)?;
    Ok((version, payload, signature))
}

/// Returns true for bytes allowed in the Base64 payload segment.
const fn is_payload_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'/' | b'=')
}

/// Returns true for bytes allowed in the signature segment.
const fn is_signature_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'/' | b'=' | b'_' | b'-')
}

/// Verifies the license key signature.
///
/// PLACEHOLDER: accepts any non-empty signature. Real cryptographic
/// verification (keyed per format version) will replace this hook.
fn verify_signature(_payload: &str, signature: &str, _version: u32) -> bool {
    // TODO: verify the signature against the per-version public key.
    !signature.is_empty()
}

// ============================================================================
// SECTION: Payload Parsing
// ============================================================================

/// Parses the decoded JSON payload and assembles the license record.
fn parse_payload(
    key: &str,
    version: u32,
    json_payload: &str,
) -> Result<License, LicenseParseError> {
    let root: Value = serde_json::from_str(json_payload)
        .map_err(|err| LicenseParseError::InvalidPayload(err.to_string()))?;
    let Value::Object(fields) = root else {
        return Err(LicenseParseError::InvalidPayload(
            "payload is not a JSON object".to_string(),
        ));
    };

    let tier_text = required_string(&fields, "tier")?;
    let annual_limit = required_count(&fields, "annualLimit")?;
    let customer = required_string(&fields, "customer")?;
    let start_date = required_date(&fields, "startDate")?;
    let expiry_date = required_date(&fields, "expiryDate")?;

    let tier = LicenseTier::parse(&tier_text).ok_or_else(|| LicenseParseError::InvalidTier {
        tier: tier_text.clone(),
    })?;

    Ok(License {
        key: key.to_string(),
        key_version: version,
        tier,
        annual_limit,
        customer,
        start_date,
        expiry_date,
    })
}

/// Extracts a required string field from the payload object.
fn required_string(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<String, LicenseParseError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(LicenseParseError::MissingField {
            field,
        }),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(LicenseParseError::InvalidField {
            field,
        }),
    }
}

/// Extracts a required non-negative integer field from the payload object.
fn required_count(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<u32, LicenseParseError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(LicenseParseError::MissingField {
            field,
        }),
        Some(Value::Number(number)) => number
            .as_u64()
            .and_then(|value| u32::try_from(value).ok())
            .ok_or(LicenseParseError::InvalidField {
                field,
            }),
        Some(_) => Err(LicenseParseError::InvalidField {
            field,
        }),
    }
}

/// Extracts a required ISO-8601 date field from the payload object.
fn required_date(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Date, LicenseParseError> {
    let text = required_string(fields, field)?;
    parse_iso_date(&text).map_err(|_| LicenseParseError::InvalidDate {
        field,
    })
}
