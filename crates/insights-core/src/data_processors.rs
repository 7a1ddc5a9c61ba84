use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// Cell values treated as "no value" in the customer column.
const MISSING_MARKERS: &[&str] = &["NA", "N/A", "#N/A", "NaN", "nan", "NULL", "null", "None"];

/// Integral ids that went through a float column, e.g. `17850.0`.
static FLOAT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+)\.0+$").expect("regex is valid"));

// ── Latin-1 decoding ──────────────────────────────────────────────────────────

/// Decode a single-byte Latin-1 field. Every byte maps to the code point of
/// the same value, so decoding never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Parses invoice timestamps from the formats found in retail exports.
pub struct TimestampProcessor;

impl TimestampProcessor {
    const DATETIME_FORMATS: &'static [&'static str] = &[
        "%m/%d/%Y %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    const DATE_FORMATS: &'static [&'static str] = &["%Y-%m-%d", "%m/%d/%Y"];

    /// Parse `s` into a naive local timestamp.
    ///
    /// Date-only values resolve to midnight. Returns `None` for empty or
    /// unrecognised input.
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in Self::DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt);
            }
        }

        for fmt in Self::DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        None
    }
}

// ── Numeric fields ────────────────────────────────────────────────────────────

/// Outcome of parsing an optional numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericCell<T> {
    /// The cell held a valid number.
    Value(T),
    /// The cell was blank.
    Missing,
    /// The cell held text that is not a number of the expected kind.
    Invalid,
}

/// Parse a quantity. Integral float text such as `"3.0"` is accepted.
pub fn parse_quantity(s: &str) -> NumericCell<i64> {
    let s = s.trim();
    if s.is_empty() {
        return NumericCell::Missing;
    }
    if let Ok(q) = s.parse::<i64>() {
        return NumericCell::Value(q);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            NumericCell::Value(f as i64)
        }
        _ => NumericCell::Invalid,
    }
}

/// Parse a unit price. Non-finite values (`inf`, `NaN`) are invalid.
pub fn parse_unit_price(s: &str) -> NumericCell<f64> {
    let s = s.trim();
    if s.is_empty() {
        return NumericCell::Missing;
    }
    match s.parse::<f64>() {
        Ok(p) if p.is_finite() => NumericCell::Value(p),
        _ => NumericCell::Invalid,
    }
}

// ── Customer id ───────────────────────────────────────────────────────────────

/// Normalise a raw customer cell, returning `None` when the id is absent.
pub fn normalize_customer_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        return None;
    }
    if let Some(caps) = FLOAT_ID.captures(trimmed) {
        return Some(caps[1].to_string());
    }
    Some(trimmed.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
