//! Field parsing utilities for vendor rows
//!
//! Helpers shared by the LibreView, Dexcom and Nightscout mappers for
//! timestamps, glucose values and the target-year filter.

use crate::app::models::{GlucoseUnit, Reading};
use crate::app::services::stats::RowOutcome;
use crate::{Error, Result};
use chrono::{Datelike, NaiveDateTime};

/// Parse a timestamp, trying each pattern in order
pub fn parse_timestamp(field_name: &str, value: &str, formats: &[&str]) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_field(field_name, value, "empty timestamp"));
    }

    formats
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| {
            Error::invalid_field(
                field_name,
                trimmed,
                format!("expected one of {}", formats.join(", ")),
            )
        })
}

/// Parse a raw glucose value and convert it to mmol/L
///
/// Decimal commas are accepted. Zero and negative values are "no reading"
/// sentinels and are rejected.
pub fn parse_glucose(field_name: &str, value: &str, unit: GlucoseUnit) -> Result<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_field(field_name, value, "empty glucose value"));
    }

    let raw = trimmed
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| Error::invalid_field(field_name, trimmed, e.to_string()))?;

    if !raw.is_finite() || raw <= 0.0 {
        return Err(Error::invalid_field(
            field_name,
            trimmed,
            "not a measurement (zero, negative or non-finite)",
        ));
    }

    Ok(unit.to_mmol(raw))
}

/// Whether a timestamp falls within the requested calendar year
pub fn in_year(timestamp: &NaiveDateTime, year: i32) -> bool {
    timestamp.year() == year
}

/// Build a row outcome from already-parsed fields
pub fn reading_outcome(
    timestamp: Result<NaiveDateTime>,
    value: impl FnOnce() -> Result<f64>,
    year: i32,
) -> RowOutcome {
    let timestamp = match timestamp {
        Ok(timestamp) => timestamp,
        Err(e) => return RowOutcome::Skipped(e.to_string()),
    };

    if !in_year(&timestamp, year) {
        return RowOutcome::OutOfYear;
    }

    match value() {
        Ok(value) => RowOutcome::Reading(Reading::new(timestamp, value)),
        Err(e) => RowOutcome::Skipped(e.to_string()),
    }
}
