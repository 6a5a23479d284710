//! Data models for CGM processing
//!
//! This module contains the canonical reading shared by every ingestion path,
//! the options threaded through row mapping, and the provider identifiers.

use crate::constants::MGDL_PER_MMOL;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Canonical Reading
// =============================================================================

/// A single glucose measurement in mmol/L
///
/// Timestamps are wall-clock times as recorded by the device; vendor exports
/// carry no offset, so none is attached here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Instant of the measurement
    pub timestamp: NaiveDateTime,

    /// Glucose concentration in mmol/L
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Zero and negative values are "no reading" sentinels
    pub fn is_measurement(&self) -> bool {
        self.value > 0.0
    }
}

// =============================================================================
// Units and options
// =============================================================================

/// Unit system a source reports glucose in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlucoseUnit {
    /// Milligrams per decilitre
    MgDl,
    /// Millimoles per litre
    Mmol,
}

impl GlucoseUnit {
    /// Convert a raw value in this unit to mmol/L
    pub fn to_mmol(self, raw: f64) -> f64 {
        match self {
            GlucoseUnit::MgDl => raw / MGDL_PER_MMOL,
            GlucoseUnit::Mmol => raw,
        }
    }
}

impl fmt::Display for GlucoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlucoseUnit::MgDl => write!(f, "mg/dL"),
            GlucoseUnit::Mmol => write!(f, "mmol/L"),
        }
    }
}

/// Options threaded through row mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub glucose_unit: GlucoseUnit,
    pub year: i32,
}

impl ParseOptions {
    pub fn new(glucose_unit: GlucoseUnit, year: i32) -> Self {
        Self { glucose_unit, year }
    }
}

// =============================================================================
// Providers
// =============================================================================

/// Supported CGM data providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    LibreView,
    Dexcom,
    Nightscout,
}

impl Provider {
    /// Whether this provider is ingested from an export file
    pub fn is_file_based(&self) -> bool {
        !matches!(self, Provider::Nightscout)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::LibreView => write!(f, "LibreView"),
            Provider::Dexcom => write!(f, "Dexcom Clarity"),
            Provider::Nightscout => write!(f, "Nightscout"),
        }
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "libreview" | "libre" | "freestyle" => Ok(Provider::LibreView),
            "dexcom" | "clarity" | "dexcom-clarity" => Ok(Provider::Dexcom),
            "nightscout" => Ok(Provider::Nightscout),
            other => Err(Error::configuration(format!(
                "Unknown CGM provider '{}' (expected libreview, dexcom or nightscout)",
                other
            ))),
        }
    }
}

// =============================================================================
// Response shape for external consumers
// =============================================================================

/// Error descriptor carried in a [`ParseResponse`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Error class (`InsufficientData`, `UnknownFormat`, ...)
    pub kind: String,

    /// Human-readable message
    pub message: String,
}

/// Records-plus-optional-error shape handed to the aggregator and renderers
///
/// `records` is always present and is empty whenever `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub records: Vec<Reading>,
    pub error: Option<ResponseError>,
}

impl From<&Error> for ResponseError {
    fn from(error: &Error) -> Self {
        Self {
            kind: error.message_class().to_string(),
            message: error.to_string(),
        }
    }
}

impl ParseResponse {
    /// Failed response with no records
    pub fn failure(error: &Error) -> Self {
        Self {
            records: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<Result<crate::ParseResult>> for ParseResponse {
    fn from(result: Result<crate::ParseResult>) -> Self {
        match result {
            Ok(parsed) => Self {
                records: parsed.readings,
                error: None,
            },
            Err(error) => Self::failure(&error),
        }
    }
}
