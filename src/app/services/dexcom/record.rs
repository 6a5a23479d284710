//! Typed Dexcom Clarity row and its mapping to a canonical reading

use serde::Deserialize;

use crate::app::models::ParseOptions;
use crate::app::services::field_parsers::{parse_glucose, parse_timestamp, reading_outcome};
use crate::app::services::stats::RowOutcome;
use crate::constants::{
    DEXCOM_EGV_EVENT, DEXCOM_TIMESTAMP_FALLBACK_FORMAT, DEXCOM_TIMESTAMP_FORMAT,
};

/// One Clarity export row, keyed by the canonicalised header
///
/// Patient and device rows at the top of the export share this shape with
/// most fields empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DexcomRecord {
    #[serde(rename = "Index")]
    pub index: String,

    #[serde(
        rename = "Timestamp (YYYY-MM-DDThh:mm:ss)",
        alias = "Timestamp (YYYY-MM-DD hh:mm:ss)",
        alias = "Timestamp"
    )]
    pub timestamp: String,

    #[serde(rename = "Event Type")]
    pub event_type: String,

    #[serde(rename = "Event Subtype")]
    pub event_subtype: String,

    #[serde(rename = "Patient Info")]
    pub patient_info: String,

    #[serde(rename = "Device Info")]
    pub device_info: String,

    #[serde(rename = "Source Device ID")]
    pub source_device_id: String,

    #[serde(rename = "Glucose Value")]
    pub glucose_value: String,

    #[serde(rename = "Insulin Value (u)")]
    pub insulin_value: String,

    #[serde(rename = "Carb Value (grams)")]
    pub carb_value: String,

    #[serde(rename = "Duration (hh:mm:ss)")]
    pub duration: String,

    #[serde(rename = "Glucose Rate of Change")]
    pub glucose_rate_of_change: String,

    #[serde(rename = "Transmitter Time (Long Integer)")]
    pub transmitter_time: String,

    #[serde(rename = "Transmitter ID")]
    pub transmitter_id: String,
}

impl DexcomRecord {
    /// Estimated glucose value rows with an index; excludes calibrations,
    /// insulin, notes and trailing blank rows
    pub fn is_qualifying(&self) -> bool {
        self.event_type.trim() == DEXCOM_EGV_EVENT && !self.index.trim().is_empty()
    }

    /// Map this row to a reading, or explain why it yields none
    pub fn to_outcome(&self, options: &ParseOptions) -> RowOutcome {
        if !self.is_qualifying() {
            return RowOutcome::Filtered;
        }

        reading_outcome(
            parse_timestamp(
                "Timestamp",
                &self.timestamp,
                &[DEXCOM_TIMESTAMP_FORMAT, DEXCOM_TIMESTAMP_FALLBACK_FORMAT],
            ),
            || parse_glucose("Glucose Value", &self.glucose_value, options.glucose_unit),
            options.year,
        )
    }
}
