//! Typed LibreView row and its mapping to a canonical reading

use serde::Deserialize;

use crate::app::models::ParseOptions;
use crate::app::services::field_parsers::{parse_glucose, parse_timestamp, reading_outcome};
use crate::app::services::stats::RowOutcome;
use crate::constants::{LIBREVIEW_HISTORIC_RECORD_TYPE, LIBREVIEW_TIMESTAMP_FORMAT};

/// One LibreView export row, keyed by the canonical header
///
/// Short rows deserialise with empty trailing fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LibreViewRecord {
    pub device: String,
    pub serial_number: String,
    pub device_timestamp: String,
    pub record_type: String,
    pub historic_glucose: String,
    pub scan_glucose: String,
    pub non_numeric_rapid_acting_insulin: String,
    pub rapid_acting_insulin_units: String,
    pub non_numeric_food: String,
    pub carbohydrates_grams: String,
    pub carbohydrates_servings: String,
    pub non_numeric_long_acting_insulin: String,
    pub long_acting_insulin_value_units: String,
    pub notes: String,
    pub strip_glucose: String,
    pub ketone_mmol: String,
    pub meal_insulin_units: String,
    pub correction_insulin_units: String,
    pub user_change_insulin_units: String,
}

impl LibreViewRecord {
    /// Historic (automatic) glucose records; scans, insulin and notes are other types
    pub fn is_historic_glucose(&self) -> bool {
        self.record_type.trim() == LIBREVIEW_HISTORIC_RECORD_TYPE
    }

    /// Map this row to a reading, or explain why it yields none
    pub fn to_outcome(&self, options: &ParseOptions) -> RowOutcome {
        if !self.is_historic_glucose() {
            return RowOutcome::Filtered;
        }

        reading_outcome(
            parse_timestamp(
                "DeviceTimestamp",
                &self.device_timestamp,
                &[LIBREVIEW_TIMESTAMP_FORMAT],
            ),
            || parse_glucose("HistoricGlucose", &self.historic_glucose, options.glucose_unit),
            options.year,
        )
    }
}
