//! Typed Nightscout entry and its mapping to a canonical reading

use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::app::models::GlucoseUnit;
use crate::app::services::field_parsers::reading_outcome;
use crate::app::services::stats::RowOutcome;
use crate::constants::NIGHTSCOUT_SGV_TYPE;
use crate::{Error, Result};

/// One element of the `/api/v1/entries.json` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NightscoutEntry {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Epoch milliseconds
    pub date: i64,

    /// Sensor glucose value, always mg/dL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sgv: Option<f64>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,

    #[serde(rename = "dateString", default, skip_serializing_if = "Option::is_none")]
    pub date_string: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Minutes east of UTC at the uploader
    #[serde(rename = "utcOffset", default, skip_serializing_if = "Option::is_none")]
    pub utc_offset: Option<i32>,
}

impl NightscoutEntry {
    /// Wall-clock time of the entry, shifted by its UTC offset when present
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        let utc = DateTime::from_timestamp_millis(self.date)?.naive_utc();
        let offset = Duration::try_minutes(i64::from(self.utc_offset.unwrap_or(0)))?;
        utc.checked_add_signed(offset)
    }

    /// Key used to drop the entry repeated at each page boundary
    pub fn identity(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("{}:{:?}", self.date, self.sgv),
        }
    }

    fn timestamp(&self) -> Result<NaiveDateTime> {
        self.local_time()
            .ok_or_else(|| Error::invalid_field("date", self.date.to_string(), "out of range"))
    }

    fn value(&self) -> Result<f64> {
        match self.sgv {
            Some(sgv) if sgv.is_finite() && sgv > 0.0 => Ok(GlucoseUnit::MgDl.to_mmol(sgv)),
            Some(sgv) => Err(Error::invalid_field(
                "sgv",
                sgv.to_string(),
                "not a measurement (zero, negative or non-finite)",
            )),
            None => Err(Error::invalid_field(
                "sgv",
                "",
                format!(
                    "missing on entry of type {}",
                    self.entry_type.as_deref().unwrap_or("unknown")
                ),
            )),
        }
    }

    /// Entries of another type (`mbg`, `cal`, ...) carry no sensor value
    pub fn is_sensor_glucose(&self) -> bool {
        self.entry_type
            .as_deref()
            .is_none_or(|t| t == NIGHTSCOUT_SGV_TYPE)
    }

    /// Map this entry to a reading for `year`
    pub fn to_outcome(&self, year: i32) -> RowOutcome {
        if !self.is_sensor_glucose() {
            return RowOutcome::Filtered;
        }

        reading_outcome(self.timestamp(), || self.value(), year)
    }
}
