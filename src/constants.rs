//! Application constants for CGM processor
//!
//! This module contains vendor format constants, default values,
//! and thresholds used throughout the CGM processor application.

// =============================================================================
// Units
// =============================================================================

/// Approximate mg/dL per mmol/L for glucose
pub const MGDL_PER_MMOL: f64 = 18.0;

/// Substring marking mg/dL in vendor header text
pub const MGDL_MARKER: &str = "mg/dL";

/// Substring marking mmol/L in vendor header text
pub const MMOL_MARKER: &str = "mmol/L";

// =============================================================================
// LibreView
// =============================================================================

/// Fewest data rows a LibreView export may contain
pub const LIBREVIEW_MIN_ROWS: usize = 2;

/// Data row whose Device field is checked for the vendor signature
pub const LIBREVIEW_SIGNATURE_INDEX: usize = 1;

/// Device name prefix written by every FreeStyle reader and app
pub const LIBREVIEW_SIGNATURE: &str = "FreeStyle";

/// RecordType of historic (automatic) glucose readings
pub const LIBREVIEW_HISTORIC_RECORD_TYPE: &str = "0";

/// Timestamp pattern of the DeviceTimestamp column
pub const LIBREVIEW_TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Canonical header substituted for the vendor header row
///
/// The column order is fixed by the export; names in the file vary with
/// locale and unit, so the file's own header is discarded.
pub const LIBREVIEW_CANONICAL_HEADER: &str = "Device,SerialNumber,DeviceTimestamp,RecordType,\
HistoricGlucose,ScanGlucose,NonNumericRapidActingInsulin,RapidActingInsulinUnits,NonNumericFood,\
CarbohydratesGrams,CarbohydratesServings,NonNumericLongActingInsulin,LongActingInsulinValueUnits,\
Notes,StripGlucose,KetoneMmol,MealInsulinUnits,CorrectionInsulinUnits,UserChangeInsulinUnits";

/// Number of columns in a LibreView export
pub const LIBREVIEW_COLUMN_COUNT: usize = 19;

// =============================================================================
// Dexcom Clarity
// =============================================================================

/// Fewest EGV rows a Dexcom Clarity export may contain
pub const DEXCOM_MIN_ROWS: usize = 12;

/// Control byte whose presence marks the binary preamble
pub const DEXCOM_PREAMBLE_MARKER: u8 = 0x01;

/// Length in bytes of the binary preamble
pub const DEXCOM_PREAMBLE_LEN: usize = 102;

/// Clean name of the first header column
pub const DEXCOM_INDEX_COLUMN: &str = "Index";

/// Event Type of estimated glucose values
pub const DEXCOM_EGV_EVENT: &str = "EGV";

/// Canonical, unit-free name of the glucose column
pub const DEXCOM_GLUCOSE_COLUMN: &str = "Glucose Value";

/// Primary timestamp pattern
pub const DEXCOM_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Fallback timestamp pattern seen in older exports
pub const DEXCOM_TIMESTAMP_FALLBACK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// Nightscout
// =============================================================================

/// Entries requested per page (one day at one-minute resolution)
pub const NIGHTSCOUT_PAGE_SIZE: usize = 1440;

/// Default bound on page requests for one fetch
pub const NIGHTSCOUT_MAX_REQUESTS: usize = 1000;

/// Entries endpoint relative to the server base URL
pub const NIGHTSCOUT_ENTRIES_PATH: &str = "/api/v1/entries.json";

/// Header carrying the API secret
pub const NIGHTSCOUT_SECRET_HEADER: &str = "API-SECRET";

/// Default HTTP timeout in seconds
pub const NIGHTSCOUT_TIMEOUT_SECS: u64 = 30;

/// Entry type carrying a sensor glucose value
pub const NIGHTSCOUT_SGV_TYPE: &str = "sgv";

// =============================================================================
// Time in range
// =============================================================================

/// Lower bound of the target range in mmol/L (inclusive)
pub const RANGE_LOW_MMOL: f64 = 3.9;

/// Upper bound of the target range in mmol/L (inclusive)
pub const RANGE_HIGH_MMOL: f64 = 10.0;

// =============================================================================
// Environment
// =============================================================================

/// Environment variable overriding the Nightscout base URL
pub const ENV_NIGHTSCOUT_URL: &str = "NIGHTSCOUT_URL";

/// Environment variable overriding the Nightscout API secret
pub const ENV_NIGHTSCOUT_SECRET: &str = "NIGHTSCOUT_API_SECRET";

/// Directory name under the user config directory
pub const CONFIG_DIR_NAME: &str = "cgm-processor";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
