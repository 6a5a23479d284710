//! LibreView format detection
//!
//! Splits the banner and vendor header off the export, reads the unit hint
//! from the banner and checks the FreeStyle device signature.

use super::record::LibreViewRecord;
use crate::app::models::GlucoseUnit;
use crate::app::services::detection::Detection;
use crate::constants::{LIBREVIEW_SIGNATURE, LIBREVIEW_SIGNATURE_INDEX, MGDL_MARKER};

/// The three parts of a LibreView export
#[derive(Debug, Clone, PartialEq)]
pub struct LibreViewSections<'a> {
    /// Free-text first line, scanned for the unit hint
    pub banner: &'a str,

    /// Vendor header row, replaced by the canonical header
    pub header: &'a str,

    /// Remaining data rows
    pub data: &'a str,
}

/// Split the banner and vendor header off the data rows
pub fn split_sections(contents: &str) -> Detection<LibreViewSections<'_>> {
    let mut parts = contents.splitn(3, '\n');

    let banner = parts.next().unwrap_or_default().trim_end_matches('\r');
    let Some(header) = parts.next() else {
        return Detection::Unrecognized("missing header line after banner".to_string());
    };
    let data = parts.next().unwrap_or_default();

    if banner.trim().is_empty() {
        return Detection::Unrecognized("empty banner line".to_string());
    }

    Detection::Detected(LibreViewSections {
        banner,
        header: header.trim_end_matches('\r'),
        data,
    })
}

/// Read the unit system from the banner; absence of mg/dL means mmol/L
pub fn detect_unit(banner: &str) -> GlucoseUnit {
    if banner
        .to_ascii_lowercase()
        .contains(&MGDL_MARKER.to_ascii_lowercase())
    {
        GlucoseUnit::MgDl
    } else {
        GlucoseUnit::Mmol
    }
}

/// Check the Device field of the sentinel row for the FreeStyle signature
pub fn detect_signature(records: &[LibreViewRecord]) -> Detection<()> {
    match records.get(LIBREVIEW_SIGNATURE_INDEX) {
        Some(record) if record.device.contains(LIBREVIEW_SIGNATURE) => Detection::Detected(()),
        Some(record) => Detection::Unrecognized(format!(
            "row {} device '{}' is not a {} device",
            LIBREVIEW_SIGNATURE_INDEX + 1,
            record.device,
            LIBREVIEW_SIGNATURE
        )),
        None => Detection::Unrecognized(format!(
            "no data row at position {}",
            LIBREVIEW_SIGNATURE_INDEX + 1
        )),
    }
}
