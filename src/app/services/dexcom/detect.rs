//! Dexcom Clarity format detection and header preprocessing

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::app::models::GlucoseUnit;
use crate::app::services::detection::Detection;
use crate::constants::{
    DEXCOM_GLUCOSE_COLUMN, DEXCOM_INDEX_COLUMN, DEXCOM_PREAMBLE_LEN, DEXCOM_PREAMBLE_MARKER,
    MGDL_MARKER, MMOL_MARKER,
};

/// Unit-labelled glucose columns, e.g. `Glucose Value (mg/dL)`
static UNIT_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(Glucose Value|Glucose Rate of Change) \((mg/dL|mmol/L)(?:/min)?\)")
        .expect("unit column pattern is valid")
});

/// Drop the fixed-length binary preamble when its marker byte is present
pub fn strip_preamble(bytes: &[u8]) -> &[u8] {
    if !bytes.contains(&DEXCOM_PREAMBLE_MARKER) {
        return bytes;
    }
    bytes.get(DEXCOM_PREAMBLE_LEN..).unwrap_or_default()
}

/// Split text into its first line and the remainder (including the newline)
fn split_header(text: &str) -> (&str, &str) {
    match text.find('\n') {
        Some(end) => text.split_at(end),
        None => (text, ""),
    }
}

/// Replace a BOM-damaged first header token with a clean `Index`
pub fn repair_header_token(text: &str) -> Cow<'_, str> {
    let (header, _) = split_header(text);
    let token_end = header.find(',').unwrap_or(header.len());
    let token = &header[..token_end];

    if token == DEXCOM_INDEX_COLUMN || !token.trim_end_matches('"').ends_with(DEXCOM_INDEX_COLUMN) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(format!("{}{}", DEXCOM_INDEX_COLUMN, &text[token_end..]))
}

/// Determine the export unit from the glucose column header
pub fn detect_unit(text: &str) -> Detection<GlucoseUnit> {
    let (header, _) = split_header(text);

    let Some(captures) = UNIT_COLUMN
        .captures_iter(header)
        .find(|c| &c[1] == DEXCOM_GLUCOSE_COLUMN)
    else {
        return Detection::Unrecognized(format!(
            "no '{}' column with a unit",
            DEXCOM_GLUCOSE_COLUMN
        ));
    };

    match &captures[2] {
        MGDL_MARKER => Detection::Detected(GlucoseUnit::MgDl),
        MMOL_MARKER => Detection::Detected(GlucoseUnit::Mmol),
        other => Detection::Unrecognized(format!("unsupported glucose unit '{}'", other)),
    }
}

/// Rewrite unit-labelled header columns to unit-free canonical names
pub fn canonicalize_header(text: &str) -> Cow<'_, str> {
    let (header, rest) = split_header(text);

    match UNIT_COLUMN.replace_all(header, "$1") {
        Cow::Borrowed(_) => Cow::Borrowed(text),
        Cow::Owned(header) => Cow::Owned(format!("{}{}", header, rest)),
    }
}

/// Text ready for CSV reading plus the detected unit
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessed {
    pub text: String,
    pub unit: GlucoseUnit,
}

/// Repair the header, detect the unit and canonicalise column names
pub fn preprocess(text: &str) -> Detection<Preprocessed> {
    let repaired = repair_header_token(text);
    detect_unit(&repaired).map(|unit| Preprocessed {
        text: canonicalize_header(&repaired).into_owned(),
        unit,
    })
}
