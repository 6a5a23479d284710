//! Core Dexcom Clarity parser implementation

use tracing::{debug, info, warn};

use super::detect::{preprocess, strip_preamble};
use super::record::DexcomRecord;
use crate::app::models::{ParseOptions, Provider};
use crate::app::services::ingest::decode_contents;
use crate::app::services::stats::{ParseResult, ParseStats, RowOutcome};
use crate::constants::DEXCOM_MIN_ROWS;
use crate::{Error, Result};

/// Parser for Dexcom Clarity CSV exports
#[derive(Debug, Clone)]
pub struct DexcomParser {
    year: i32,
    source: String,
}

impl DexcomParser {
    /// Create a parser that keeps readings from `year`
    pub fn new(year: i32) -> Self {
        Self {
            year,
            source: "Dexcom export".to_string(),
        }
    }

    /// Name the export in error messages, usually its file path
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Parse raw export bytes, removing any binary preamble before decoding
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParseResult> {
        let stripped = strip_preamble(bytes);
        if stripped.len() != bytes.len() {
            debug!(
                "Removed {}-byte Dexcom preamble",
                bytes.len() - stripped.len()
            );
        }

        let text = decode_contents(&self.source, stripped)?;
        self.parse_text(&text)
    }

    /// Parse export text
    pub fn parse(&self, contents: &str) -> Result<ParseResult> {
        self.parse_bytes(contents.as_bytes())
    }

    fn parse_text(&self, text: &str) -> Result<ParseResult> {
        let provider = Provider::Dexcom;
        let preprocessed = preprocess(text).into_result(provider)?;
        let unit = preprocessed.unit;
        debug!("Dexcom glucose column reports {}", unit);

        let mut stats = ParseStats::new();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(preprocessed.text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| Error::csv_parsing("Failed to read Dexcom header", Some(e)))?
            .clone();

        let mut records = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let row = index + 1;
            match result.and_then(|record| record.deserialize::<DexcomRecord>(Some(&headers))) {
                Ok(record) => records.push((row, record)),
                Err(e) => {
                    stats.record(row, RowOutcome::Skipped(format!("CSV parse error: {}", e)));
                    debug!("Skipped Dexcom row {}: {}", row, e);
                }
            }
        }

        let qualifying = records.iter().filter(|(_, r)| r.is_qualifying()).count();
        if qualifying < DEXCOM_MIN_ROWS {
            return Err(Error::insufficient_data(provider, qualifying, DEXCOM_MIN_ROWS));
        }

        let options = ParseOptions::new(unit, self.year);
        let readings: Vec<_> = records
            .iter()
            .filter_map(|(row, record)| stats.record(*row, record.to_outcome(&options)))
            .collect();

        if stats.has_skipped_rows() {
            warn!(
                "Skipped {} unreadable Dexcom rows (first: {:?})",
                stats.rows_skipped,
                stats.skipped.first().map(|s| &s.reason)
            );
        }

        info!(
            "Parsed {} Dexcom readings for {} from {} rows ({} non-EGV, {} outside year)",
            readings.len(),
            self.year,
            stats.total_rows,
            stats.rows_filtered,
            stats.out_of_year
        );

        Ok(ParseResult {
            readings,
            unit,
            stats,
        })
    }
}
