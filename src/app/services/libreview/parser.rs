//! Core LibreView parser implementation
//!
//! Handles section splitting, header substitution, CSV reading and the
//! validation rules of the LibreView export.

use tracing::{debug, info, warn};

use super::detect::{detect_signature, detect_unit, split_sections};
use super::record::LibreViewRecord;
use crate::app::models::{ParseOptions, Provider};
use crate::app::services::stats::{ParseResult, ParseStats, RowOutcome};
use crate::constants::{LIBREVIEW_CANONICAL_HEADER, LIBREVIEW_MIN_ROWS};
use crate::{Error, Result};

/// Parser for LibreView CSV exports
#[derive(Debug, Clone)]
pub struct LibreViewParser {
    year: i32,
}

impl LibreViewParser {
    /// Create a parser that keeps readings from `year`
    pub fn new(year: i32) -> Self {
        Self { year }
    }

    /// Parse decoded export text into canonical readings
    pub fn parse(&self, contents: &str) -> Result<ParseResult> {
        let provider = Provider::LibreView;
        let sections = split_sections(contents).into_result(provider)?;

        let unit = detect_unit(sections.banner);
        debug!(
            "LibreView banner '{}' indicates {}; discarding vendor header '{}'",
            sections.banner, unit, sections.header
        );

        let mut stats = ParseStats::new();
        let (rows, records): (Vec<usize>, Vec<LibreViewRecord>) =
            read_records(sections.data, &mut stats)?.into_iter().unzip();

        if records.len() < LIBREVIEW_MIN_ROWS {
            return Err(Error::insufficient_data(
                provider,
                records.len(),
                LIBREVIEW_MIN_ROWS,
            ));
        }

        detect_signature(&records).into_result(provider)?;

        let options = ParseOptions::new(unit, self.year);
        let readings: Vec<_> = rows
            .into_iter()
            .zip(&records)
            .filter_map(|(row, record)| stats.record(row, record.to_outcome(&options)))
            .collect();

        if stats.has_skipped_rows() {
            warn!(
                "Skipped {} unreadable LibreView rows (first: {:?})",
                stats.rows_skipped,
                stats.skipped.first().map(|s| &s.reason)
            );
        }

        info!(
            "Parsed {} LibreView readings for {} from {} rows ({} other records, {} outside year)",
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

/// Read data rows under the canonical header
///
/// Rows the CSV reader rejects are recorded as skipped and excluded from
/// the returned records.
fn read_records(data: &str, stats: &mut ParseStats) -> Result<Vec<(usize, LibreViewRecord)>> {
    let text = format!("{}\n{}", LIBREVIEW_CANONICAL_HEADER, data);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::csv_parsing("Failed to read canonical LibreView header", Some(e)))?
        .clone();

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let row = index + 1;
        match result.and_then(|record| record.deserialize::<LibreViewRecord>(Some(&headers))) {
            Ok(record) => records.push((row, record)),
            Err(e) => {
                stats.record(row, RowOutcome::Skipped(format!("CSV parse error: {}", e)));
                debug!("Skipped LibreView row {}: {}", row, e);
            }
        }
    }

    Ok(records)
}
