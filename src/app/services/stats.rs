//! Parsing statistics and result structures for CGM ingestion
//!
//! Every ingestion path returns a [`ParseResult`]: the readings plus a
//! [`ParseStats`] ledger explaining what happened to each input row.
//! Rows that cannot be interpreted are dropped from the readings but are
//! never dropped from the ledger.

use serde::{Deserialize, Serialize};

use crate::app::models::{GlucoseUnit, Reading};

/// Parsing result with readings and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Canonical readings in input order
    pub readings: Vec<Reading>,

    /// Unit the source reported values in
    pub unit: GlucoseUnit,

    /// Row accounting for this parse
    pub stats: ParseStats,
}

impl ParseResult {
    /// Readings sorted by timestamp
    pub fn sorted_readings(&self) -> Vec<Reading> {
        let mut readings = self.readings.clone();
        readings.sort_by_key(|reading| reading.timestamp);
        readings
    }
}

/// A row dropped because it could not be mapped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based data row number (page entry number for Nightscout)
    pub row: usize,

    /// Why the row was dropped
    pub reason: String,
}

/// Outcome of mapping one vendor row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Row produced a reading
    Reading(Reading),
    /// Row is a different record subtype (insulin, notes, calibration, ...)
    Filtered,
    /// Row parsed but falls outside the target year
    OutOfYear,
    /// Row could not be interpreted
    Skipped(String),
}

/// Row accounting for a single parse
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Total number of data rows encountered
    pub total_rows: usize,

    /// Number of readings produced
    pub readings_parsed: usize,

    /// Rows of a record subtype that does not carry a reading
    pub rows_filtered: usize,

    /// Rows outside the requested year
    pub out_of_year: usize,

    /// Rows dropped because a field could not be parsed
    pub rows_skipped: usize,

    /// Details of every dropped row
    pub skipped: Vec<SkippedRow>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one row and return its reading, if any
    pub fn record(&mut self, row: usize, outcome: RowOutcome) -> Option<Reading> {
        self.total_rows += 1;
        match outcome {
            RowOutcome::Reading(reading) => {
                self.readings_parsed += 1;
                Some(reading)
            }
            RowOutcome::Filtered => {
                self.rows_filtered += 1;
                None
            }
            RowOutcome::OutOfYear => {
                self.out_of_year += 1;
                None
            }
            RowOutcome::Skipped(reason) => {
                self.record_skip(row, reason);
                None
            }
        }
    }

    /// Record a row that could not be read at all
    pub fn record_skip(&mut self, row: usize, reason: impl Into<String>) {
        self.rows_skipped += 1;
        self.skipped.push(SkippedRow {
            row,
            reason: reason.into(),
        });
    }

    /// Whether any row was dropped for being unreadable
    pub fn has_skipped_rows(&self) -> bool {
        self.rows_skipped > 0
    }

    /// Share of candidate rows (not filtered, not out of year) that produced readings
    pub fn success_rate(&self) -> f64 {
        let candidates = self.readings_parsed + self.rows_skipped;
        if candidates == 0 {
            0.0
        } else {
            (self.readings_parsed as f64 / candidates as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reading() -> Reading {
        let ts = NaiveDate::from_ymd_opt(2022, 3, 15)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        Reading::new(ts, 7.2)
    }

    #[test]
    fn test_record_outcomes() {
        let mut stats = ParseStats::new();

        assert!(stats.record(1, RowOutcome::Reading(reading())).is_some());
        assert!(stats.record(2, RowOutcome::Filtered).is_none());
        assert!(stats.record(3, RowOutcome::OutOfYear).is_none());
        assert!(stats.record(4, RowOutcome::Skipped("bad timestamp".into())).is_none());

        assert_eq!(stats.total_rows, 4);
        assert_eq!(stats.readings_parsed, 1);
        assert_eq!(stats.rows_filtered, 1);
        assert_eq!(stats.out_of_year, 1);
        assert_eq!(stats.rows_skipped, 1);
        assert_eq!(stats.skipped[0].row, 4);
        assert!(stats.has_skipped_rows());
    }

    #[test]
    fn test_success_rate() {
        let mut stats = ParseStats::new();
        assert_eq!(stats.success_rate(), 0.0);

        for row in 0..9 {
            stats.record(row, RowOutcome::Reading(reading()));
        }
        stats.record(9, RowOutcome::Skipped("Low".into()));
        stats.record(10, RowOutcome::Filtered);

        assert_eq!(stats.success_rate(), 90.0);
    }
}
