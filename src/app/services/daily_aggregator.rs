//! Daily time-in-range aggregation
//!
//! Groups canonical readings by calendar day and reports the share of each
//! day's readings inside the target range, plus a year-level summary used by
//! the CLI report.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::app::models::Reading;
use crate::config::RangeConfig;

/// Number of ten-percent histogram buckets
pub const HISTOGRAM_BUCKETS: usize = 10;

/// Range statistics for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub readings: usize,
    pub in_range: usize,
    pub range_percentage: f64,
}

/// Group readings by day, ignoring sentinel values
pub fn aggregate_daily(readings: &[Reading], range: &RangeConfig) -> Vec<DailyRecord> {
    let mut days: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();

    for reading in readings.iter().filter(|r| r.is_measurement()) {
        let (total, in_range) = days.entry(reading.timestamp.date()).or_default();
        *total += 1;
        if range.contains(reading.value) {
            *in_range += 1;
        }
    }

    days.into_iter()
        .map(|(date, (readings, in_range))| DailyRecord {
            date,
            readings,
            in_range,
            range_percentage: in_range as f64 / readings as f64 * 100.0,
        })
        .collect()
}

/// Year-level view over daily records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub days: usize,
    pub readings: usize,

    /// Share of all readings in range
    pub time_in_range: f64,

    /// Days per ten-percent band; a 100% day lands in the last band
    pub histogram: [usize; HISTOGRAM_BUCKETS],

    /// `(threshold, days)` for days at or over 0%, 10%, ... 100%
    pub days_at_or_over: Vec<(u32, usize)>,
}

impl YearSummary {
    pub fn from_daily(records: &[DailyRecord]) -> Self {
        let readings: usize = records.iter().map(|r| r.readings).sum();
        let in_range: usize = records.iter().map(|r| r.in_range).sum();

        let mut histogram = [0; HISTOGRAM_BUCKETS];
        for record in records {
            let bucket = (record.range_percentage / 10.0).floor() as usize;
            histogram[bucket.min(HISTOGRAM_BUCKETS - 1)] += 1;
        }

        let days_at_or_over = (0..=HISTOGRAM_BUCKETS as u32)
            .map(|step| {
                let threshold = step * 10;
                let days = records
                    .iter()
                    .filter(|r| r.range_percentage >= f64::from(threshold))
                    .count();
                (threshold, days)
            })
            .collect();

        Self {
            days: records.len(),
            readings,
            time_in_range: if readings == 0 {
                0.0
            } else {
                in_range as f64 / readings as f64 * 100.0
            },
            histogram,
            days_at_or_over,
        }
    }

    /// Days with every reading in range
    pub fn unicorn_days(&self) -> usize {
        self.days_at_or_over
            .last()
            .map(|(_, days)| *days)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(day: u32, hour: u32, value: f64) -> Reading {
        Reading::new(
            NaiveDate::from_ymd_opt(2022, 3, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            value,
        )
    }

    #[test]
    fn test_groups_by_day_sorted() {
        let readings = vec![
            reading(2, 8, 5.0),
            reading(1, 8, 5.0),
            reading(1, 9, 12.0),
            reading(2, 9, 3.9),
            reading(2, 10, 10.0),
            reading(2, 11, 3.8),
        ];

        let daily = aggregate_daily(&readings, &RangeConfig::default());

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2022, 3, 1).unwrap());
        assert_eq!(daily[0].readings, 2);
        assert!((daily[0].range_percentage - 50.0).abs() < 1e-9);
        assert_eq!(daily[1].in_range, 3);
        assert!((daily[1].range_percentage - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_sentinels_are_excluded() {
        let readings = vec![reading(1, 8, 0.0), reading(1, 9, -1.0), reading(1, 10, 6.0)];

        let daily = aggregate_daily(&readings, &RangeConfig::default());

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].readings, 1);
        assert_eq!(daily[0].range_percentage, 100.0);
    }

    #[test]
    fn test_day_with_only_sentinels_is_absent() {
        let daily = aggregate_daily(&[reading(1, 8, 0.0)], &RangeConfig::default());
        assert!(daily.is_empty());
    }

    #[test]
    fn test_custom_range() {
        let range = RangeConfig {
            low_mmol: 4.0,
            high_mmol: 8.0,
        };
        let daily = aggregate_daily(&[reading(1, 8, 3.9), reading(1, 9, 8.0)], &range);
        assert_eq!(daily[0].in_range, 1);
    }

    #[test]
    fn test_year_summary() {
        let readings = vec![
            // 100%
            reading(1, 8, 5.0),
            reading(1, 9, 6.0),
            // 50%
            reading(2, 8, 5.0),
            reading(2, 9, 15.0),
            // 0%
            reading(3, 8, 2.5),
        ];
        let daily = aggregate_daily(&readings, &RangeConfig::default());

        let summary = YearSummary::from_daily(&daily);

        assert_eq!(summary.days, 3);
        assert_eq!(summary.readings, 5);
        assert!((summary.time_in_range - 60.0).abs() < 1e-9);
        assert_eq!(summary.histogram, [1, 0, 0, 0, 0, 1, 0, 0, 0, 1]);
        assert_eq!(summary.days_at_or_over.len(), 11);
        assert_eq!(summary.days_at_or_over[0], (0, 3));
        assert_eq!(summary.days_at_or_over[5], (50, 2));
        assert_eq!(summary.days_at_or_over[6], (60, 1));
        assert_eq!(summary.unicorn_days(), 1);
    }

    #[test]
    fn test_empty_summary() {
        let summary = YearSummary::from_daily(&[]);
        assert_eq!(summary.days, 0);
        assert_eq!(summary.time_in_range, 0.0);
        assert_eq!(summary.unicorn_days(), 0);
    }
}
