//! Test fixtures for Nightscout fetching


use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::{EntrySource, NightscoutEntry};
use crate::{Error, Result};

/// Epoch milliseconds of a UTC wall-clock time
pub fn utc_millis(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> i64 {
    naive(year, month, day, hour, minute)
        .and_utc()
        .timestamp_millis()
}

pub fn naive(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// Sensor entry with a generated id
pub fn sgv_entry(date: i64, sgv: f64) -> NightscoutEntry {
    NightscoutEntry {
        id: Some(format!("entry-{}", date)),
        date,
        sgv: Some(sgv),
        entry_type: Some("sgv".to_string()),
        date_string: None,
        direction: Some("Flat".to_string()),
        device: Some("xDrip-DexcomG6".to_string()),
        utc_offset: None,
    }
}

/// Hourly entries from `start` up to and including `end`, newest first
pub fn hourly_entries(start: NaiveDateTime, end: NaiveDateTime) -> Vec<NightscoutEntry> {
    let mut entries = Vec::new();
    let mut time = start;
    while time <= end {
        entries.push(sgv_entry(time.and_utc().timestamp_millis(), 126.0));
        time += Duration::hours(1);
    }
    entries.reverse();
    entries
}

/// In-memory source honouring the `date <= before` bound and page size
pub struct MockSource {
    entries: Vec<NightscoutEntry>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new(mut entries: Vec<NightscoutEntry>) -> Self {
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Self {
            entries,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntrySource for MockSource {
    async fn fetch_page(&self, before_millis: i64, count: usize) -> Result<Vec<NightscoutEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .entries
            .iter()
            .filter(|e| e.date <= before_millis)
            .take(count)
            .cloned()
            .collect())
    }
}

/// Source that always returns two entries just below the bound
pub struct EndlessSource {
    calls: AtomicUsize,
}

impl EndlessSource {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntrySource for EndlessSource {
    async fn fetch_page(&self, before_millis: i64, _count: usize) -> Result<Vec<NightscoutEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![
            sgv_entry(before_millis, 100.0),
            sgv_entry(before_millis - 1, 100.0),
        ])
    }
}

/// Source that serves one full page and then answers with a server error
pub struct FailsAfterFirstPage {
    calls: AtomicUsize,
}

impl FailsAfterFirstPage {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntrySource for FailsAfterFirstPage {
    async fn fetch_page(&self, before_millis: i64, count: usize) -> Result<Vec<NightscoutEntry>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(Error::network_failure("HTTP 502 Bad Gateway", Some(502)));
        }
        Ok((0..count as i64)
            .map(|i| sgv_entry(before_millis - 1 - i * 300_000, 110.0))
            .collect())
    }
}
