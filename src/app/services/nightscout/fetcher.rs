//! Paginated retrieval of one year of Nightscout entries

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use tracing::{debug, info, warn};

use super::client::EntrySource;
use super::entry::NightscoutEntry;
use crate::app::models::GlucoseUnit;
use crate::app::services::stats::{ParseResult, ParseStats};
use crate::constants::{NIGHTSCOUT_MAX_REQUESTS, NIGHTSCOUT_PAGE_SIZE};
use crate::{Error, Result};

/// Widest UTC offset in use; entries local to `year` can be stamped this far past it in UTC
const MAX_UTC_OFFSET_HOURS: i64 = 14;

/// Upper `date` bound of the first page request for `year`
pub fn initial_before_millis(year: i32) -> Result<i64> {
    let end_of_year = NaiveDate::from_ymd_opt(year, 12, 31)
        .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
        .ok_or_else(|| Error::configuration(format!("Year {} is out of range", year)))?;

    Ok((end_of_year + Duration::hours(MAX_UTC_OFFSET_HOURS))
        .and_utc()
        .timestamp_millis())
}

/// Walks a Nightscout entry source backwards through a year
#[derive(Debug, Clone)]
pub struct NightscoutFetcher<S> {
    source: S,
    page_size: usize,
    max_requests: usize,
}

impl<S: EntrySource> NightscoutFetcher<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_size: NIGHTSCOUT_PAGE_SIZE,
            max_requests: NIGHTSCOUT_MAX_REQUESTS,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_max_requests(mut self, max_requests: usize) -> Self {
        self.max_requests = max_requests;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch every entry needed to cover `year`, newest page first
    ///
    /// Stops when a page holds at most one entry (the boundary entry
    /// repeated from the previous page) or when the oldest entry of a page
    /// predates `year`. Fails with [`Error::RateLimitExceeded`] once
    /// `max_requests` pages have been fetched without reaching either.
    pub async fn fetch_entries(&self, year: i32) -> Result<Vec<NightscoutEntry>> {
        if self.page_size == 0 {
            return Err(Error::configuration("Nightscout page size must be positive"));
        }

        let mut before = initial_before_millis(year)?;
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        let mut requests = 0;

        loop {
            if requests >= self.max_requests {
                warn!(
                    "Stopping Nightscout fetch after {} requests without reaching {}",
                    requests, year
                );
                return Err(Error::rate_limit_exceeded(requests));
            }

            let page = self.source.fetch_page(before, self.page_size).await?;
            requests += 1;

            let count = page.len();
            let Some(oldest) = page.last() else {
                debug!("Page {} is empty", requests);
                break;
            };
            before = oldest.date;
            let oldest_year = oldest.local_time().map(|t| t.year());

            let before_len = entries.len();
            entries.extend(page.into_iter().filter(|e| seen.insert(e.identity())));
            debug!(
                "Page {}: {} entries ({} new), oldest date {}",
                requests,
                count,
                entries.len() - before_len,
                before
            );

            if count <= 1 || oldest_year.is_none_or(|y| y < year) {
                break;
            }
        }

        info!(
            "Fetched {} Nightscout entries in {} requests",
            entries.len(),
            requests
        );
        Ok(entries)
    }

    /// Fetch and map every sensor reading of `year`
    pub async fn fetch_year(&self, year: i32) -> Result<ParseResult> {
        let entries = self.fetch_entries(year).await?;

        let mut stats = ParseStats::new();
        let readings: Vec<_> = entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| stats.record(index + 1, entry.to_outcome(year)))
            .collect();

        if stats.has_skipped_rows() {
            warn!(
                "Skipped {} Nightscout entries without a usable value",
                stats.rows_skipped
            );
        }

        info!(
            "Mapped {} Nightscout readings for {} ({} outside year)",
            readings.len(),
            year,
            stats.out_of_year
        );

        Ok(ParseResult {
            readings,
            unit: GlucoseUnit::MgDl,
            stats,
        })
    }
}
