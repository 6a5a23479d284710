//! Nightscout API ingestion
//!
//! Nightscout replaces file parsing with paginated HTTP retrieval. Pages are
//! requested strictly one after another, walking backwards from the end of
//! the target year, because each request's `date <= before` bound is the
//! oldest entry of the previous page.
//!
//! - [`entry`] - Typed JSON entry and its mapping to a canonical reading
//! - [`client`] - [`EntrySource`] trait and its reqwest implementation
//! - [`fetcher`] - Pagination loop with the request safety bound
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cgm_processor::app::services::nightscout;
//!
//! # async fn example() -> cgm_processor::Result<()> {
//! let result = nightscout::fetch("https://my.nightscout.example", "secret", 2022).await?;
//! println!("Fetched {} readings", result.readings.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod entry;
pub mod fetcher;

#[cfg(test)]
pub mod tests;

pub use client::{EntrySource, NightscoutClient};
pub use entry::NightscoutEntry;
pub use fetcher::NightscoutFetcher;

use std::time::Duration;

use crate::Result;
use crate::app::services::stats::ParseResult;
use crate::constants::NIGHTSCOUT_TIMEOUT_SECS;

/// Fetch every reading of `year` from a Nightscout server with default limits
pub async fn fetch(base_url: &str, api_secret: &str, year: i32) -> Result<ParseResult> {
    let client = NightscoutClient::new(
        base_url,
        api_secret,
        Duration::from_secs(NIGHTSCOUT_TIMEOUT_SECS),
    )?;
    NightscoutFetcher::new(client).fetch_year(year).await
}
