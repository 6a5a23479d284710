//! Nightscout HTTP client

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use super::entry::NightscoutEntry;
use crate::constants::{NIGHTSCOUT_ENTRIES_PATH, NIGHTSCOUT_SECRET_HEADER};
use crate::{Error, Result};

/// A source of entry pages ordered newest first
///
/// Each call returns at most `count` entries whose `date` is at or before
/// `before_millis`.
pub trait EntrySource {
    fn fetch_page(
        &self,
        before_millis: i64,
        count: usize,
    ) -> impl Future<Output = Result<Vec<NightscoutEntry>>> + Send;
}

/// Client for the `/api/v1/entries.json` endpoint
#[derive(Debug, Clone)]
pub struct NightscoutClient {
    http: reqwest::Client,
    base_url: String,
    api_secret: String,
}

impl NightscoutClient {
    pub fn new(base_url: &str, api_secret: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::configuration("Nightscout URL must not be empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            api_secret: api_secret.to_string(),
        })
    }

    pub fn entries_url(&self) -> String {
        format!("{}{}", self.base_url, NIGHTSCOUT_ENTRIES_PATH)
    }
}

impl EntrySource for NightscoutClient {
    async fn fetch_page(&self, before_millis: i64, count: usize) -> Result<Vec<NightscoutEntry>> {
        let url = self.entries_url();
        debug!("GET {} (count={}, date<={})", url, count, before_millis);

        let response = self
            .http
            .get(&url)
            .header(NIGHTSCOUT_SECRET_HEADER, &self.api_secret)
            .query(&[
                ("count", count.to_string()),
                ("find[date][$lte]", before_millis.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::network_unreachable(&url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::network_failure(
                format!("Nightscout returned HTTP {}", status),
                Some(status.as_u16()),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            Error::network_failure(
                format!("Failed to read Nightscout response: {}", e),
                Some(status.as_u16()),
            )
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            Error::network_failure(
                format!("Nightscout response is not a list of entries: {}", e),
                Some(status.as_u16()),
            )
        })
    }
}
