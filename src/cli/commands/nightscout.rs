//! Nightscout command implementation

use std::time::Duration;

use crate::app::models::Provider;
use crate::app::services::nightscout::{NightscoutClient, NightscoutFetcher};
use crate::app::services::stats::ParseResult;
use crate::cli::args::NightscoutArgs;
use crate::config::Config;
use crate::{Error, Result};
use tracing::info;

use super::shared::{create_spinner, load_configuration, report, setup_logging};

/// Fetch a year of Nightscout entries and print the report
pub async fn run_nightscout(args: NightscoutArgs) -> Result<ParseResult> {
    setup_logging(&args.common)?;
    args.validate()?;
    let config = apply_cli_overrides(load_configuration(&args.common)?, &args);
    config.validate()?;

    let base_url = config.nightscout.base_url.as_deref().ok_or_else(|| {
        Error::configuration(
            "No Nightscout URL given (use --url, NIGHTSCOUT_URL or the config file)",
        )
    })?;
    let api_secret = config.nightscout.api_secret.as_deref().unwrap_or_default();

    info!("Fetching {} from {}", args.year, base_url);

    let client = NightscoutClient::new(
        base_url,
        api_secret,
        Duration::from_secs(config.nightscout.timeout_secs),
    )?;
    let fetcher = NightscoutFetcher::new(client)
        .with_page_size(config.nightscout.page_size)
        .with_max_requests(config.nightscout.max_requests);

    let spinner = args
        .common
        .show_progress()
        .then(|| create_spinner(&format!("Fetching Nightscout entries for {}", args.year)));

    let result = fetcher.fetch_year(args.year).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    report(result, &Provider::Nightscout.to_string(), args.year, &config)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(mut config: Config, args: &NightscoutArgs) -> Config {
    if let Some(url) = &args.url {
        config = config.with_nightscout_url(url);
    }
    if let Some(secret) = &args.secret {
        config = config.with_api_secret(secret);
    }
    if let Some(max_requests) = args.max_requests {
        config = config.with_max_requests(max_requests);
    }
    config
}
