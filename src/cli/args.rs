//! Command-line argument definitions for the CGM processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::models::Provider;
use crate::config::OutputFormat;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Earliest year accepted for filtering
const MIN_YEAR: i32 = 1970;

/// Latest year accepted for filtering
const MAX_YEAR: i32 = 9999;

/// CLI arguments for the CGM processor
///
/// Normalises continuous glucose monitor exports into a single mmol/L
/// time series and reports daily time in range.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cgm-processor",
    version,
    about = "Normalise CGM exports (LibreView, Dexcom Clarity, Nightscout) into mmol/L readings",
    long_about = "Reads LibreView and Dexcom Clarity CSV exports or fetches entries from a \
                  Nightscout server, converts every reading to mmol/L, keeps one calendar year \
                  and reports readings, skipped rows and daily time in range."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse a LibreView or Dexcom Clarity CSV export
    Parse(ParseArgs),
    /// Fetch a year of readings from a Nightscout server
    Nightscout(NightscoutArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct CommonArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/cgm-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Include per-day range percentages in the report
    #[arg(long = "daily")]
    pub daily: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl CommonArgs {
    /// Determine the log level from verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Whether to show spinners and progress output
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// Export file to parse
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Export provider (libreview or dexcom)
    #[arg(short = 'p', long = "provider", value_name = "PROVIDER")]
    pub provider: Option<Provider>,

    /// Calendar year to keep
    #[arg(short = 'y', long = "year")]
    pub year: i32,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl ParseArgs {
    pub fn validate(&self) -> Result<()> {
        validate_year(self.year)?;

        if let Some(provider) = self.provider
            && !provider.is_file_based()
        {
            return Err(Error::configuration(format!(
                "{} data is fetched with the 'nightscout' command",
                provider
            )));
        }

        Ok(())
    }
}

/// Arguments for the nightscout command
#[derive(Debug, Clone, Parser)]
pub struct NightscoutArgs {
    /// Nightscout base URL (falls back to NIGHTSCOUT_URL and the config file)
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// API secret (falls back to NIGHTSCOUT_API_SECRET and the config file)
    #[arg(short = 's', long = "secret", value_name = "SECRET")]
    pub secret: Option<String>,

    /// Calendar year to fetch
    #[arg(short = 'y', long = "year")]
    pub year: i32,

    /// Maximum number of page requests
    #[arg(long = "max-requests", value_name = "COUNT")]
    pub max_requests: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl NightscoutArgs {
    pub fn validate(&self) -> Result<()> {
        validate_year(self.year)?;

        if self.max_requests == Some(0) {
            return Err(Error::configuration(
                "Maximum requests must be greater than 0",
            ));
        }

        Ok(())
    }
}

fn validate_year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::configuration(format!(
            "Year must be between {} and {} (got {})",
            MIN_YEAR, MAX_YEAR, year
        )));
    }
    Ok(())
}
