//! Shared components for CLI commands
//!
//! Logging setup, configuration loading and report rendering used by both
//! the `parse` and `nightscout` commands.

use crate::Result;
use crate::app::models::ParseResponse;
use crate::app::services::daily_aggregator::{DailyRecord, YearSummary, aggregate_daily};
use crate::app::services::stats::{ParseResult, ParseStats};
use crate::cli::args::CommonArgs;
use crate::config::{self, Config, OutputFormat};
use crate::{Error, GlucoseUnit};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(args: &CommonArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cgm_processor={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialise logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (file -> env -> args)
pub fn load_configuration(args: &CommonArgs) -> Result<Config> {
    match &args.config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => debug!("No config file given, trying default location"),
    }

    let mut config = config::load(args.config_file.as_deref())
        .map_err(|e| Error::configuration(format!("{:#}", e)))?;

    if let Some(format) = args.format {
        config = config.with_format(format);
    }
    if args.daily {
        config = config.with_daily(true);
    }

    config.validate()?;
    Ok(config)
}

/// Spinner shown while a long-running step is in progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// JSON report: the response shape plus optional statistics
#[derive(Debug, Serialize)]
pub struct JsonReport {
    #[serde(flatten)]
    pub response: ParseResponse,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ParseStats>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<Vec<DailyRecord>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<YearSummary>,
}

impl JsonReport {
    pub fn build(result: &Result<ParseResult>, config: &Config) -> Self {
        match result {
            Ok(parsed) => {
                let records = parsed.sorted_readings();
                let daily = aggregate_daily(&records, &config.range);
                let summary = YearSummary::from_daily(&daily);
                Self {
                    response: ParseResponse {
                        records,
                        error: None,
                    },
                    stats: Some(parsed.stats.clone()),
                    daily: config.output.daily.then_some(daily),
                    summary: Some(summary),
                }
            }
            Err(error) => Self {
                response: ParseResponse::failure(error),
                stats: None,
                daily: None,
                summary: None,
            },
        }
    }
}

/// Print the report for a parse or fetch and hand the result back
pub fn report(
    result: Result<ParseResult>,
    source: &str,
    year: i32,
    config: &Config,
) -> Result<ParseResult> {
    match config.output.format {
        OutputFormat::Json => {
            let report = JsonReport::build(&result, config);
            let json = serde_json::to_string_pretty(&report).map_err(|e| {
                Error::configuration(format!("Failed to serialise report: {}", e))
            })?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            if let Ok(parsed) = &result {
                print_text_report(parsed, source, year, config);
            }
        }
    }
    result
}

fn print_text_report(parsed: &ParseResult, source: &str, year: i32, config: &Config) {
    let stats = &parsed.stats;
    let readings = parsed.sorted_readings();
    let daily = aggregate_daily(&readings, &config.range);
    let summary = YearSummary::from_daily(&daily);

    println!();
    println!(
        "{}",
        format!("{} readings for {}", source, year).bold().cyan()
    );
    println!("{}", "=".repeat(40).cyan());

    let unit_note = match parsed.unit {
        GlucoseUnit::MgDl => " (converted from mg/dL)",
        GlucoseUnit::Mmol => "",
    };
    println!(
        "Readings:        {}{}",
        readings.len().to_string().green(),
        unit_note
    );
    if let (Some(first), Some(last)) = (readings.first(), readings.last()) {
        println!(
            "Period:          {} to {}",
            first.timestamp.format("%Y-%m-%d %H:%M"),
            last.timestamp.format("%Y-%m-%d %H:%M")
        );
    }
    println!("Rows read:       {}", stats.total_rows);
    println!("Other records:   {}", stats.rows_filtered);
    println!("Outside {}:    {}", year, stats.out_of_year);

    if stats.has_skipped_rows() {
        println!(
            "Skipped rows:    {}",
            stats.rows_skipped.to_string().yellow()
        );
        for skipped in stats.skipped.iter().take(5) {
            println!("  row {}: {}", skipped.row, skipped.reason.dimmed());
        }
        if stats.skipped.len() > 5 {
            println!("  ... and {} more", stats.skipped.len() - 5);
        }
    }

    if summary.days == 0 {
        println!("{}", "No readings for the requested year".yellow());
        return;
    }

    println!();
    println!(
        "{}",
        format!(
            "Time in range ({:.1}-{:.1} mmol/L)",
            config.range.low_mmol, config.range.high_mmol
        )
        .bold()
    );
    println!(
        "Overall:         {}",
        format!("{:.1}%", summary.time_in_range).green()
    );
    println!("Days with data:  {}", summary.days);
    for (threshold, days) in summary.days_at_or_over.iter().skip(5) {
        println!("Days >= {:>3}%:   {}", threshold, days);
    }
    println!(
        "Unicorn days:    {}",
        summary.unicorn_days().to_string().magenta()
    );

    if config.output.daily {
        println!();
        println!("{}", "Daily range".bold());
        for record in &daily {
            println!(
                "{}  {:>5.1}%  ({} readings)",
                record.date, record.range_percentage, record.readings
            );
        }
    }
}
