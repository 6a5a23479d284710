//! Parse command implementation

use crate::Result;
use crate::app::services::ingest;
use crate::app::services::stats::ParseResult;
use crate::cli::args::ParseArgs;
use tracing::info;

use super::shared::{load_configuration, report, setup_logging};

/// Parse a vendor export file and print the report
pub async fn run_parse(args: ParseArgs) -> Result<ParseResult> {
    setup_logging(&args.common)?;
    args.validate()?;
    let config = load_configuration(&args.common)?;

    let result = ingest::parse_file(args.provider, &args.file, args.year).await;
    if let Ok(parsed) = &result {
        info!(
            "{} readings kept, {:.1}% of candidate rows usable",
            parsed.readings.len(),
            parsed.stats.success_rate()
        );
    }

    let source = args
        .provider
        .map(|p| p.to_string())
        .unwrap_or_else(|| "CGM".to_string());
    report(result, &source, args.year, &config)
}
