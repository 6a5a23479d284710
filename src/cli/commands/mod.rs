//! Command implementations for the CGM processor CLI
//!
//! Each command is implemented in its own module:
//! - `parse`: LibreView and Dexcom Clarity export files
//! - `nightscout`: paginated fetch from a Nightscout server

pub mod nightscout;
pub mod parse;
pub mod shared;

use crate::app::services::stats::ParseResult;
use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Dispatch to the handler for the selected subcommand
pub async fn run(args: Args) -> Result<ParseResult> {
    match args.command {
        Some(Commands::Parse(parse_args)) => parse::run_parse(parse_args).await,
        Some(Commands::Nightscout(nightscout_args)) => {
            nightscout::run_nightscout(nightscout_args).await
        }
        None => Err(Error::configuration("No command given")),
    }
}
