use cgm_processor::cli::{args::Args, commands};
use clap::Parser;
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    match runtime.block_on(commands::run(args)) {
        Ok(_result) => {
            // The report has already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error [{}]: {}", error.message_class(), error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("CGM Processor - Continuous Glucose Monitor Data Normaliser");
    println!("==========================================================");
    println!();
    println!("Convert LibreView and Dexcom Clarity exports or Nightscout entries");
    println!("into a single series of mmol/L readings and report time in range.");
    println!();
    println!("USAGE:");
    println!("    cgm-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    parse         Parse a LibreView or Dexcom Clarity CSV export");
    println!("    nightscout    Fetch a year of readings from a Nightscout server");
    println!("    help          Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Parse a LibreView export for 2022:");
    println!("    cgm-processor parse --provider libreview --year 2022 export.csv");
    println!();
    println!("    # Dexcom Clarity export as JSON with daily range percentages:");
    println!("    cgm-processor parse -p dexcom -y 2022 --format json --daily clarity.csv");
    println!();
    println!("    # Fetch from Nightscout:");
    println!("    cgm-processor nightscout --url https://my.nightscout.example --secret ... --year 2022");
    println!();
    println!("For detailed help on any command, use:");
    println!("    cgm-processor <COMMAND> --help");
}
