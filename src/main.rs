use clap::Parser;
use fuel_ledger::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
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

    let result: anyhow::Result<commands::CommandSummary> = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result.map_err(anyhow::Error::from),
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    return Err(anyhow::Error::from(e).context("Failed to listen for CTRL+C"));
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(fuel_ledger::Error::processing_interrupted("Interrupted by user").into())
            }
        }
    });

    match result {
        Ok(summary) => {
            // Telemetry faults found by diagnose are reported, not failures
            tracing::debug!("{}", summary.summary());
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Fuel Ledger - Fuel-Dispensing Telemetry Reconstruction");
    println!("======================================================");
    println!();
    println!("Rebuild a clean ledger of fuel-dispensing events from WLN telemetry");
    println!("logs, optionally reconciled against tank-level exports.");
    println!();
    println!("USAGE:");
    println!("    fuel-ledger <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    parse       Decode a WLN file and list its telemetry records");
    println!("    extract     Extract dispensing events (normal, locked-id, manual)");
    println!("    reconcile   Infer event volumes from tank-level readings");
    println!("    diagnose    Run the telemetry health check");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Extract events with device IDs:");
    println!("    fuel-ledger extract export.wln");
    println!();
    println!("    # Recover IDs after the device counter froze at 120:");
    println!("    fuel-ledger extract export.wln --policy locked-id --start-id 120");
    println!();
    println!("    # Reconcile auxiliary-hose events against a tank export (UTC-3):");
    println!("    fuel-ledger reconcile export.wln --tank tank.csv --point auxiliary \\");
    println!("                          --utc-offset-minutes -180 --output-format csv");
    println!();
    println!("    # List only faulty events:");
    println!("    fuel-ledger diagnose export.wln --only-faults");
    println!();
    println!("For detailed help on any command, use:");
    println!("    fuel-ledger <COMMAND> --help");
}
