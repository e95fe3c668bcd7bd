//! Command implementations for the fuel ledger CLI
//!
//! Each subcommand lives in its own module and follows the same flow:
//! logging, argument checks, layered configuration with CLI overrides, the
//! service call, then rendering to stdout or a file.

pub mod diagnose;
pub mod extract;
pub mod output;
pub mod parse;
pub mod reconcile;
pub mod shared;

pub use shared::CommandSummary;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Dispatch to the selected subcommand
pub async fn run(args: Args) -> Result<CommandSummary> {
    match args.command {
        Some(Commands::Parse(parse_args)) => parse::run_parse(parse_args).await,
        Some(Commands::Extract(extract_args)) => extract::run_extract(extract_args).await,
        Some(Commands::Reconcile(reconcile_args)) => {
            reconcile::run_reconcile(reconcile_args).await
        }
        Some(Commands::Diagnose(diagnose_args)) => diagnose::run_diagnose(diagnose_args).await,
        None => Err(Error::configuration("No subcommand given")),
    }
}
