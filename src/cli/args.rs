//! Command-line argument definitions for the fuel ledger
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::app::models::DispensingPoint;
use crate::app::services::record_processor::ExtractionPolicy;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the fuel ledger
///
/// Rebuilds a clean ledger of fuel-dispensing events from WLN telemetry logs,
/// optionally reconciled against tank-level exports.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fuel-ledger",
    version,
    about = "Rebuild fuel-dispensing ledgers from WLN telemetry logs",
    long_about = "Decodes WLN telemetry exports from fuel-dispensing controllers, repairs \
                  corrupted event times, extracts deduplicated dispensing events, reconciles \
                  them against tank-level readings when the flow meter is unreliable, and \
                  runs a health check over the device telemetry."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode a WLN file and list its telemetry records
    Parse(ParseArgs),
    /// Extract dispensing events from a WLN file
    Extract(ExtractArgs),
    /// Infer event volumes from tank-level readings
    Reconcile(ReconcileArgs),
    /// Run the telemetry health check
    Diagnose(DiagnoseArgs),
}

/// Options shared by every subcommand
#[derive(Debug, Clone, ClapArgs)]
pub struct CommonArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// <config dir>/fuel-ledger/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Output file for results
    ///
    /// If not specified, outputs to stdout
    #[arg(
        short = 'o',
        long = "output-file",
        value_name = "FILE",
        help = "Write results to a file instead of stdout"
    )]
    pub output_file: Option<PathBuf>,

    /// Output format for results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// WLN telemetry file
    #[arg(value_name = "WLN")]
    pub input: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the extract command
#[derive(Debug, Clone, Parser)]
pub struct ExtractArgs {
    /// WLN telemetry file
    #[arg(value_name = "WLN")]
    pub input: PathBuf,

    /// Extraction policy
    #[arg(
        short = 'p',
        long = "policy",
        value_enum,
        default_value = "normal",
        help = "Extraction policy"
    )]
    pub policy: PolicyArg,

    /// Last valid event ID before the device froze
    ///
    /// Required by the locked-id policy; new IDs continue from START_ID + 1.
    #[arg(
        long = "start-id",
        value_name = "START_ID",
        help = "Last valid ID (locked-id policy)"
    )]
    pub start_id: Option<u64>,

    /// Override the minimum event volume
    #[arg(
        long = "min-volume",
        value_name = "LITERS",
        help = "Events at or below this volume are dropped"
    )]
    pub min_volume: Option<f64>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the reconcile command
#[derive(Debug, Clone, Parser)]
pub struct ReconcileArgs {
    /// WLN telemetry file
    #[arg(value_name = "WLN")]
    pub input: PathBuf,

    /// Tank-level CSV export
    #[arg(
        short = 't',
        long = "tank",
        value_name = "CSV",
        help = "Tank-level CSV export"
    )]
    pub tank: PathBuf,

    /// Dispensing point to extract
    #[arg(
        long = "point",
        value_enum,
        default_value = "main",
        help = "Dispensing point to extract"
    )]
    pub point: PointArg,

    /// Override the UTC offset of the tank export clock
    #[arg(
        long = "utc-offset-minutes",
        value_name = "MINUTES",
        allow_hyphen_values = true,
        help = "UTC offset of tank-level timestamps, in minutes"
    )]
    pub utc_offset_minutes: Option<i32>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the diagnose command
#[derive(Debug, Clone, Parser)]
pub struct DiagnoseArgs {
    /// WLN telemetry file
    #[arg(value_name = "WLN")]
    pub input: PathBuf,

    /// Only report events with errors or warnings
    #[arg(long = "only-faults", help = "Only report events with errors or warnings")]
    pub only_faults: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for spreadsheets
    Csv,
}

/// Extraction policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Trust device IDs
    Normal,
    /// Reassign IDs after a frozen counter
    LockedId,
    /// Keep everything for manual volume transcription
    Manual,
}

/// Dispensing point selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PointArg {
    Main,
    Auxiliary,
}

impl From<PointArg> for DispensingPoint {
    fn from(point: PointArg) -> Self {
        match point {
            PointArg::Main => DispensingPoint::Main,
            PointArg::Auxiliary => DispensingPoint::Auxiliary,
        }
    }
}

impl CommonArgs {
    /// Log level forced by `-q` or `-v`, if either was given
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.quiet {
            return Some("error");
        }
        match self.verbose {
            0 => None,
            1 => Some("info"),
            2 => Some("debug"),
            _ => Some("trace"),
        }
    }

    /// Check if we should show a spinner (human output, not quiet)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }

    /// Validate shared arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        if let Some(parent) = self
            .output_file
            .as_ref()
            .and_then(|file| file.parent())
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            if !parent.exists() {
                return Err(Error::configuration(format!(
                    "Output file directory does not exist: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }
}

impl ExtractArgs {
    /// Resolve the policy, checking that locked-id has its start ID
    pub fn extraction_policy(&self) -> Result<ExtractionPolicy> {
        match (self.policy, self.start_id) {
            (PolicyArg::Normal, _) => Ok(ExtractionPolicy::Normal),
            (PolicyArg::Manual, _) => Ok(ExtractionPolicy::ManualTranscript),
            (PolicyArg::LockedId, Some(u64::MAX)) => Err(Error::configuration(
                "--start-id leaves no room for reassigned IDs",
            )),
            (PolicyArg::LockedId, Some(start_id)) => Ok(ExtractionPolicy::LockedId { start_id }),
            (PolicyArg::LockedId, None) => Err(Error::configuration(
                "The locked-id policy requires --start-id",
            )),
        }
    }

    /// Validate the extract command arguments
    pub fn validate(&self) -> Result<()> {
        self.common.validate()?;
        self.extraction_policy()?;

        if let Some(min_volume) = self
            .min_volume
            .filter(|v| v.is_nan() || *v < 0.0)
        {
            return Err(Error::configuration(format!(
                "Minimum volume must be non-negative, got {}",
                min_volume
            )));
        }

        Ok(())
    }
}
