//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, input reading, spinners and
//! result emission used by every subcommand.

use crate::app::services::record_processor::RecordProcessor;
use crate::app::services::wln_parser::{ParseResult, WlnParser};
use crate::cli::args::{CommonArgs, OutputFormat};
use crate::config::Config;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of one command, for the exit report
#[derive(Debug, Clone, Default)]
pub struct CommandSummary {
    /// Records decoded from the WLN input
    pub records_parsed: usize,
    /// Malformed lines skipped by the parsers
    pub lines_skipped: usize,
    /// Rows written to the output
    pub items_reported: usize,
    /// Diagnostic findings with errors or warnings
    pub faults: usize,
    /// Wall-clock time of the command
    pub elapsed: Duration,
}

impl CommandSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} records parsed ({} lines skipped), {} rows reported, {} faults in {:.2?}",
            self.records_parsed, self.lines_skipped, self.items_reported, self.faults, self.elapsed
        )
    }
}

/// Set up structured logging to stderr
///
/// `RUST_LOG` takes precedence over the configured level. The level and
/// format come from `config.logging` after CLI flags have been layered in.
pub fn setup_logging(config: &Config) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = config.logging.level.to_lowercase();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fuel_ledger={}", log_level)));

    let result = if !config.logging.structured {
        // Minimal logging for quiet mode
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

    // A subscriber may already be installed when commands run in-process
    match result {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing subscriber: {}", e),
    }
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> env)
///
/// Command-specific CLI overrides are applied by the caller before validation.
pub fn load_configuration(args: &CommonArgs) -> Result<Config> {
    info!("Loading configuration");

    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_ref()
            .filter(|path| path.exists())
            .map(|path| path.as_path()),
    };

    if let Some(config_path) = config_file {
        info!("Using config file: {}", config_path.display());
    } else {
        info!("No config file found, using defaults and environment variables");
    }

    let mut config = Config::load_layered(config_file)?;
    // Flags only win when given
    if let Some(level) = args.log_level_override() {
        config.logging.level = level.to_string();
    }
    if args.quiet {
        config.logging.structured = false;
    }

    Ok(config)
}

/// Read, parse and enrich a WLN file
///
/// Returns the parse result with its records already time-repaired and sorted.
pub async fn load_enriched_records(input: &Path, config: &Config) -> Result<ParseResult> {
    let parser = WlnParser::from_config(&config.processing);
    let mut parsed = parser.parse_file(input).await?;

    if parsed.records.is_empty() {
        warn!("No telemetry records found in {}", input.display());
    }

    let (records, stats) = RecordProcessor::new(config.processing.clone()).enrich(parsed.records);
    debug!("{}", stats.summary());
    parsed.records = records;

    Ok(parsed)
}

/// Create a spinner for a named step, or `None` when progress is hidden
pub fn create_spinner(args: &CommonArgs, message: &str) -> Option<ProgressBar> {
    if !args.show_progress() {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

/// Finish a spinner created by [`create_spinner`]
pub fn finish_spinner(spinner: Option<ProgressBar>) {
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
}

/// Disable colours when human output goes to a file
pub fn configure_colors(args: &CommonArgs) {
    if args.output_file.is_some() || args.output_format != OutputFormat::Human {
        colored::control::set_override(false);
    }
}

/// Write rendered output to the output file or stdout
pub async fn emit_output(args: &CommonArgs, rendered: &[u8]) -> Result<()> {
    match &args.output_file {
        Some(path) => {
            tokio::fs::write(path, rendered).await.map_err(|e| {
                Error::io(format!("Failed to write output file {}", path.display()), e)
            })?;
            info!("Results written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered)
                .map_err(|e| Error::io("Failed to write to stdout", e))?;
            stdout
                .flush()
                .map_err(|e| Error::io("Failed to flush stdout", e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{Args, Commands};
    use clap::Parser;
    use tempfile::{NamedTempFile, TempDir};

    fn common_args(extra: &[&str]) -> CommonArgs {
        let mut argv = vec!["fuel-ledger", "parse", "log.wln"];
        argv.extend_from_slice(extra);
        match Args::parse_from(argv).command {
            Some(Commands::Parse(parse)) => parse.common,
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_load_configuration_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[processing]\nmin_volume_liters = 2.0").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = common_args(&["-c", path.as_str(), "-v"]);
        let config = load_configuration(&args).unwrap();

        assert_eq!(config.processing.min_volume_liters, 2.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_configured_log_level_used_without_flags() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\nstructured = false").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let config = load_configuration(&common_args(&["-c", path.as_str()])).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.structured);

        let config = load_configuration(&common_args(&["-c", path.as_str(), "-vvv"])).unwrap();
        assert_eq!(config.logging.level, "trace");

        let config = load_configuration(&common_args(&["-c", path.as_str(), "-q"])).unwrap();
        assert_eq!(config.logging.level, "error");
    }

    #[test]
    fn test_spinner_hidden_in_quiet_and_json_modes() {
        assert!(create_spinner(&common_args(&["-q"]), "x").is_none());
        assert!(create_spinner(&common_args(&["--output-format", "json"]), "x").is_none());
    }

    #[tokio::test]
    async fn test_emit_output_to_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out.json");
        let out_str = out.to_string_lossy().to_string();

        let args = common_args(&["-o", out_str.as_str()]);
        emit_output(&args, b"[]").await.unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "[]");
    }

    #[tokio::test]
    async fn test_load_enriched_records() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "REG;1700000100;0;0;upar0:1,upar3:0,upar4:1000,upar6:1050\r\nREG;1700000000;0;0;i/o:13/e\r\n"
        )
        .unwrap();

        let parsed = load_enriched_records(file.path(), &Config::default())
            .await
            .unwrap();

        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[1].start_time_millis(), 1_700_000_000_000);
    }
}
