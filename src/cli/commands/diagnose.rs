//! Diagnose command: health check over the device telemetry

use super::output::render_findings;
use super::shared::{
    CommandSummary, configure_colors, create_spinner, emit_output, finish_spinner,
    load_configuration, load_enriched_records, setup_logging,
};
use crate::Result;
use crate::app::models::DiagnosticFinding;
use crate::app::services::diagnostics::DiagnosticsEngine;
use crate::cli::args::DiagnoseArgs;
use std::time::Instant;
use tracing::info;

/// Run the diagnose command
///
/// Faults are reported as output, not as a command failure.
pub async fn run_diagnose(args: DiagnoseArgs) -> Result<CommandSummary> {
    let start_time = Instant::now();
    args.common.validate()?;

    let config = load_configuration(&args.common)?;
    config.validate()?;
    setup_logging(&config)?;
    configure_colors(&args.common);

    let spinner = create_spinner(&args.common, "Checking telemetry health");
    let parsed = load_enriched_records(&args.input, &config).await;
    finish_spinner(spinner);
    let parsed = parsed?;

    let engine = DiagnosticsEngine::new(config.diagnostics.clone());
    let report = engine.diagnose(&parsed.records);
    info!("{}", report.stats.summary());

    let findings: Vec<&DiagnosticFinding> = if args.only_faults {
        report.faults().collect()
    } else {
        report.findings.iter().collect()
    };

    let rendered = render_findings(&findings, args.common.output_format)?;
    emit_output(&args.common, &rendered).await?;

    let summary = CommandSummary {
        records_parsed: parsed.stats.records_parsed,
        lines_skipped: parsed.stats.records_skipped,
        items_reported: findings.len(),
        faults: report.stats.faulty(),
        elapsed: start_time.elapsed(),
    };
    info!("Diagnose complete: {}", summary.summary());
    Ok(summary)
}
