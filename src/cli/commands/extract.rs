//! Extract command: dispensing events under one extraction policy

use super::output::{EventRow, render_event_rows};
use super::shared::{
    CommandSummary, configure_colors, create_spinner, emit_output, finish_spinner,
    load_configuration, setup_logging,
};
use crate::Result;
use crate::app::services::reconciliation::{SortOrder, build_meter_cascade, order_for_display};
use crate::app::services::record_processor::{ExtractionPolicy, RecordProcessor};
use crate::app::services::wln_parser::WlnParser;
use crate::cli::args::ExtractArgs;
use std::time::Instant;
use tracing::info;

/// Run the extract command
///
/// Manual-transcript output also carries the synthetic running meter, newest first.
pub async fn run_extract(args: ExtractArgs) -> Result<CommandSummary> {
    let start_time = Instant::now();
    args.validate()?;
    let policy = args.extraction_policy()?;

    let mut config = load_configuration(&args.common)?;
    if let Some(min_volume) = args.min_volume {
        config.processing.min_volume_liters = min_volume;
    }
    config.validate()?;
    setup_logging(&config)?;
    configure_colors(&args.common);

    let spinner = create_spinner(
        &args.common,
        &format!("Extracting events ({} policy)", policy.name()),
    );
    let parsed = WlnParser::from_config(&config.processing)
        .parse_file(&args.input)
        .await;
    finish_spinner(spinner);
    let parsed = parsed?;

    let processor = RecordProcessor::new(config.processing.clone());
    let result = processor.process(parsed.records, policy);
    info!("{} ({} events)", result.summary(), result.event_count());

    let rows: Vec<EventRow> = match policy {
        ExtractionPolicy::ManualTranscript => {
            order_for_display(build_meter_cascade(&result.events), SortOrder::Descending)
                .iter()
                .map(EventRow::from)
                .collect()
        }
        _ => result.events.iter().map(EventRow::from).collect(),
    };

    let title = format!("{} extraction", policy.name());
    let rendered = render_event_rows(&rows, &title, args.common.output_format)?;
    emit_output(&args.common, &rendered).await?;

    let summary = CommandSummary {
        records_parsed: parsed.stats.records_parsed,
        lines_skipped: parsed.stats.records_skipped,
        items_reported: rows.len(),
        faults: 0,
        elapsed: start_time.elapsed(),
    };
    info!("Extract complete: {}", summary.summary());
    Ok(summary)
}
