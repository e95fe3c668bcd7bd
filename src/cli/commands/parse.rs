//! Parse command: decode a WLN file and list its telemetry records

use super::output::render_records;
use super::shared::{
    CommandSummary, configure_colors, create_spinner, emit_output, finish_spinner,
    load_configuration, setup_logging,
};
use crate::Result;
use crate::app::services::wln_parser::WlnParser;
use crate::cli::args::ParseArgs;
use std::time::Instant;
use tracing::{info, warn};

/// Run the parse command
///
/// Records are listed exactly as decoded, without time repair.
pub async fn run_parse(args: ParseArgs) -> Result<CommandSummary> {
    let start_time = Instant::now();
    args.common.validate()?;

    let config = load_configuration(&args.common)?;
    config.validate()?;
    setup_logging(&config)?;
    configure_colors(&args.common);

    let spinner = create_spinner(&args.common, "Decoding WLN telemetry");
    let parser = WlnParser::from_config(&config.processing);
    let parsed = parser.parse_file(&args.input).await;
    finish_spinner(spinner);
    let parsed = parsed?;

    for skipped in &parsed.stats.skipped {
        warn!("Line {} skipped: {}", skipped.line_number, skipped.reason);
    }

    let rendered = render_records(&parsed.records, args.common.output_format)?;
    emit_output(&args.common, &rendered).await?;

    let summary = CommandSummary {
        records_parsed: parsed.stats.records_parsed,
        lines_skipped: parsed.stats.records_skipped,
        items_reported: parsed.records.len(),
        faults: 0,
        elapsed: start_time.elapsed(),
    };
    info!("Parse complete: {}", summary.summary());
    Ok(summary)
}
