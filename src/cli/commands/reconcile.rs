//! Reconcile command: infer volumes from tank-level readings

use super::output::{EventRow, render_event_rows};
use super::shared::{
    CommandSummary, configure_colors, create_spinner, emit_output, finish_spinner,
    load_configuration, load_enriched_records, setup_logging,
};
use crate::{Error, Result};
use crate::app::models::DispensingPoint;
use crate::app::services::reconciliation::{
    ReconciliationEngine, SortOrder, build_meter_cascade, order_for_display,
};
use crate::app::services::tank_level_parser::TankLevelParser;
use crate::cli::args::ReconcileArgs;
use std::time::Instant;
use tracing::{info, warn};

/// Run the reconcile command
///
/// Output carries the synthetic running meter: auxiliary newest first, main
/// oldest first.
pub async fn run_reconcile(args: ReconcileArgs) -> Result<CommandSummary> {
    let start_time = Instant::now();
    args.common.validate()?;
    if !args.tank.exists() {
        return Err(Error::configuration(format!(
            "Tank-level file does not exist: {}",
            args.tank.display()
        )));
    }

    let mut config = load_configuration(&args.common)?;
    if let Some(offset) = args.utc_offset_minutes {
        config.tank_level.utc_offset_minutes = offset;
    }
    config.validate()?;
    setup_logging(&config)?;
    configure_colors(&args.common);

    let point = DispensingPoint::from(args.point);
    let spinner = create_spinner(&args.common, &format!("Reconciling {} events", point));

    let loaded = async {
        let tank = TankLevelParser::new(config.tank_level.clone())?
            .parse_file(&args.tank)
            .await?;
        let parsed = load_enriched_records(&args.input, &config).await?;
        Ok::<_, Error>((tank, parsed))
    }
    .await;
    finish_spinner(spinner);
    let (tank, parsed) = loaded?;

    for skipped in &tank.stats.skipped {
        warn!("Tank row {} skipped: {}", skipped.row_number, skipped.reason);
    }
    info!("{}", tank.stats.summary());

    let engine = ReconciliationEngine::new(config.reconciliation.clone());
    let result = engine.reconcile(&parsed.records, &tank.samples, point)?;
    info!("{}", result.stats.summary());

    let order = match point {
        DispensingPoint::Auxiliary => SortOrder::Descending,
        DispensingPoint::Main => SortOrder::Ascending,
    };
    let rows: Vec<EventRow> = order_for_display(build_meter_cascade(&result.events), order)
        .iter()
        .map(EventRow::from)
        .collect();

    let title = format!("{} reconciliation", point);
    let rendered = render_event_rows(&rows, &title, args.common.output_format)?;
    emit_output(&args.common, &rendered).await?;

    let summary = CommandSummary {
        records_parsed: parsed.stats.records_parsed,
        lines_skipped: parsed.stats.records_skipped + tank.stats.rows_skipped,
        items_reported: rows.len(),
        faults: 0,
        elapsed: start_time.elapsed(),
    };
    info!("Reconcile complete: {}", summary.summary());
    Ok(summary)
}
