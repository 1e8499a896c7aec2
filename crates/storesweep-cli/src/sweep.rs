//! The sweep command: wires config, cell list, client, session, and sink.

use chrono::Utc;
use storesweep_core::AppConfig;
use storesweep_scraper::{normalize_store, StoreFinderClient, SweepFetcher};
use storesweep_search::{load_cells_from_csv, seed_cells, CellQueue, SearchSession};

use crate::sink::RecordSink;

/// Runs one full traversal of the configured country.
///
/// When `dry_run` is `true`, prints what would be swept and returns without
/// touching the network or the output file.
///
/// # Errors
///
/// Returns an error if the cell list cannot be loaded, the client cannot be
/// constructed, the output sink fails, or — under the `abort` failure
/// policy — any cell's fetch exhausts its retry budget.
pub(crate) async fn run_sweep(config: &AppConfig, dry_run: bool) -> anyhow::Result<()> {
    let run_id = uuid::Uuid::new_v4();

    let cells = match &config.cells_path {
        Some(path) => load_cells_from_csv(path, config.country)?,
        None => {
            tracing::warn!(
                "no SWEEP_CELLS_PATH configured; using the built-in seed cell list, \
                 which anchors regions rather than enumerating every postal code"
            );
            seed_cells(config.country)
        }
    };

    if dry_run {
        println!(
            "dry-run: would sweep {} cells in {} (radius: {}, output: {})",
            cells.len(),
            config.country,
            config
                .max_radius_miles
                .map_or_else(|| "unbounded".to_string(), |r| format!("{r} mi")),
            config.output_path.display(),
        );
        return Ok(());
    }

    tracing::info!(
        %run_id,
        country = %config.country,
        cells = cells.len(),
        radius_miles = ?config.max_radius_miles,
        policy = ?config.failure_policy,
        "starting sweep"
    );

    let queue = CellQueue::new(cells, config.country, config.max_radius_miles);
    let client = StoreFinderClient::new(
        &config.base_url,
        config.request_timeout_secs,
        &config.user_agent,
        config.query_distance_miles,
        config.max_search_results,
        config.max_retries,
        config.retry_backoff_base_secs,
    )?;
    let fetcher = SweepFetcher::new(client, config.inter_request_delay_ms);
    let mut session = SearchSession::new(queue, fetcher, config.failure_policy);

    let mut sink = RecordSink::create(&config.output_path)?;
    let require_service = config.require_service.as_deref();

    let report = session
        .run(|store| {
            if let Some(service) = require_service {
                if !store.offers_service(service) {
                    sink.note_filtered();
                    return;
                }
            }
            sink.write(&normalize_store(&store, Utc::now()));
        })
        .await?;

    let stats = sink.finish()?;
    tracing::info!(
        %run_id,
        cells_queried = report.cells_queried,
        cells_skipped = report.cells_skipped,
        cells_failed = report.failed_cells.len(),
        records_yielded = report.records_yielded,
        records_written = stats.written,
        duplicates_dropped = stats.duplicates,
        filtered_out = stats.filtered,
        "sweep complete"
    );
    if !report.failed_cells.is_empty() {
        tracing::warn!(
            cells = ?report.failed_cells,
            "some cells failed permanently; coverage is partial"
        );
    }

    Ok(())
}
