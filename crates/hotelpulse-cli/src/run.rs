//! `run` and `validate-roster` command handlers.
//!
//! Per-hotel failures are printed and recorded in the report; only
//! configuration and report I/O errors make the command fail.

use std::sync::Arc;
use std::time::Duration;

use hotelpulse_core::{AppConfig, HotelTarget};
use hotelpulse_report::{execute_run, write_snapshot, ReportSink, RunReport};
use hotelpulse_scraper::{
    HttpSessionFactory, Outcome, PageLocator, RecordValidator, RetrievalWorker, Scheduler,
    SessionFactory, SessionPool,
};

/// Restrict `targets` to the one matching `hotel_filter`, if given.
pub(crate) fn select_targets(
    targets: Vec<HotelTarget>,
    hotel_filter: Option<&str>,
) -> anyhow::Result<Vec<HotelTarget>> {
    let Some(slug) = hotel_filter else {
        return Ok(targets);
    };
    let selected: Vec<HotelTarget> = targets.into_iter().filter(|t| t.slug == slug).collect();
    if selected.is_empty() {
        anyhow::bail!("hotel '{slug}' not found in roster");
    }
    Ok(selected)
}

/// Retrieve every selected hotel and append the outcomes to the report.
///
/// When `dry_run` is `true`, prints the hotels and search queries that would
/// be used and returns without opening a session or touching the report.
///
/// # Errors
///
/// Returns an error if the roster cannot be loaded, the hotel filter matches
/// nothing, the HTTP client cannot be built, or the report cannot be written.
pub(crate) async fn run_hotels(
    config: &AppConfig,
    hotel_filter: Option<&str>,
    concurrency: Option<usize>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let roster = hotelpulse_core::load_roster(&config.roster_path)?;
    let targets = select_targets(roster.targets(), hotel_filter)?;
    let concurrency = concurrency.unwrap_or(config.max_concurrent_hotels).max(1);
    tracing::info!(
        roster = %config.roster_path.display(),
        hotels = targets.len(),
        concurrency,
        "roster loaded"
    );

    if dry_run {
        println!(
            "dry-run: would retrieve {} hotel(s) with concurrency {concurrency}:",
            targets.len()
        );
        for target in &targets {
            println!("  {:<36} {}", target.slug, target.query);
        }
        return Ok(());
    }

    let factory: Arc<dyn SessionFactory> = Arc::new(HttpSessionFactory::from_app_config(config)?);
    let pool = Arc::new(SessionPool::new(
        factory,
        config.effective_pool_size(concurrency),
    ));
    let locator = Arc::new(PageLocator::with_default_strategies(Duration::from_millis(
        config.strategy_timeout_ms,
    )));
    let validator = Arc::new(RecordValidator::from_app_config(config));
    let worker = RetrievalWorker::new(locator, validator, Arc::clone(&pool))
        .with_debug_dir(config.debug_dir.clone());
    let scheduler = Scheduler::new(Arc::new(worker));

    let sink = ReportSink::open(config.report_path.clone()).await?;
    println!(
        "Run {}: retrieving {} hotel(s) with concurrency {concurrency}...",
        sink.run_number(),
        targets.len()
    );

    let result = execute_run(&scheduler, targets, concurrency, &sink, print_outcome).await;
    pool.close_all().await;
    let report = result?;

    print_summary(&report, &sink);

    if let Some(csv_path) = &config.csv_path {
        write_snapshot(csv_path, &report.outcomes).await?;
        println!("CSV snapshot written to {}", csv_path.display());
    }

    Ok(())
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Ok(record) => println!(
            "  \u{2713} {:<36} {:.1}/5, {} reviews  [{}] {:.2}s",
            record.hotel,
            record.rating,
            record.review_count,
            record.strategy,
            record.elapsed.as_secs_f64()
        ),
        Outcome::Failed(failure) => println!(
            "  \u{2717} {:<36} {} ({}): {}",
            failure.hotel, failure.kind, failure.stage, failure.detail
        ),
    }
}

fn print_summary(report: &RunReport, sink: &ReportSink) {
    let summary = &report.summary;
    println!();
    println!(
        "Run {} complete: {} attempted, {} succeeded, {} failed in {:.2}s",
        summary.run_number,
        summary.total,
        summary.succeeded,
        summary.failed,
        summary.duration_secs()
    );

    println!("Time taken per hotel:");
    for (name, seconds) in durations_by_name(&report.outcomes) {
        println!("  {name}: {seconds:.2} seconds");
    }
    println!("Report: {}", sink.path().display());
}

/// Per-hotel elapsed seconds, sorted by display name.
pub(crate) fn durations_by_name(outcomes: &[Outcome]) -> Vec<(&str, f64)> {
    let mut rows: Vec<(&str, f64)> = outcomes
        .iter()
        .map(|o| (o.name(), o.elapsed().as_secs_f64()))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));
    rows
}

/// Load and validate the roster, printing what was found.
///
/// # Errors
///
/// Returns an error if the roster cannot be read, parsed or validated.
pub(crate) fn validate_roster(config: &AppConfig) -> anyhow::Result<()> {
    let roster = hotelpulse_core::load_roster(&config.roster_path)?;
    let targets = roster.targets();
    println!(
        "roster OK: {} hotel(s) in {}",
        targets.len(),
        config.roster_path.display()
    );
    for target in &targets {
        let region = target.region.as_deref().unwrap_or("-");
        println!("  {:<36} {:<16} {}", target.slug, region, target.query);
    }
    Ok(())
}
