//! The `pathfit batch` command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use pathfit_core::config::load_config_from;
use pathfit_core::engine::{BatchReport, ProgressReporter, ScoringEngine};
use pathfit_core::model::{Assessment, Instrument};
use pathfit_core::recommend::Recommendation;
use pathfit_core::session::load_session_directory;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_session_complete(&self, session_id: Uuid, assessment: &Assessment) {
        let result = &assessment.result;
        let notes = if assessment.diagnostics.is_empty() {
            String::new()
        } else {
            format!(" ({} excluded)", assessment.diagnostics.len())
        };
        eprintln!(
            "  Scored: {session_id} composite {:.1}% -> {}{notes}",
            result.composite, result.recommendation
        );
    }

    fn on_session_error(&self, session_id: Uuid, error: &str) {
        eprintln!("  ERROR: {session_id}: {error}");
    }

    fn on_batch_complete(&self, total: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {}/{total} scored, {failed} failed ({:.1}s)",
            total - failed,
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    sessions_dir: PathBuf,
    parallelism: Option<usize>,
    catalog_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let catalog = Arc::new(config.load_catalog(catalog_path.as_deref())?);
    let sessions = load_session_directory(&sessions_dir)?;
    tracing::debug!(
        "loaded {} session(s) from {}",
        sessions.len(),
        sessions_dir.display()
    );

    eprintln!(
        "pathfit v{}: scoring {} session(s) against {} v{}",
        env!("CARGO_PKG_VERSION"),
        sessions.len(),
        catalog.name,
        catalog.version
    );
    eprintln!();

    let engine = ScoringEngine::new(catalog, config.narrative_rules());
    let report = engine
        .score_sessions(sessions, parallelism, &ConsoleReporter)
        .await?;

    print_summary(&report);

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let path = config.output_dir.join(format!("batch-{timestamp}.json"));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
    eprintln!("Results saved to: {}", path.display());

    Ok(())
}

fn print_summary(report: &BatchReport) {
    let stats = &report.stats;

    let mut table = Table::new();
    table.set_header(vec!["Recommendation", "Sessions", "Share"]);
    for rec in Recommendation::ALL {
        table.add_row(vec![
            Cell::new(rec.headline()),
            Cell::new(stats.per_recommendation.get(&rec).copied().unwrap_or(0)),
            Cell::new(format!("{:.1}%", stats.share(rec) * 100.0)),
        ]);
    }
    println!("{table}");

    let mut means = Table::new();
    means.set_header(vec!["Instrument", "Mean overall"]);
    for instrument in Instrument::ALL {
        let mean = stats.mean_overall.get(&instrument).copied().unwrap_or(0.0);
        means.add_row(vec![
            Cell::new(instrument.label()),
            Cell::new(format!("{mean:.1}%")),
        ]);
    }
    means.add_row(vec![
        Cell::new("Composite"),
        Cell::new(format!("{:.1}%", stats.mean_composite)),
    ]);
    println!("{means}");

    println!(
        "{} session(s), {} complete, {} with excluded responses",
        stats.sessions, stats.complete_sessions, stats.with_diagnostics
    );
}
