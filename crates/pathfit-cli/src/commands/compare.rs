//! The `pathfit compare` command.

use std::path::PathBuf;

use anyhow::Result;

use pathfit_core::report::AssessmentReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = AssessmentReport::load_json(&baseline_path)?;
    let current = AssessmentReport::load_json(&current_path)?;

    let comparison = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", comparison.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                comparison.regressions.len(),
                comparison.improvements.len(),
                comparison.unchanged
            );
            println!(
                "Recommendation: {} -> {} (composite {:+.1})",
                comparison.baseline_recommendation,
                comparison.current_recommendation,
                comparison.composite_delta
            );

            for (title, changes) in [
                ("Regressions", &comparison.regressions),
                ("Improvements", &comparison.improvements),
            ] {
                if changes.is_empty() {
                    continue;
                }
                println!("\n{title}:");
                for c in changes.iter() {
                    println!(
                        "  {} / {} {:.1}% -> {:.1}% ({:+.1})",
                        c.instrument.label(),
                        c.facet,
                        c.baseline_score,
                        c.current_score,
                        c.delta
                    );
                }
            }

            if comparison.new_dimensions > 0 {
                println!("\n{} newly scored dimension(s)", comparison.new_dimensions);
            }
            if comparison.removed_dimensions > 0 {
                println!("{} dimension(s) no longer scored", comparison.removed_dimensions);
            }
        }
    }

    if fail_on_regression && comparison.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
