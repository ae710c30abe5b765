//! The `pathfit score` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use pathfit_core::config::load_config_from;
use pathfit_core::engine::assess_with;
use pathfit_core::model::{AssessmentResult, Instrument};
use pathfit_core::parser::parse_responses;
use pathfit_core::recommend::CareerGuidance;
use pathfit_core::report::AssessmentReport;

pub fn execute(
    responses_path: PathBuf,
    catalog_path: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let catalog = config.load_catalog(catalog_path.as_deref())?;
    let responses = parse_responses(&responses_path)?;
    tracing::debug!(
        "scoring {} response(s) against catalog '{}'",
        responses.len(),
        catalog.id
    );

    let assessment = assess_with(&catalog, &responses, &config.narrative_rules());
    let report = AssessmentReport::from_assessment(&catalog, assessment);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
            print_diagnostics(&report);
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            print_text(&report);
            print_diagnostics(&report);
        }
    }

    if let Some(dir) = output {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let path = dir.join(format!("assessment-{timestamp}.json"));
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    Ok(())
}

fn print_text(report: &AssessmentReport) {
    let result = &report.result;

    println!(
        "Catalog: {} v{} ({} questions)",
        report.catalog.name, report.catalog.version, report.catalog.question_count
    );
    println!("\n{}", score_table(result));
    println!(
        "\nComposite: {:.1}%  Recommendation: {} (confidence {}%)",
        result.composite,
        result.recommendation.headline(),
        result.confidence
    );

    print_list("Strengths", &result.strengths);
    print_list("Areas for improvement", &result.improvements);
    print_list("Next steps", &result.next_steps);
    if let Some(careers) = &result.alternative_careers {
        print_list("Alternative careers", careers);
    }

    print_guidance(&report.guidance);
}

fn print_diagnostics(report: &AssessmentReport) {
    if report.diagnostics.is_empty() {
        return;
    }
    eprintln!("\n{} response(s) excluded:", report.diagnostics.len());
    for d in &report.diagnostics {
        eprintln!("  {d}");
    }
}

fn print_guidance(guidance: &CareerGuidance) {
    if !guidance.career_roles.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Role", "Salary", "Growth", "Requirements"]);
        for role in &guidance.career_roles {
            table.add_row(vec![
                Cell::new(&role.title),
                Cell::new(&role.salary),
                Cell::new(&role.growth),
                Cell::new(role.requirements.join(", ")),
            ]);
        }
        println!("\nCareer roles:\n{table}");
    }

    if !guidance.learning_path.is_empty() {
        println!("\nLearning path:");
        for phase in &guidance.learning_path {
            println!("  {}: {} ({})", phase.phase, phase.title, phase.duration);
            println!("    {}", phase.modules.join(", "));
        }
    }
}

fn score_table(result: &AssessmentResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Instrument", "Facet", "Score", "Answered"]);

    for instrument in Instrument::ALL {
        let score = result.instrument(instrument);
        table.add_row(vec![
            Cell::new(instrument.label()),
            Cell::new("overall"),
            Cell::new(format!("{:.1}%", score.overall)),
            Cell::new(format!("{}/{}", score.answered, score.total)),
        ]);
        for f in &score.facets {
            let percent = if f.scored > 0 {
                format!("{:.1}%", f.percent)
            } else {
                "-".to_string()
            };
            table.add_row(vec![
                Cell::new(""),
                Cell::new(&f.facet),
                Cell::new(percent),
                Cell::new(f.answered),
            ]);
        }
    }

    table
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}:");
    for item in items {
        println!("  - {item}");
    }
}
