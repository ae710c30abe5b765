//! The `pathfit init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_once(Path::new("pathfit.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("catalogs")?;
    write_once(Path::new("catalogs/example.toml"), EXAMPLE_CATALOG)?;

    std::fs::create_dir_all("responses")?;
    write_once(Path::new("responses/example.json"), EXAMPLE_RESPONSES)?;

    println!("\nNext steps:");
    println!("  1. Run: pathfit validate --catalog catalogs/example.toml");
    println!("  2. Run: pathfit score --responses responses/example.json");
    println!("  3. Drop catalog = ... from pathfit.toml to score against the built-in catalog");

    Ok(())
}

fn write_once(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# pathfit configuration

catalog = "catalogs/example.toml"
output_dir = "./pathfit-results"
parallelism = 4
strength_threshold = 75.0
improvement_threshold = 60.0
"#;

const EXAMPLE_CATALOG: &str = r#"[catalog]
id = "example"
name = "Example Readiness Catalog"
version = "1"
description = "A small catalog covering every question type"

[[questions]]
id = "p1"
type = "scale-rating"
instrument = "psychometric"
facet = "interest"
prompt = "I enjoy working with laboratory equipment."
scale = { min = 1, max = 5, labels = ["Strongly Disagree", "Disagree", "Neutral", "Agree", "Strongly Agree"] }

[[questions]]
id = "p2"
type = "scale-rating"
instrument = "psychometric"
facet = "personality"
prompt = "I stay calm when a task needs exact attention to detail."
scale = { min = 1, max = 5, labels = ["Strongly Disagree", "Disagree", "Neutral", "Agree", "Strongly Agree"] }

[[questions]]
id = "p3"
type = "forced-choice-pair"
instrument = "psychometric"
facet = "motivation"
prompt = "Which part of a clinical job appeals to you more?"
choices = ["Hands-on lab work", "Talking with patients"]
choice_weights = [1.0, 0.5]

[[questions]]
id = "t1"
type = "single-choice"
instrument = "technical"
facet = "science"
prompt = "Which blood component is primarily responsible for clotting?"
choices = ["Red blood cells", "White blood cells", "Platelets", "Plasma"]
correct_choice = "Platelets"

[[questions]]
id = "t2"
type = "single-choice"
instrument = "technical"
facet = "math"
prompt = "How many mL of a 10% stock make 100 mL of a 2% solution?"
choices = ["2 mL", "10 mL", "20 mL", "50 mL"]
correct_choice = "20 mL"

[[questions]]
id = "w1"
type = "scale-rating"
instrument = "wiscar"
facet = "will"
prompt = "I would keep studying after a failed certification exam."
scale = { min = 1, max = 5, labels = ["Strongly Disagree", "Disagree", "Neutral", "Agree", "Strongly Agree"] }

[[questions]]
id = "w2"
type = "ranking"
instrument = "wiscar"
facet = "interest"
prompt = "Rank these tasks from most to least interesting."
choices = ["Running analyzers", "Microscopy", "Data entry"]
reference_order = ["Running analyzers", "Microscopy", "Data entry"]

[[questions]]
id = "w3"
type = "multi-choice-scenario"
instrument = "wiscar"
facet = "cognitive"
prompt = "A control sample reads out of range. What do you do first?"
choices = ["Report patient results anyway", "Rerun the control and check reagents", "Ask a colleague"]
choice_weights = [0.0, 1.0, 0.5]
"#;

const EXAMPLE_RESPONSES: &str = r#"{
  "p1": 5,
  "p2": 4,
  "p3": "Hands-on lab work",
  "t1": "Platelets",
  "t2": "10 mL",
  "w1": 4,
  "w2": ["Running analyzers", "Microscopy", "Data entry"],
  "w3": "Rerun the control and check reagents"
}
"#;
