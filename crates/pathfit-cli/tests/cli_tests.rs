//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pathfit() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("pathfit").unwrap();
    cmd.env_remove("PATHFIT_CATALOG");
    cmd
}

fn init_in(dir: &Path) {
    pathfit().current_dir(dir).arg("init").assert().success();
}

fn write_responses(dir: &Path, name: &str, json: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn help_output() {
    pathfit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Career readiness self-assessment scoring",
        ));
}

#[test]
fn version_output() {
    pathfit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pathfit"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    pathfit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created pathfit.toml"))
        .stdout(predicate::str::contains("Created catalogs/example.toml"))
        .stdout(predicate::str::contains("Created responses/example.json"));

    assert!(dir.path().join("pathfit.toml").exists());
    assert!(dir.path().join("catalogs/example.toml").exists());
    assert!(dir.path().join("responses/example.json").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    init_in(dir.path());

    pathfit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_example_catalog() {
    let dir = TempDir::new().unwrap();
    init_in(dir.path());

    pathfit()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--catalog")
        .arg("catalogs/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("8 questions"))
        .stdout(predicate::str::contains("All catalogs valid"));
}

#[test]
fn validate_directory_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("broken.toml"),
        r#"
[catalog]
id = "broken"
name = "Broken"

[[questions]]
id = "t1"
type = "single-choice"
instrument = "technical"
facet = "science"
prompt = "Pick one"
choices = ["a", "b"]
correct_choice = "c"
"#,
    )
    .unwrap();

    pathfit()
        .arg("validate")
        .arg("--catalog")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[t1] WARNING"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    pathfit()
        .arg("validate")
        .arg("--catalog")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn questions_lists_builtin_catalog() {
    let dir = TempDir::new().unwrap();
    pathfit()
        .current_dir(dir.path())
        .arg("questions")
        .arg("--instrument")
        .arg("technical")
        .assert()
        .success()
        .stdout(predicate::str::contains("tech_1"))
        .stdout(predicate::str::contains("psych_1").not());
}

#[test]
fn questions_rejects_unknown_instrument() {
    pathfit()
        .arg("questions")
        .arg("--instrument")
        .arg("astrology")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown instrument"));
}

#[test]
fn score_example_with_config() {
    let dir = TempDir::new().unwrap();
    init_in(dir.path());

    let output = pathfit()
        .current_dir(dir.path())
        .arg("score")
        .arg("--responses")
        .arg("responses/example.json")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["catalog"]["id"], "example");
    assert_eq!(report["result"]["recommendation"], "develop-first");
    assert_eq!(report["result"]["confidence"], 78);
    assert_eq!(report["result"]["technical"]["overall"], 50.0);
}

#[test]
fn score_builtin_text_output() {
    let dir = TempDir::new().unwrap();
    let responses = write_responses(
        dir.path(),
        "answers.json",
        r#"{"psych_1": 5, "tech_5": "Platelets", "retired_question": 2}"#,
    );

    pathfit()
        .current_dir(dir.path())
        .arg("score")
        .arg("--responses")
        .arg(&responses)
        .assert()
        .success()
        .stdout(predicate::str::contains("Composite"))
        .stdout(predicate::str::contains("Psychometric"))
        .stderr(predicate::str::contains("retired_question"));
}

#[test]
fn score_saves_report_and_markdown() {
    let dir = TempDir::new().unwrap();
    let responses = write_responses(dir.path(), "answers.json", r#"[]"#);
    let out = dir.path().join("results");

    pathfit()
        .current_dir(dir.path())
        .arg("score")
        .arg("--responses")
        .arg(&responses)
        .arg("--format")
        .arg("markdown")
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("**Recommendation:**"))
        .stdout(predicate::str::contains("Alternative careers"));

    let saved: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
    assert_eq!(saved.len(), 1);
}

#[test]
fn score_excludes_unsupported_values() {
    let dir = TempDir::new().unwrap();
    let responses = write_responses(
        dir.path(),
        "answers.json",
        r#"{"psych_1": 5, "psych_2": true, "wiscar_3": [1, 2, 3]}"#,
    );

    pathfit()
        .current_dir(dir.path())
        .arg("score")
        .arg("--responses")
        .arg(&responses)
        .assert()
        .success()
        .stdout(predicate::str::contains("Composite"))
        .stderr(predicate::str::contains("2 response(s) excluded"))
        .stderr(predicate::str::contains("psych_2"))
        .stderr(predicate::str::contains("wiscar_3"));
}

#[test]
fn score_markdown_reports_diagnostics_and_guidance() {
    let dir = TempDir::new().unwrap();
    let responses = write_responses(
        dir.path(),
        "answers.json",
        r#"{"psych_1": "often", "retired_question": 2}"#,
    );

    pathfit()
        .current_dir(dir.path())
        .arg("score")
        .arg("--responses")
        .arg(&responses)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("### Career roles"))
        .stdout(predicate::str::contains("Medical Laboratory Technician"))
        .stdout(predicate::str::contains("Foundation Knowledge"))
        .stderr(predicate::str::contains("2 response(s) excluded"))
        .stderr(predicate::str::contains("psych_1"))
        .stderr(predicate::str::contains("retired_question"));
}

#[test]
fn score_text_shows_learning_path() {
    let dir = TempDir::new().unwrap();
    let responses = write_responses(dir.path(), "answers.json", r#"{}"#);

    pathfit()
        .current_dir(dir.path())
        .arg("score")
        .arg("--responses")
        .arg(&responses)
        .assert()
        .success()
        .stdout(predicate::str::contains("Learning path:"))
        .stdout(predicate::str::contains(
            "Phase 4: Certification & Career (3-6 months)",
        ))
        .stdout(predicate::str::contains("Clinical Laboratory Technologist"));
}

#[test]
fn score_invalid_responses_file() {
    let dir = TempDir::new().unwrap();
    let responses = write_responses(dir.path(), "bad.json", "{ not json");

    pathfit()
        .current_dir(dir.path())
        .arg("score")
        .arg("--responses")
        .arg(&responses)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse responses JSON"));
}

fn save_report(dir: &Path, name: &str, responses: &str) -> std::path::PathBuf {
    let responses = write_responses(dir, &format!("{name}-answers.json"), responses);
    let output = pathfit()
        .current_dir(dir)
        .arg("score")
        .arg("--responses")
        .arg(&responses)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let path = dir.join(format!("{name}.json"));
    std::fs::write(&path, &output.stdout).unwrap();
    path
}

#[test]
fn compare_reports() {
    let dir = TempDir::new().unwrap();
    let baseline = save_report(dir.path(), "baseline", r#"{"psych_1": 5, "psych_2": 5}"#);
    let current = save_report(dir.path(), "current", r#"{"psych_1": 1, "psych_2": 1}"#);

    pathfit()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .assert()
        .success()
        .stdout(predicate::str::contains("regressions"))
        .stdout(predicate::str::contains("Psychometric / interest"));

    pathfit()
        .arg("compare")
        .arg("--baseline")
        .arg(&baseline)
        .arg("--current")
        .arg(&current)
        .arg("--fail-on-regression")
        .assert()
        .failure();
}

#[test]
fn compare_nonexistent_report() {
    pathfit()
        .arg("compare")
        .arg("--baseline")
        .arg("no_such_file.json")
        .arg("--current")
        .arg("also_no_file.json")
        .assert()
        .failure();
}

#[test]
fn batch_scores_session_directory() {
    let dir = TempDir::new().unwrap();
    let sessions = dir.path().join("sessions");
    std::fs::create_dir_all(&sessions).unwrap();

    for (i, body) in [r#"{"psych_1": 5}"#, r#"{"tech_5": "Platelets"}"#]
        .iter()
        .enumerate()
    {
        std::fs::write(
            sessions.join(format!("s{i}.json")),
            format!(
                r#"{{
    "id": "00000000-0000-0000-0000-00000000000{i}",
    "catalog_id": "mlt-readiness",
    "started_at": "2026-01-01T00:00:00Z",
    "complete": true,
    "responses": {body}
}}"#
            ),
        )
        .unwrap();
    }
    std::fs::write(
        dir.path().join("pathfit.toml"),
        "output_dir = \"out\"\nparallelism = 2\n",
    )
    .unwrap();

    pathfit()
        .current_dir(dir.path())
        .arg("batch")
        .arg("--sessions")
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 session(s), 2 complete"))
        .stderr(predicate::str::contains("Complete: 2/2 scored"));

    let saved: Vec<_> = std::fs::read_dir(dir.path().join("out")).unwrap().collect();
    assert_eq!(saved.len(), 1);
}

#[test]
fn batch_rejects_zero_parallelism() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("sessions")).unwrap();

    pathfit()
        .current_dir(dir.path())
        .arg("batch")
        .arg("--sessions")
        .arg("sessions")
        .arg("--parallelism")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parallelism must be at least 1"));
}
