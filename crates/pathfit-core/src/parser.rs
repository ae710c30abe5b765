//! Catalog and response parsing.
//!
//! Loads question catalogs from TOML files and directories, loads response
//! snapshots from JSON, and validates catalogs against their invariants.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{
    Catalog, Instrument, Question, QuestionKind, ResponseSnapshot, ResponseValue, ScaleBounds,
};

/// Intermediate TOML structure for parsing catalog files.
#[derive(Debug, Deserialize)]
struct TomlCatalogFile {
    catalog: TomlCatalogHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlCatalogHeader {
    id: String,
    name: String,
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    description: String,
}

fn default_version() -> String {
    "1".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(rename = "type")]
    kind: QuestionKind,
    #[serde(alias = "category")]
    instrument: String,
    #[serde(alias = "subcategory")]
    facet: String,
    #[serde(alias = "question")]
    prompt: String,
    #[serde(default, alias = "options")]
    choices: Vec<String>,
    #[serde(default)]
    scale: Option<TomlScale>,
    #[serde(default)]
    correct_choice: Option<String>,
    #[serde(default)]
    choice_weights: Option<Vec<f64>>,
    #[serde(default)]
    reference_order: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct TomlScale {
    min: i64,
    max: i64,
    #[serde(default)]
    labels: Vec<String>,
}

/// Parse a single TOML file into a `Catalog`.
pub fn parse_catalog(path: &Path) -> Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file: {}", path.display()))?;

    parse_catalog_str(&content, path)
}

/// Parse a TOML string into a `Catalog`.
pub fn parse_catalog_str(content: &str, source_path: &Path) -> Result<Catalog> {
    let parsed: TomlCatalogFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let instrument: Instrument = q
                .instrument
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question {}: {}", q.id, e))?;

            Ok(Question {
                id: q.id,
                kind: q.kind,
                instrument,
                facet: q.facet,
                prompt: q.prompt,
                choices: q.choices,
                scale: q.scale.map(|s| ScaleBounds {
                    min: s.min,
                    max: s.max,
                    labels: s.labels,
                }),
                correct_choice: q.correct_choice,
                choice_weights: q.choice_weights,
                reference_order: q.reference_order,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Catalog {
        id: parsed.catalog.id,
        name: parsed.catalog.name,
        version: parsed.catalog.version,
        description: parsed.catalog.description,
        questions,
    })
}

/// Recursively load all `.toml` catalog files from a directory.
pub fn load_catalog_directory(dir: &Path) -> Result<Vec<Catalog>> {
    let mut catalogs = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            catalogs.extend(load_catalog_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_catalog(&path) {
                Ok(catalog) => catalogs.push(catalog),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(catalogs)
}

/// Wire shapes accepted for a response file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseFile {
    Keyed(ResponseSnapshot),
    Listed(Vec<ResponseEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseEntry {
    #[serde(alias = "question_id")]
    question_id: String,
    #[serde(default)]
    value: ResponseValue,
}

/// Load a response snapshot from a JSON file.
pub fn parse_responses(path: &Path) -> Result<ResponseSnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responses file: {}", path.display()))?;

    parse_responses_str(&content, path)
}

/// Parse a response snapshot from either a JSON object keyed by question id
/// or a JSON array of `{questionId, value}` entries. In the array form a
/// later entry for the same question replaces an earlier one.
pub fn parse_responses_str(content: &str, source_path: &Path) -> Result<ResponseSnapshot> {
    let parsed: ResponseFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse responses JSON: {}", source_path.display()))?;

    Ok(match parsed {
        ResponseFile::Keyed(snapshot) => snapshot,
        ResponseFile::Listed(entries) => entries
            .into_iter()
            .map(|e| (e.question_id, e.value))
            .collect(),
    })
}

/// A warning from catalog validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate a catalog against the question invariants.
pub fn validate_catalog(catalog: &Catalog) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if catalog.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "catalog has no questions".into(),
        });
    }

    // Check for duplicate question IDs
    let mut seen_ids = HashSet::new();
    for q in &catalog.questions {
        if !seen_ids.insert(q.id.as_str()) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in &catalog.questions {
        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "prompt is empty"));
        }
        if q.facet.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "facet is empty"));
        }

        if q.kind.has_choices() && q.choices.is_empty() {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("{} question has no choices", q.kind),
            ));
        }

        if q.kind == QuestionKind::ScaleRating {
            validate_scale(q, &mut warnings);
        }

        validate_answer_key(q, &mut warnings);
    }

    warnings
}

fn validate_scale(q: &Question, warnings: &mut Vec<ValidationWarning>) {
    let Some(scale) = &q.scale else {
        warnings.push(ValidationWarning::question(
            &q.id,
            "scale-rating question has no scale bounds",
        ));
        return;
    };

    if scale.max < scale.min {
        warnings.push(ValidationWarning::question(
            &q.id,
            format!("scale max {} is below min {}", scale.max, scale.min),
        ));
        return;
    }

    let expected = scale.max.abs_diff(scale.min).saturating_add(1);
    if scale.labels.len() as u64 != expected {
        warnings.push(ValidationWarning::question(
            &q.id,
            format!(
                "scale has {} labels, expected {expected}",
                scale.labels.len()
            ),
        ));
    }
}

fn validate_answer_key(q: &Question, warnings: &mut Vec<ValidationWarning>) {
    if q.instrument == Instrument::Technical
        && q.kind == QuestionKind::SingleChoice
        && q.correct_choice.is_none()
    {
        warnings.push(ValidationWarning::question(
            &q.id,
            "technical single-choice question has no correct_choice and will only count for coverage",
        ));
    }

    if let Some(correct) = &q.correct_choice {
        if q.choice_index(correct).is_none() {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("correct_choice '{correct}' is not one of the choices"),
            ));
        }
    }

    if let Some(weights) = &q.choice_weights {
        if weights.len() != q.choices.len() {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!(
                    "choice_weights has {} entries for {} choices",
                    weights.len(),
                    q.choices.len()
                ),
            ));
        }
        if weights.iter().any(|w| !(0.0..=1.0).contains(w)) {
            warnings.push(ValidationWarning::question(
                &q.id,
                "choice_weights must lie between 0 and 1",
            ));
        }
    }

    if let Some(reference) = &q.reference_order {
        let distinct: HashSet<&str> = reference.iter().map(String::as_str).collect();
        let is_permutation = reference.len() == q.choices.len()
            && distinct.len() == reference.len()
            && reference.iter().all(|r| q.choice_index(r).is_some());
        if !is_permutation {
            warnings.push(ValidationWarning::question(
                &q.id,
                "reference_order is not an ordering of the choices",
            ));
        }
    }
}
