//! Assessment reports with JSON persistence and progress comparison.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Diagnostic;
use crate::model::{Assessment, AssessmentResult, Catalog, Instrument};
use crate::recommend::{CareerGuidance, Recommendation};

/// A saved assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Catalog the responses were scored against.
    pub catalog: CatalogSummary,
    pub result: AssessmentResult,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
    /// Career roles and learning path shown with the result.
    #[serde(default)]
    pub guidance: CareerGuidance,
}

/// Summary of a catalog (without the question definitions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub id: String,
    pub name: String,
    pub version: String,
    pub question_count: usize,
}

impl From<&Catalog> for CatalogSummary {
    fn from(catalog: &Catalog) -> Self {
        Self {
            id: catalog.id.clone(),
            name: catalog.name.clone(),
            version: catalog.version.clone(),
            question_count: catalog.len(),
        }
    }
}

impl AssessmentReport {
    pub fn from_assessment(catalog: &Catalog, assessment: Assessment) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            catalog: CatalogSummary::from(catalog),
            result: assessment.result,
            diagnostics: assessment.diagnostics,
            guidance: CareerGuidance::builtin(),
        }
    }

    /// Format the result and career guidance as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = self.result.to_markdown();
        if !self.guidance.is_empty() {
            md.push('\n');
            md.push_str(&self.guidance.to_markdown());
        }
        md
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against an earlier one.
    ///
    /// Deltas are in percentage points; changes within `threshold` count as
    /// unchanged. Facets never scored in a report are left out of it.
    pub fn compare(&self, baseline: &AssessmentReport, threshold: f64) -> ProgressComparison {
        if self.catalog.id != baseline.catalog.id {
            tracing::warn!(
                "comparing reports from different catalogs ('{}' vs '{}')",
                baseline.catalog.id,
                self.catalog.id
            );
        }

        let baseline_scores = dimension_scores(&baseline.result);
        let current_scores = dimension_scores(&self.result);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_dimensions = 0usize;

        for (key, &current) in &current_scores {
            let Some(&baseline_score) = baseline_scores.get(key) else {
                new_dimensions += 1;
                continue;
            };
            let change = ScoreChange {
                instrument: key.0,
                facet: key.1.clone(),
                baseline_score,
                current_score: current,
                delta: current - baseline_score,
            };
            if change.delta < -threshold {
                regressions.push(change);
            } else if change.delta > threshold {
                improvements.push(change);
            } else {
                unchanged += 1;
            }
        }

        let removed_dimensions = baseline_scores
            .keys()
            .filter(|k| !current_scores.contains_key(k))
            .count();

        ProgressComparison {
            baseline_recommendation: baseline.result.recommendation,
            current_recommendation: self.result.recommendation,
            composite_delta: self.result.composite - baseline.result.composite,
            regressions,
            improvements,
            unchanged,
            new_dimensions,
            removed_dimensions,
        }
    }
}

/// Label used for an instrument's overall score in comparisons.
pub const OVERALL: &str = "overall";

fn dimension_scores(result: &AssessmentResult) -> BTreeMap<(Instrument, String), f64> {
    let mut map = BTreeMap::new();
    for instrument in Instrument::ALL {
        let score = result.instrument(instrument);
        map.insert((instrument, OVERALL.to_string()), score.overall);
        for f in score.facets.iter().filter(|f| f.scored > 0) {
            map.insert((instrument, f.facet.clone()), f.percent);
        }
    }
    map
}

/// Result of comparing two assessment reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressComparison {
    pub baseline_recommendation: Recommendation,
    pub current_recommendation: Recommendation,
    pub composite_delta: f64,
    /// Dimensions whose score went down by more than the threshold.
    pub regressions: Vec<ScoreChange>,
    /// Dimensions whose score went up by more than the threshold.
    pub improvements: Vec<ScoreChange>,
    pub unchanged: usize,
    /// Dimensions scored now but not in the baseline.
    pub new_dimensions: usize,
    /// Dimensions scored in the baseline but not now.
    pub removed_dimensions: usize,
}

/// A score movement for one instrument overall or facet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreChange {
    pub instrument: Instrument,
    pub facet: String,
    pub baseline_score: f64,
    pub current_score: f64,
    pub delta: f64,
}

impl ProgressComparison {
    pub fn recommendation_changed(&self) -> bool {
        self.baseline_recommendation != self.current_recommendation
    }

    /// Returns true if any dimension dropped beyond the threshold.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        if self.recommendation_changed() {
            md.push_str(&format!(
                "**Recommendation:** {} -> {}\n\n",
                self.baseline_recommendation, self.current_recommendation
            ));
        } else {
            md.push_str(&format!(
                "**Recommendation:** {} (unchanged)\n\n",
                self.current_recommendation
            ));
        }
        md.push_str(&format!(
            "**Composite:** {:+.1} points\n\n",
            self.composite_delta
        ));

        for (title, changes) in [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ] {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Instrument | Facet | Baseline | Current | Delta |\n");
            md.push_str("|------------|-------|----------|---------|-------|\n");
            for c in changes.iter() {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% | {:.1}% | {:+.1} |\n",
                    c.instrument.label(),
                    c.facet,
                    c.baseline_score,
                    c.current_score,
                    c.delta
                ));
            }
            md.push('\n');
        }

        md
    }
}
