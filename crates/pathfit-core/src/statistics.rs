//! Aggregate statistics across many scored sessions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::mean;
use crate::engine::SessionOutcome;
use crate::model::Instrument;
use crate::recommend::Recommendation;

/// Summary of a batch of assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Number of scored sessions.
    pub sessions: usize,
    /// Sessions marked complete by the presentation layer.
    pub complete_sessions: usize,
    /// Session count per recommendation.
    pub per_recommendation: BTreeMap<Recommendation, usize>,
    /// Mean composite score.
    pub mean_composite: f64,
    /// Mean overall score per instrument.
    pub mean_overall: BTreeMap<Instrument, f64>,
    /// Sessions with at least one diagnostic.
    pub with_diagnostics: usize,
}

impl BatchStats {
    /// Compute statistics from scored outcomes.
    pub fn compute(outcomes: &[SessionOutcome]) -> Self {
        let mut per_recommendation: BTreeMap<Recommendation, usize> =
            Recommendation::ALL.iter().map(|r| (*r, 0)).collect();
        for o in outcomes {
            *per_recommendation
                .entry(o.assessment.result.recommendation)
                .or_default() += 1;
        }

        let composites: Vec<f64> = outcomes
            .iter()
            .map(|o| o.assessment.result.composite)
            .collect();

        let mean_overall = Instrument::ALL
            .iter()
            .map(|&instrument| {
                let overalls: Vec<f64> = outcomes
                    .iter()
                    .map(|o| o.assessment.result.instrument(instrument).overall)
                    .collect();
                (instrument, mean(&overalls))
            })
            .collect();

        BatchStats {
            sessions: outcomes.len(),
            complete_sessions: outcomes.iter().filter(|o| o.complete).count(),
            per_recommendation,
            mean_composite: mean(&composites),
            mean_overall,
            with_diagnostics: outcomes
                .iter()
                .filter(|o| !o.assessment.diagnostics.is_empty())
                .count(),
        }
    }

    /// Share of sessions that received `recommendation`, in `[0,1]`.
    pub fn share(&self, recommendation: Recommendation) -> f64 {
        if self.sessions == 0 {
            return 0.0;
        }
        self.per_recommendation
            .get(&recommendation)
            .copied()
            .unwrap_or(0) as f64
            / self.sessions as f64
    }
}
