//! Scoring engine.
//!
//! [`assess`] is a pure function of a catalog and a response snapshot.
//! [`ScoringEngine`] wraps a shared catalog and rule table, and scores many
//! sessions concurrently with bounded parallelism.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::aggregate::score_instrument;
use crate::error::Diagnostic;
use crate::model::{Assessment, Catalog, Instrument, Question, ResponseSnapshot};
use crate::normalize::normalize;
use crate::recommend::{synthesize, NarrativeRules};
use crate::session::SessionState;
use crate::statistics::BatchStats;

/// Score a response snapshot against a catalog with the built-in narrative rules.
pub fn assess(catalog: &Catalog, responses: &ResponseSnapshot) -> Assessment {
    assess_with(catalog, responses, &NarrativeRules::default())
}

/// Score a response snapshot against a catalog.
///
/// Never fails: malformed responses and unknown question references are
/// excluded from scoring and reported in `diagnostics`.
pub fn assess_with(
    catalog: &Catalog,
    responses: &ResponseSnapshot,
    rules: &NarrativeRules,
) -> Assessment {
    let index: HashMap<&str, &Question> = catalog
        .questions
        .iter()
        .map(|q| (q.id.as_str(), q))
        .collect();

    let mut contributions = HashMap::new();
    let mut diagnostics = Vec::new();

    for (question_id, value) in responses.iter() {
        let Some(question) = index.get(question_id) else {
            let diagnostic = Diagnostic::unknown(question_id);
            tracing::warn!("{diagnostic}");
            diagnostics.push(diagnostic);
            continue;
        };

        match normalize(question, value) {
            Ok(contribution) => {
                contributions.insert(question.id.as_str(), contribution);
            }
            Err(diagnostic) => {
                tracing::warn!("{diagnostic}");
                diagnostics.push(diagnostic);
            }
        }
    }

    let [psychometric, technical, wiscar] =
        Instrument::ALL.map(|instrument| score_instrument(catalog, instrument, &contributions));

    let result = synthesize(psychometric, technical, wiscar, rules);

    tracing::debug!(
        catalog = %catalog.id,
        answered = responses.answered(),
        total = catalog.len(),
        composite = result.composite,
        recommendation = %result.recommendation,
        "assessment scored"
    );

    Assessment {
        result,
        diagnostics,
    }
}

/// Progress reporting trait for batch scoring.
pub trait ProgressReporter: Send + Sync {
    fn on_session_complete(&self, session_id: Uuid, assessment: &Assessment);
    fn on_session_error(&self, session_id: Uuid, error: &str);
    fn on_batch_complete(&self, total: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_session_complete(&self, _: Uuid, _: &Assessment) {}
    fn on_session_error(&self, _: Uuid, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: Duration) {}
}

/// One scored session from a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    pub complete: bool,
    pub assessment: Assessment,
}

/// Result of scoring a batch of sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Outcomes in input order.
    pub outcomes: Vec<SessionOutcome>,
    pub stats: BatchStats,
    pub failed: usize,
    pub duration_ms: u64,
}

/// Scores responses against one shared, read-only catalog.
#[derive(Clone)]
pub struct ScoringEngine {
    catalog: Arc<Catalog>,
    rules: Arc<NarrativeRules>,
}

impl ScoringEngine {
    pub fn new(catalog: Arc<Catalog>, rules: NarrativeRules) -> Self {
        Self {
            catalog,
            rules: Arc::new(rules),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn score(&self, responses: &ResponseSnapshot) -> Assessment {
        assess_with(&self.catalog, responses, &self.rules)
    }

    pub fn score_session(&self, session: &SessionState) -> Assessment {
        if session.catalog_id != self.catalog.id {
            tracing::warn!(
                "session {} was recorded against catalog '{}', scoring with '{}'",
                session.id,
                session.catalog_id,
                self.catalog.id
            );
        }
        self.score(&session.responses)
    }

    /// Score many sessions concurrently, at most `parallelism` at a time.
    pub async fn score_sessions(
        &self,
        sessions: Vec<SessionState>,
        parallelism: usize,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchReport> {
        anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(parallelism));
        let total = sessions.len();

        let mut futures = FuturesUnordered::new();

        for (position, session) in sessions.into_iter().enumerate() {
            let engine = self.clone();
            let semaphore = Arc::clone(&semaphore);

            futures.push(async move {
                let session_id = session.id;
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                    let complete = session.complete;
                    let assessment =
                        tokio::task::spawn_blocking(move || engine.score_session(&session))
                            .await?;

                    Ok::<_, anyhow::Error>(SessionOutcome {
                        session_id,
                        complete,
                        assessment,
                    })
                };
                (position, session_id, inner.await)
            });
        }

        let mut outcomes = Vec::with_capacity(total);
        let mut failed = 0usize;

        while let Some((position, session_id, result)) = futures.next().await {
            match result {
                Ok(outcome) => {
                    progress.on_session_complete(session_id, &outcome.assessment);
                    outcomes.push((position, outcome));
                }
                Err(e) => {
                    tracing::error!("scoring failed for session {session_id}: {e:#}");
                    progress.on_session_error(session_id, &e.to_string());
                    failed += 1;
                }
            }
        }

        outcomes.sort_by_key(|(position, _)| *position);
        let outcomes: Vec<SessionOutcome> = outcomes.into_iter().map(|(_, o)| o).collect();

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, failed, elapsed);

        let stats = BatchStats::compute(&outcomes);

        Ok(BatchReport {
            outcomes,
            stats,
            failed,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}
