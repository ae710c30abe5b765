//! Serializable assessment session state.
//!
//! Holds what a presentation layer needs to resume a session: the current
//! question position, elapsed time, completion flag and the response
//! snapshot. Sessions are plain values; persisting or running them
//! concurrently needs no shared state.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Catalog, ResponseSnapshot, ResponseValue};

/// One respondent's progress through a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: Uuid,
    pub catalog_id: String,
    pub started_at: DateTime<Utc>,
    /// 0-based index of the question on screen.
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub elapsed_secs: u64,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub responses: ResponseSnapshot,
}

/// Answered/total counts for a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub percent: f64,
}

impl SessionState {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog_id: catalog.id.clone(),
            started_at: Utc::now(),
            current_index: 0,
            elapsed_secs: 0,
            complete: false,
            responses: ResponseSnapshot::new(),
        }
    }

    /// Record or replace an answer.
    pub fn record(&mut self, question_id: impl Into<String>, value: impl Into<ResponseValue>) {
        self.responses.record(question_id, value);
    }

    /// Move to the next question; returns `false` at the last one.
    pub fn advance(&mut self, catalog: &Catalog) -> bool {
        if self.current_index + 1 < catalog.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous question; returns `false` at the first one.
    pub fn go_back(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn tick(&mut self, secs: u64) {
        if !self.complete {
            self.elapsed_secs = self.elapsed_secs.saturating_add(secs);
        }
    }

    pub fn mark_complete(&mut self) {
        self.complete = true;
    }

    /// Clear answers and position, keeping the session identity.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.elapsed_secs = 0;
        self.complete = false;
        self.responses = ResponseSnapshot::new();
    }

    /// Progress counted against questions the catalog actually contains.
    pub fn progress(&self, catalog: &Catalog) -> Progress {
        let total = catalog.len();
        let answered = catalog
            .questions
            .iter()
            .filter(|q| {
                self.responses
                    .get(&q.id)
                    .is_some_and(|v| !matches!(v, ResponseValue::Absent))
            })
            .count();
        let percent = if total == 0 {
            0.0
        } else {
            answered as f64 / total as f64 * 100.0
        };
        Progress {
            answered,
            total,
            percent,
        }
    }

    /// Elapsed time as `mm:ss`.
    pub fn format_elapsed(&self) -> String {
        format!("{}:{:02}", self.elapsed_secs / 60, self.elapsed_secs % 60)
    }

    /// Save the session as JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize session")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write session to {}", path.display()))?;
        Ok(())
    }

    /// Load a session from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session from {}", path.display()))?;
        let session: SessionState =
            serde_json::from_str(&content).context("failed to parse session JSON")?;
        Ok(session)
    }
}

/// Load every `.json` session file in a directory, sorted by file name.
pub fn load_session_directory(dir: &Path) -> Result<Vec<SessionState>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut sessions = Vec::with_capacity(paths.len());
    for path in paths {
        match SessionState::load_json(&path) {
            Ok(session) => sessions.push(session),
            Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
        }
    }
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;

    #[test]
    fn record_upserts_and_counts_progress() {
        let catalog = builtin_catalog();
        let mut session = SessionState::new(&catalog);
        session.record("psych_1", 3);
        session.record("psych_1", 4);
        session.record("tech_1", "5.2");
        session.record("not_in_catalog", 1);
        session.record("psych_2", ResponseValue::Absent);

        let progress = session.progress(&catalog);
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.total, 22);
        assert_eq!(
            session.responses.get("psych_1"),
            Some(&ResponseValue::Integer(4))
        );
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let catalog = builtin_catalog();
        let mut session = SessionState::new(&catalog);
        assert!(!session.go_back());
        for _ in 0..catalog.len() - 1 {
            assert!(session.advance(&catalog));
        }
        assert!(!session.advance(&catalog));
        assert_eq!(session.current_index, catalog.len() - 1);
    }

    #[test]
    fn timer_stops_when_complete() {
        let catalog = builtin_catalog();
        let mut session = SessionState::new(&catalog);
        session.tick(61);
        assert_eq!(session.format_elapsed(), "1:01");
        session.mark_complete();
        session.tick(30);
        assert_eq!(session.elapsed_secs, 61);
    }

    #[test]
    fn reset_keeps_identity() {
        let catalog = builtin_catalog();
        let mut session = SessionState::new(&catalog);
        let id = session.id;
        session.record("psych_1", 5);
        session.advance(&catalog);
        session.mark_complete();
        session.reset();
        assert_eq!(session.id, id);
        assert!(session.responses.is_empty());
        assert!(!session.complete);
        assert_eq!(session.current_index, 0);
    }

    #[test]
    fn json_roundtrip() {
        let catalog = builtin_catalog();
        let mut session = SessionState::new(&catalog);
        session.record("wiscar_3", vec!["a", "b"]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions").join("s1.json");

        session.save_json(&path).unwrap();
        let loaded = SessionState::load_json(&path).unwrap();
        assert_eq!(loaded, session);

        std::fs::write(dir.path().join("sessions").join("junk.json"), "{").unwrap();
        let all = load_session_directory(&dir.path().join("sessions")).unwrap();
        assert_eq!(all.len(), 1);
    }
}
