//! Core data model types for pathfit.
//!
//! These are the fundamental types the whole system uses to represent
//! question catalogs, raw responses, and the scored assessment result.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::recommend::Recommendation;

/// One of the three question groupings in an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Psychometric,
    Technical,
    Wiscar,
}

impl Instrument {
    /// All instruments in scoring order.
    pub const ALL: [Instrument; 3] = [
        Instrument::Psychometric,
        Instrument::Technical,
        Instrument::Wiscar,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Instrument::Psychometric => "Psychometric",
            Instrument::Technical => "Technical",
            Instrument::Wiscar => "WISCAR",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instrument::Psychometric => write!(f, "psychometric"),
            Instrument::Technical => write!(f, "technical"),
            Instrument::Wiscar => write!(f, "wiscar"),
        }
    }
}

impl FromStr for Instrument {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "psychometric" | "psych" => Ok(Instrument::Psychometric),
            "technical" | "tech" => Ok(Instrument::Technical),
            "wiscar" => Ok(Instrument::Wiscar),
            other => Err(format!("unknown instrument: {other}")),
        }
    }
}

/// Question type; determines the expected answer shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    #[serde(alias = "likert")]
    ScaleRating,
    #[serde(alias = "mcq")]
    SingleChoice,
    #[serde(alias = "scenario")]
    MultiChoiceScenario,
    #[serde(alias = "forced-choice")]
    ForcedChoicePair,
    Ranking,
}

impl QuestionKind {
    /// Whether questions of this kind must carry a choice list.
    pub fn has_choices(&self) -> bool {
        !matches!(self, QuestionKind::ScaleRating)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::ScaleRating => write!(f, "scale-rating"),
            QuestionKind::SingleChoice => write!(f, "single-choice"),
            QuestionKind::MultiChoiceScenario => write!(f, "multi-choice-scenario"),
            QuestionKind::ForcedChoicePair => write!(f, "forced-choice-pair"),
            QuestionKind::Ranking => write!(f, "ranking"),
        }
    }
}

/// Bounds and labels of a scale-rating question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    pub min: i64,
    pub max: i64,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ScaleBounds {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// A single catalog question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier; determines instrument and kind.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub instrument: Instrument,
    /// Sub-dimension within the instrument (e.g. "interest", "logical").
    pub facet: String,
    pub prompt: String,
    /// Ordered choices for choice and ranking kinds.
    #[serde(default)]
    pub choices: Vec<String>,
    /// Present for scale-rating questions.
    #[serde(default)]
    pub scale: Option<ScaleBounds>,
    /// Answer key for technical single-choice questions.
    #[serde(default)]
    pub correct_choice: Option<String>,
    /// Per-choice weight in `[0,1]` for subjective choice questions.
    #[serde(default)]
    pub choice_weights: Option<Vec<f64>>,
    /// Reference ranking for ranking questions.
    #[serde(default)]
    pub reference_order: Option<Vec<String>>,
}

impl Question {
    /// Index of `choice` in the choice list.
    pub fn choice_index(&self, choice: &str) -> Option<usize> {
        self.choices.iter().position(|c| c == choice)
    }

    /// Describes the answer shape this question accepts.
    pub fn expected_shape(&self) -> String {
        match (self.kind, &self.scale) {
            (QuestionKind::ScaleRating, Some(scale)) => {
                format!("an integer between {} and {}", scale.min, scale.max)
            }
            (QuestionKind::ScaleRating, None) => "an integer scale value".to_string(),
            (QuestionKind::Ranking, _) => {
                format!("an ordering of all {} choices", self.choices.len())
            }
            _ => "one of the listed choices".to_string(),
        }
    }
}

/// An ordered, immutable question catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

fn default_version() -> String {
    "1".to_string()
}

impl Catalog {
    /// Build a catalog from the three per-instrument lists, in scoring order.
    pub fn from_parts(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        psychometric: Vec<Question>,
        technical: Vec<Question>,
        wiscar: Vec<Question>,
    ) -> Self {
        let mut questions = psychometric;
        questions.extend(technical);
        questions.extend(wiscar);
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            description: String::new(),
            questions,
        }
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// 1-based question number, as shown to respondents.
    pub fn number_of(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id).map(|i| i + 1)
    }

    pub fn questions_for(&self, instrument: Instrument) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |q| q.instrument == instrument)
    }

    /// Facets of an instrument in first-appearance order.
    pub fn facets(&self, instrument: Instrument) -> Vec<&str> {
        let mut facets: Vec<&str> = Vec::new();
        for q in self.questions_for(instrument) {
            if !facets.contains(&q.facet.as_str()) {
                facets.push(q.facet.as_str());
            }
        }
        facets
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// A raw, loosely typed answer as submitted by the presentation layer.
///
/// Validated against the question's kind by [`crate::normalize`] before it
/// contributes to any score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
    List(Vec<String>),
    #[default]
    Absent,
    /// Any other JSON value (booleans, objects, lists of non-strings).
    Other(serde_json::Value),
}

impl ResponseValue {
    /// Short description of the value's shape, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            ResponseValue::Integer(_) => "integer",
            ResponseValue::Decimal(_) => "decimal number",
            ResponseValue::Text(_) => "string",
            ResponseValue::List(_) => "list of strings",
            ResponseValue::Absent => "nothing",
            ResponseValue::Other(_) => "unsupported value",
        }
    }
}

impl From<i64> for ResponseValue {
    fn from(v: i64) -> Self {
        ResponseValue::Integer(v)
    }
}

impl From<i32> for ResponseValue {
    fn from(v: i32) -> Self {
        ResponseValue::Integer(i64::from(v))
    }
}

impl From<Vec<&str>> for ResponseValue {
    fn from(v: Vec<&str>) -> Self {
        ResponseValue::List(v.into_iter().map(String::from).collect())
    }
}

impl From<&str> for ResponseValue {
    fn from(v: &str) -> Self {
        ResponseValue::Text(v.to_string())
    }
}

impl From<String> for ResponseValue {
    fn from(v: String) -> Self {
        ResponseValue::Text(v)
    }
}

impl From<Vec<String>> for ResponseValue {
    fn from(v: Vec<String>) -> Self {
        ResponseValue::List(v)
    }
}

/// A validated answer, keyed by the question's declared kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Scale(i64),
    Choice(usize),
    Ranking(Vec<usize>),
}

/// The respondent's current answers, at most one per question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseSnapshot {
    responses: BTreeMap<String, ResponseValue>,
}

impl ResponseSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the answer for `question_id`.
    pub fn record(&mut self, question_id: impl Into<String>, value: impl Into<ResponseValue>) {
        self.responses.insert(question_id.into(), value.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&ResponseValue> {
        self.responses.get(question_id)
    }

    pub fn remove(&mut self, question_id: &str) -> Option<ResponseValue> {
        self.responses.remove(question_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResponseValue)> {
        self.responses.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of responses that carry a value.
    pub fn answered(&self) -> usize {
        self.responses
            .values()
            .filter(|v| !matches!(v, ResponseValue::Absent))
            .count()
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl<K: Into<String>, V: Into<ResponseValue>> FromIterator<(K, V)> for ResponseSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = ResponseSnapshot::new();
        for (k, v) in iter {
            snapshot.record(k, v);
        }
        snapshot
    }
}

/// Score of a single facet within an instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetScore {
    pub facet: String,
    /// Percentage in `[0,100]`; 0 when nothing was scored.
    pub percent: f64,
    /// Questions in this facet with a well-formed answer.
    pub answered: usize,
    /// Answers that contributed a directional score.
    pub scored: usize,
}

/// Per-instrument score: facet percentages plus one overall percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentScore {
    pub instrument: Instrument,
    pub facets: Vec<FacetScore>,
    pub overall: f64,
    pub answered: usize,
    pub total: usize,
}

impl InstrumentScore {
    pub fn facet(&self, name: &str) -> Option<&FacetScore> {
        self.facets.iter().find(|f| f.facet == name)
    }

    /// Facet percentage by name, 0 for unknown facets.
    pub fn percent(&self, name: &str) -> f64 {
        self.facet(name).map(|f| f.percent).unwrap_or(0.0)
    }
}

/// The scored outcome of one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub psychometric: InstrumentScore,
    pub technical: InstrumentScore,
    pub wiscar: InstrumentScore,
    /// Equal-weighted mean of the three instrument overalls.
    pub composite: f64,
    pub recommendation: Recommendation,
    pub confidence: u8,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_careers: Option<Vec<String>>,
}

impl AssessmentResult {
    pub fn instrument(&self, instrument: Instrument) -> &InstrumentScore {
        match instrument {
            Instrument::Psychometric => &self.psychometric,
            Instrument::Technical => &self.technical,
            Instrument::Wiscar => &self.wiscar,
        }
    }

    /// Format the result as a shareable markdown summary.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Recommendation:** {} (confidence {}%)\n\n",
            self.recommendation.headline(),
            self.confidence
        ));

        md.push_str("| Instrument | Facet | Score |\n");
        md.push_str("|------------|-------|-------|\n");
        for instrument in Instrument::ALL {
            let score = self.instrument(instrument);
            md.push_str(&format!(
                "| {} | **overall** | {:.1}% |\n",
                instrument.label(),
                score.overall
            ));
            for f in &score.facets {
                md.push_str(&format!(
                    "| {} | {} | {:.1}% |\n",
                    instrument.label(),
                    f.facet,
                    f.percent
                ));
            }
        }
        md.push('\n');

        let sections = [
            ("Strengths", &self.strengths),
            ("Areas for improvement", &self.improvements),
            ("Next steps", &self.next_steps),
        ];
        for (title, items) in sections {
            if items.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            for item in items.iter() {
                md.push_str(&format!("- {item}\n"));
            }
            md.push('\n');
        }

        if let Some(careers) = &self.alternative_careers {
            md.push_str("### Alternative careers\n\n");
            for c in careers {
                md.push_str(&format!("- {c}\n"));
            }
        }

        md
    }
}

/// Engine output: the result plus any anomalies found in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub result: AssessmentResult,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}
