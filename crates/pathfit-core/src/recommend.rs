//! Recommendation synthesis.
//!
//! Combines the three instrument scores into a composite, maps it onto a
//! categorical recommendation, and selects narrative statements from a
//! fixed rule table keyed by facet. Also holds the fixed career guidance
//! (roles and learning path) reported with every result.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::aggregate::mean;
use crate::model::{AssessmentResult, Instrument, InstrumentScore};

/// Composite at or above this proceeds.
pub const PROCEED_THRESHOLD: f64 = 80.0;
/// Composite at or above this (and below [`PROCEED_THRESHOLD`]) develops first.
pub const DEVELOP_THRESHOLD: f64 = 60.0;

/// Default facet percentage at or above which a strength is reported.
pub const DEFAULT_STRENGTH_THRESHOLD: f64 = 75.0;
/// Default facet percentage below which an improvement is reported.
pub const DEFAULT_IMPROVEMENT_THRESHOLD: f64 = 60.0;

/// Adjacent healthcare roles suggested when the recommendation is to reconsider.
pub const ALTERNATIVE_CAREERS: [&str; 5] = [
    "Health Informatics Specialist",
    "Medical Billing & Coding",
    "Public Health Associate",
    "Radiology Assistant",
    "Pharmacy Technician",
];

/// Categorical outcome of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    Proceed,
    DevelopFirst,
    Reconsider,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [
        Recommendation::Proceed,
        Recommendation::DevelopFirst,
        Recommendation::Reconsider,
    ];

    /// Map a composite score onto a recommendation (lower bounds inclusive).
    pub fn from_composite(composite: f64) -> Self {
        if composite >= PROCEED_THRESHOLD {
            Recommendation::Proceed
        } else if composite >= DEVELOP_THRESHOLD {
            Recommendation::DevelopFirst
        } else {
            Recommendation::Reconsider
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            Recommendation::Proceed => "Proceed with this career path",
            Recommendation::DevelopFirst => "Develop key skills first",
            Recommendation::Reconsider => "Reconsider this career path",
        }
    }

    /// Fixed next steps for this outcome.
    pub fn base_next_steps(&self) -> &'static [&'static str] {
        match self {
            Recommendation::Proceed => &[
                "Enroll in an MLT foundation course",
                "Choose a specialty area (hematology, microbiology, etc.)",
                "Begin hands-on lab experience",
                "Prepare for the certification exam",
            ],
            Recommendation::DevelopFirst => &[
                "Complete bridging coursework in Chemistry and Biology",
                "Gain exposure to lab environments through job shadowing",
                "Practice precision and attention to detail exercises",
                "Retake the assessment after skill development",
            ],
            Recommendation::Reconsider => &[
                "Consider alternative healthcare careers",
                "Explore Health Informatics or Medical Administration",
                "Develop foundational science knowledge",
                "Reassess career goals and interests",
            ],
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recommendation::Proceed => write!(f, "proceed"),
            Recommendation::DevelopFirst => write!(f, "develop-first"),
            Recommendation::Reconsider => write!(f, "reconsider"),
        }
    }
}

impl FromStr for Recommendation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "proceed" | "yes" => Ok(Recommendation::Proceed),
            "develop-first" | "maybe" => Ok(Recommendation::DevelopFirst),
            "reconsider" | "no" => Ok(Recommendation::Reconsider),
            other => Err(format!("unknown recommendation: {other}")),
        }
    }
}

/// Narrative statements attached to one facet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetStatements {
    pub strength: String,
    pub improvement: String,
    #[serde(default)]
    pub next_step: Option<String>,
}

/// Deterministic rule table for strengths, improvements and remedial steps.
#[derive(Debug, Clone)]
pub struct NarrativeRules {
    pub strength_threshold: f64,
    pub improvement_threshold: f64,
    statements: HashMap<(Instrument, String), FacetStatements>,
}

impl Default for NarrativeRules {
    fn default() -> Self {
        let mut rules = Self {
            strength_threshold: DEFAULT_STRENGTH_THRESHOLD,
            improvement_threshold: DEFAULT_IMPROVEMENT_THRESHOLD,
            statements: HashMap::new(),
        };
        for (instrument, facet, strength, improvement, next_step) in BUILTIN_STATEMENTS {
            rules.insert(
                instrument,
                facet,
                FacetStatements {
                    strength: strength.to_string(),
                    improvement: improvement.to_string(),
                    next_step: next_step.map(String::from),
                },
            );
        }
        rules
    }
}

impl NarrativeRules {
    /// Built-in table with custom thresholds.
    pub fn with_thresholds(strength_threshold: f64, improvement_threshold: f64) -> Self {
        Self {
            strength_threshold,
            improvement_threshold,
            ..Self::default()
        }
    }

    pub fn insert(&mut self, instrument: Instrument, facet: &str, statements: FacetStatements) {
        self.statements
            .insert((instrument, facet.to_string()), statements);
    }

    /// Statements for a facet; facets missing from the table get generic wording.
    pub fn statements_for(&self, instrument: Instrument, facet: &str) -> FacetStatements {
        self.statements
            .get(&(instrument, facet.to_string()))
            .cloned()
            .unwrap_or_else(|| FacetStatements {
                strength: format!("Strong {} {facet} results", instrument.label()),
                improvement: format!("Build up your {} {facet} results", instrument.label()),
                next_step: None,
            })
    }
}

/// Build the final result from the three instrument scores.
pub fn synthesize(
    psychometric: InstrumentScore,
    technical: InstrumentScore,
    wiscar: InstrumentScore,
    rules: &NarrativeRules,
) -> AssessmentResult {
    let composite = mean(&[psychometric.overall, technical.overall, wiscar.overall]);
    let recommendation = Recommendation::from_composite(composite);
    let confidence = composite.round().clamp(0.0, 100.0) as u8;

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let mut remedial = Vec::new();

    for score in [&psychometric, &technical, &wiscar] {
        for facet in score.facets.iter().filter(|f| f.scored > 0) {
            let statements = rules.statements_for(score.instrument, &facet.facet);
            if facet.percent >= rules.strength_threshold {
                push_unique(&mut strengths, statements.strength);
            } else if facet.percent < rules.improvement_threshold {
                push_unique(&mut improvements, statements.improvement);
                if let Some(step) = statements.next_step {
                    remedial.push(step);
                }
            }
        }
    }

    let mut next_steps: Vec<String> = recommendation
        .base_next_steps()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for step in remedial {
        push_unique(&mut next_steps, step);
    }

    let alternative_careers = (recommendation == Recommendation::Reconsider)
        .then(|| ALTERNATIVE_CAREERS.iter().map(|s| s.to_string()).collect());

    AssessmentResult {
        psychometric,
        technical,
        wiscar,
        composite,
        recommendation,
        confidence,
        strengths,
        improvements,
        next_steps,
        alternative_careers,
    }
}

fn push_unique(items: &mut Vec<String>, item: String) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// A job the assessed career path leads to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerRole {
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
    /// Typical annual salary range.
    pub salary: String,
    /// Projected job growth.
    pub growth: String,
}

/// One phase of the suggested learning path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPhase {
    pub phase: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub modules: Vec<String>,
}

/// Fixed career guidance shown alongside every result.
///
/// Independent of the scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CareerGuidance {
    #[serde(default)]
    pub career_roles: Vec<CareerRole>,
    #[serde(default)]
    pub learning_path: Vec<LearningPhase>,
}

impl CareerGuidance {
    /// Guidance for the medical laboratory technician path.
    pub fn builtin() -> Self {
        let career_roles = BUILTIN_ROLES
            .iter()
            .map(|(title, description, salary, growth, requirements)| CareerRole {
                title: title.to_string(),
                description: description.to_string(),
                requirements: requirements.iter().map(|r| r.to_string()).collect(),
                salary: salary.to_string(),
                growth: growth.to_string(),
            })
            .collect();
        let learning_path = BUILTIN_LEARNING_PATH
            .iter()
            .map(|(phase, title, description, duration, modules)| LearningPhase {
                phase: phase.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                duration: duration.to_string(),
                modules: modules.iter().map(|m| m.to_string()).collect(),
            })
            .collect();
        Self {
            career_roles,
            learning_path,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.career_roles.is_empty() && self.learning_path.is_empty()
    }

    /// Format the guidance as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        if !self.career_roles.is_empty() {
            md.push_str("### Career roles\n\n");
            md.push_str("| Role | Salary | Growth | Requirements |\n");
            md.push_str("|------|--------|--------|--------------|\n");
            for role in &self.career_roles {
                md.push_str(&format!(
                    "| **{}**<br>{} | {} | {} | {} |\n",
                    role.title,
                    role.description,
                    role.salary,
                    role.growth,
                    role.requirements.join(", ")
                ));
            }
            md.push('\n');
        }

        if !self.learning_path.is_empty() {
            md.push_str("### Learning path\n\n");
            for phase in &self.learning_path {
                md.push_str(&format!(
                    "**{}: {}** ({})\n\n{}\n\n",
                    phase.phase, phase.title, phase.duration, phase.description
                ));
                for module in &phase.modules {
                    md.push_str(&format!("- {module}\n"));
                }
                md.push('\n');
            }
        }

        md
    }
}

type RoleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    [&'static str; 3],
);

const BUILTIN_ROLES: [RoleRow; 5] = [
    (
        "Medical Laboratory Technician",
        "Executes lab tests, processes samples, maintains equipment",
        "$35,000 - $50,000",
        "7% (Faster than average)",
        ["MLT Certification", "2-year degree", "Lab experience"],
    ),
    (
        "Clinical Laboratory Technologist",
        "Specialized diagnostics, supervises technicians",
        "$50,000 - $70,000",
        "11% (Much faster than average)",
        ["Bachelor's degree", "CLS certification", "3+ years experience"],
    ),
    (
        "Pathology Lab Assistant",
        "Supports pathologists in preparing samples and slides",
        "$30,000 - $45,000",
        "5% (Average)",
        ["High school diploma", "On-job training", "Attention to detail"],
    ),
    (
        "Hematology Technician",
        "Specializes in blood disorders and blood bank operations",
        "$40,000 - $55,000",
        "8% (Faster than average)",
        ["MLT certification", "Hematology specialty", "Blood bank training"],
    ),
    (
        "Microbiology Technician",
        "Works with bacterial/viral cultures and infectious diseases",
        "$38,000 - $52,000",
        "9% (Faster than average)",
        ["MLT certification", "Microbiology focus", "Sterile technique"],
    ),
];

type PhaseRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    [&'static str; 4],
);

const BUILTIN_LEARNING_PATH: [PhaseRow; 4] = [
    (
        "Phase 1",
        "Foundation Knowledge",
        "Build essential science background and laboratory fundamentals",
        "3-6 months",
        ["General Biology", "Basic Chemistry", "Medical Terminology", "Lab Safety"],
    ),
    (
        "Phase 2",
        "Technical Skills",
        "Learn laboratory procedures and equipment operation",
        "6-12 months",
        ["Lab Procedures", "Equipment Handling", "Quality Control", "Specimen Processing"],
    ),
    (
        "Phase 3",
        "Applied Practice",
        "Hands-on experience in clinical laboratory settings",
        "6-9 months",
        ["Clinical Practicum", "Specialty Areas", "Case Studies", "Professional Ethics"],
    ),
    (
        "Phase 4",
        "Certification & Career",
        "Certification preparation and entry-level employment",
        "3-6 months",
        ["Certification Prep", "Job Search", "Interview Skills", "Continuing Education"],
    ),
];

type StatementRow = (
    Instrument,
    &'static str,
    &'static str,
    &'static str,
    Option<&'static str>,
);

const BUILTIN_STATEMENTS: [StatementRow; 12] = [
    (
        Instrument::Psychometric,
        "interest",
        "Genuine interest in laboratory science and diagnostics",
        "Confirm your interest in laboratory work before committing",
        Some("Shadow a clinical laboratory team for a day"),
    ),
    (
        Instrument::Psychometric,
        "personality",
        "Strong attention to detail and composure under pressure",
        "Build attention to detail and calm under pressure",
        Some("Practice precision and attention to detail exercises"),
    ),
    (
        Instrument::Psychometric,
        "preferences",
        "Working style suited to procedure-driven lab environments",
        "Reflect on how well independent, protocol-driven work suits you",
        None,
    ),
    (
        Instrument::Technical,
        "logical",
        "Solid analytical and logical reasoning",
        "Strengthen logical reasoning and result interpretation",
        Some("Work through lab result interpretation case studies"),
    ),
    (
        Instrument::Technical,
        "numerical",
        "Confident with laboratory calculations",
        "Enhance numerical calculation speed",
        Some("Practice dilution and unit conversion problems"),
    ),
    (
        Instrument::Technical,
        "science",
        "Solid foundation in scientific principles",
        "Develop foundational science knowledge",
        Some("Complete bridging coursework in Chemistry and Biology"),
    ),
    (
        Instrument::Wiscar,
        "will",
        "Persistence and follow-through on long-term goals",
        "Build persistence through structured study goals",
        None,
    ),
    (
        Instrument::Wiscar,
        "interest",
        "Clear interest in core laboratory activities",
        "Clarify which laboratory activities motivate you",
        None,
    ),
    (
        Instrument::Wiscar,
        "skill",
        "Good hands-on precision and pattern recognition",
        "Develop familiarity with lab equipment",
        Some("Seek hands-on practice with lab instruments"),
    ),
    (
        Instrument::Wiscar,
        "cognitive",
        "Sound judgement when results look unexpected",
        "Strengthen troubleshooting of unexpected results",
        None,
    ),
    (
        Instrument::Wiscar,
        "ability",
        "Open to feedback and quick to learn",
        "Make active use of feedback to improve",
        None,
    ),
    (
        Instrument::Wiscar,
        "real-world",
        "Realistic picture of day-to-day laboratory work",
        "Learn more about the daily realities of lab careers",
        Some("Talk with working MLTs about shifts and workload"),
    ),
];
