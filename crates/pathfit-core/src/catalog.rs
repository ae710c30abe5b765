//! Built-in medical laboratory technician (MLT) readiness catalog.

use crate::model::{Catalog, Instrument, Question, QuestionKind, ScaleBounds};

pub const BUILTIN_CATALOG_ID: &str = "mlt-readiness";
pub const BUILTIN_CATALOG_VERSION: &str = "2";

const AGREEMENT: [&str; 5] = [
    "Strongly Disagree",
    "Disagree",
    "Neutral",
    "Agree",
    "Strongly Agree",
];
const FREQUENCY: [&str; 5] = ["Never", "Rarely", "Sometimes", "Often", "Always"];
const LIKE_ME: [&str; 5] = [
    "Not at all like me",
    "Not much like me",
    "Somewhat like me",
    "Mostly like me",
    "Very much like me",
];
const DEGREE: [&str; 5] = ["Not at all", "Slightly", "Moderately", "Very", "Extremely"];

fn likert(
    id: &str,
    instrument: Instrument,
    facet: &str,
    prompt: &str,
    labels: [&str; 5],
) -> Question {
    Question {
        id: id.into(),
        kind: QuestionKind::ScaleRating,
        instrument,
        facet: facet.into(),
        prompt: prompt.into(),
        choices: vec![],
        scale: Some(ScaleBounds {
            min: 1,
            max: 5,
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }),
        correct_choice: None,
        choice_weights: None,
        reference_order: None,
    }
}

fn choice(
    id: &str,
    kind: QuestionKind,
    instrument: Instrument,
    facet: &str,
    prompt: &str,
    choices: &[&str],
) -> Question {
    Question {
        id: id.into(),
        kind,
        instrument,
        facet: facet.into(),
        prompt: prompt.into(),
        choices: choices.iter().map(|c| c.to_string()).collect(),
        scale: None,
        correct_choice: None,
        choice_weights: None,
        reference_order: None,
    }
}

fn keyed(facet: &str, id: &str, prompt: &str, choices: &[&str], correct: usize) -> Question {
    let mut q = choice(
        id,
        QuestionKind::SingleChoice,
        Instrument::Technical,
        facet,
        prompt,
        choices,
    );
    q.correct_choice = choices.get(correct).map(|c| c.to_string());
    q
}

fn weighted(mut q: Question, weights: &[f64]) -> Question {
    q.choice_weights = Some(weights.to_vec());
    q
}

pub fn psychometric_questions() -> Vec<Question> {
    use Instrument::Psychometric as P;
    vec![
        likert(
            "psych_1",
            P,
            "interest",
            "I find laboratory work and scientific testing fascinating",
            AGREEMENT,
        ),
        likert(
            "psych_2",
            P,
            "interest",
            "I am genuinely interested in understanding diseases and health conditions",
            AGREEMENT,
        ),
        likert(
            "psych_3",
            P,
            "interest",
            "Working with medical equipment and technology excites me",
            AGREEMENT,
        ),
        likert(
            "psych_4",
            P,
            "personality",
            "I pay close attention to small details and rarely miss important information",
            FREQUENCY,
        ),
        likert(
            "psych_5",
            P,
            "personality",
            "I prefer following established procedures rather than improvising",
            AGREEMENT,
        ),
        likert(
            "psych_6",
            P,
            "personality",
            "I remain calm and focused under pressure",
            FREQUENCY,
        ),
        weighted(
            choice(
                "psych_7",
                QuestionKind::ForcedChoicePair,
                P,
                "preferences",
                "When working, I prefer:",
                &[
                    "Individual work with minimal interruptions",
                    "Collaborative teamwork with frequent interaction",
                ],
            ),
            &[1.0, 0.6],
        ),
        weighted(
            choice(
                "psych_8",
                QuestionKind::MultiChoiceScenario,
                P,
                "preferences",
                "You notice a potential error in a lab result. What do you do?",
                &[
                    "Immediately double-check the result and report to supervisor",
                    "Note it down and mention it during the next team meeting",
                    "Assume it's correct since the equipment was calibrated",
                    "Ask a colleague to verify before taking action",
                ],
            ),
            &[1.0, 0.25, 0.0, 0.75],
        ),
    ]
}

pub fn technical_questions() -> Vec<Question> {
    vec![
        keyed(
            "logical",
            "tech_1",
            "If Test A shows positive and Test B shows negative for the same sample, what is the most likely explanation?",
            &[
                "Test A is more sensitive than Test B",
                "The sample is contaminated",
                "There was an error in one of the tests",
                "All of the above are possible",
            ],
            3,
        ),
        keyed(
            "logical",
            "tech_2",
            "In a series of measurements: 5.2, 5.1, 5.3, 15.2, 5.0. Which value appears to be an outlier?",
            &["5.2", "5.1", "15.2", "5.0"],
            2,
        ),
        keyed(
            "numerical",
            "tech_3",
            "A solution needs to be diluted 1:10. If you have 2mL of sample, how much diluent do you need?",
            &["2mL", "10mL", "18mL", "20mL"],
            2,
        ),
        keyed(
            "numerical",
            "tech_4",
            "If a normal range for glucose is 70-99 mg/dL, is a value of 105 mg/dL considered:",
            &["Normal", "Slightly elevated", "Critically high", "Critically low"],
            1,
        ),
        keyed(
            "science",
            "tech_5",
            "Which blood component is primarily responsible for clotting?",
            &["Red blood cells", "White blood cells", "Platelets", "Plasma"],
            2,
        ),
        keyed(
            "science",
            "tech_6",
            "What is the primary purpose of a control sample in laboratory testing?",
            &[
                "To practice testing procedures",
                "To verify test accuracy and reliability",
                "To save reagents",
                "To speed up the testing process",
            ],
            1,
        ),
    ]
}

pub fn wiscar_questions() -> Vec<Question> {
    use Instrument::Wiscar as W;

    let mut ranking = choice(
        "wiscar_3",
        QuestionKind::Ranking,
        W,
        "interest",
        "Rank these laboratory activities by your interest level (1 = most interested):",
        &[
            "Analyzing blood samples for disease markers",
            "Operating and maintaining lab equipment",
            "Recording and interpreting test results",
            "Following safety protocols and procedures",
        ],
    );
    ranking.reference_order = Some(ranking.choices.clone());

    vec![
        likert(
            "wiscar_1",
            W,
            "will",
            "I have overcome setbacks to conquer an important challenge",
            LIKE_ME,
        ),
        likert("wiscar_2", W, "will", "I finish whatever I begin", LIKE_ME),
        ranking,
        likert(
            "wiscar_4",
            W,
            "skill",
            "I am skilled at working with precision instruments",
            DEGREE,
        ),
        likert(
            "wiscar_5",
            W,
            "skill",
            "I can identify patterns and anomalies in data",
            DEGREE,
        ),
        weighted(
            choice(
                "wiscar_6",
                QuestionKind::MultiChoiceScenario,
                W,
                "cognitive",
                "A lab report shows unexpected results. Your approach would be to:",
                &[
                    "Repeat the test immediately to verify",
                    "Check calibration and controls first",
                    "Review the patient history for clues",
                    "Consult with senior technician",
                ],
            ),
            &[0.5, 1.0, 0.5, 0.75],
        ),
        likert(
            "wiscar_7",
            W,
            "ability",
            "When I receive feedback on my work, I actively use it to improve",
            FREQUENCY,
        ),
        likert(
            "wiscar_8",
            W,
            "real-world",
            "I would be comfortable with shift work, repetitive testing and strict documentation in a hospital lab",
            AGREEMENT,
        ),
    ]
}

/// The built-in catalog: psychometric, then technical, then WISCAR questions.
pub fn builtin_catalog() -> Catalog {
    let mut catalog = Catalog::from_parts(
        BUILTIN_CATALOG_ID,
        "Medical Laboratory Technician Readiness",
        BUILTIN_CATALOG_VERSION,
        psychometric_questions(),
        technical_questions(),
        wiscar_questions(),
    );
    catalog.description =
        "Psychometric fit, technical aptitude and WISCAR readiness for a career as an MLT"
            .to_string();
    catalog
}
