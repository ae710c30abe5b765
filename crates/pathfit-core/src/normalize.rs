//! Response normalization.
//!
//! Validates a raw [`ResponseValue`] against its question's kind and maps
//! it onto a common `[0,1]` contribution.

use crate::error::Diagnostic;
use crate::model::{Answer, Question, QuestionKind, ResponseValue};

/// What a single response adds to its facet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contribution {
    /// A directional score in `[0,1]`.
    Scored(f64),
    /// Answered, but the catalog defines no key to score it against.
    CoverageOnly,
    /// No value submitted.
    Skipped,
}

/// Resolve a raw value into a typed [`Answer`] for `question`.
///
/// Returns `Ok(None)` for an absent value.
pub fn resolve(question: &Question, value: &ResponseValue) -> Result<Option<Answer>, Diagnostic> {
    if matches!(value, ResponseValue::Absent) {
        return Ok(None);
    }

    let malformed = || Diagnostic::malformed(&question.id, question.expected_shape(), value.shape());

    match question.kind {
        QuestionKind::ScaleRating => {
            let v = match value {
                ResponseValue::Integer(v) => *v,
                ResponseValue::Decimal(d) if d.is_finite() && d.fract() == 0.0 => *d as i64,
                _ => return Err(malformed()),
            };
            match &question.scale {
                Some(scale) if !scale.contains(v) => Err(malformed()),
                _ => Ok(Some(Answer::Scale(v))),
            }
        }
        QuestionKind::SingleChoice
        | QuestionKind::MultiChoiceScenario
        | QuestionKind::ForcedChoicePair => match value {
            ResponseValue::Text(choice) => question
                .choice_index(choice)
                .map(|i| Some(Answer::Choice(i)))
                .ok_or_else(malformed),
            _ => Err(malformed()),
        },
        QuestionKind::Ranking => match value {
            ResponseValue::List(items) => ranking_indices(question, items)
                .map(|order| Some(Answer::Ranking(order)))
                .ok_or_else(malformed),
            _ => Err(malformed()),
        },
    }
}

/// Normalize a raw value into its facet contribution.
pub fn normalize(question: &Question, value: &ResponseValue) -> Result<Contribution, Diagnostic> {
    let Some(answer) = resolve(question, value)? else {
        return Ok(Contribution::Skipped);
    };

    let contribution = match answer {
        Answer::Scale(v) => match &question.scale {
            Some(scale) if scale.max > scale.min => {
                let (min, max) = (scale.min as f64, scale.max as f64);
                Contribution::Scored(((v as f64 - min) / (max - min)).clamp(0.0, 1.0))
            }
            Some(_) => Contribution::Scored(1.0),
            None => Contribution::CoverageOnly,
        },
        Answer::Choice(index) => {
            if let Some(correct) = &question.correct_choice {
                let hit = question.choices.get(index) == Some(correct);
                Contribution::Scored(if hit { 1.0 } else { 0.0 })
            } else {
                question
                    .choice_weights
                    .as_ref()
                    .and_then(|w| w.get(index))
                    .filter(|w| w.is_finite())
                    .map(|w| Contribution::Scored(w.clamp(0.0, 1.0)))
                    .unwrap_or(Contribution::CoverageOnly)
            }
        }
        Answer::Ranking(order) => question
            .reference_order
            .as_ref()
            .and_then(|reference| ranking_indices(question, reference))
            .map(|reference| Contribution::Scored(rank_agreement(&order, &reference)))
            .unwrap_or(Contribution::CoverageOnly),
    };

    Ok(contribution)
}

/// Map a ranking onto choice indices; `None` unless it is a permutation of the choices.
fn ranking_indices(question: &Question, items: &[String]) -> Option<Vec<usize>> {
    if items.len() != question.choices.len() {
        return None;
    }
    let mut seen = vec![false; question.choices.len()];
    let mut order = Vec::with_capacity(items.len());
    for item in items {
        let i = question.choice_index(item)?;
        if std::mem::replace(&mut seen[i], true) {
            return None;
        }
        order.push(i);
    }
    Some(order)
}

/// Spearman rank correlation between two orderings of the same items, mapped to `[0,1]`.
///
/// Both slices list choice indices from first to last place.
pub fn rank_agreement(submitted: &[usize], reference: &[usize]) -> f64 {
    let n = submitted.len();
    if n < 2 {
        return 1.0;
    }

    let mut reference_rank = vec![0usize; n];
    for (rank, &item) in reference.iter().enumerate() {
        if let Some(slot) = reference_rank.get_mut(item) {
            *slot = rank;
        }
    }

    let d_squared: f64 = submitted
        .iter()
        .enumerate()
        .map(|(rank, &item)| {
            let d = rank as f64 - reference_rank.get(item).copied().unwrap_or(rank) as f64;
            d * d
        })
        .sum();

    let n = n as f64;
    let rho = 1.0 - (6.0 * d_squared) / (n * (n * n - 1.0));
    ((rho + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Instrument, ScaleBounds};

    fn question(kind: QuestionKind, choices: &[&str]) -> Question {
        Question {
            id: "q".into(),
            kind,
            instrument: Instrument::Psychometric,
            facet: "f".into(),
            prompt: "prompt".into(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            scale: None,
            correct_choice: None,
            choice_weights: None,
            reference_order: None,
        }
    }

    fn likert() -> Question {
        let mut q = question(QuestionKind::ScaleRating, &[]);
        q.scale = Some(ScaleBounds {
            min: 1,
            max: 5,
            labels: vec![],
        });
        q
    }

    #[test]
    fn scale_rating_is_min_max_normalized() {
        let q = likert();
        assert_eq!(normalize(&q, &5.into()).unwrap(), Contribution::Scored(1.0));
        assert_eq!(normalize(&q, &1.into()).unwrap(), Contribution::Scored(0.0));
        assert_eq!(normalize(&q, &4.into()).unwrap(), Contribution::Scored(0.75));
        assert_eq!(
            normalize(&q, &ResponseValue::Decimal(3.0)).unwrap(),
            Contribution::Scored(0.5)
        );
    }

    #[test]
    fn scale_rating_rejects_wrong_shapes() {
        let q = likert();
        for bad in [
            ResponseValue::from("Agree"),
            ResponseValue::Integer(6),
            ResponseValue::Integer(0),
            ResponseValue::Decimal(3.5),
            ResponseValue::from(vec!["a"]),
            ResponseValue::Other(serde_json::Value::Bool(true)),
        ] {
            let err = normalize(&q, &bad).unwrap_err();
            assert_eq!(err.question_id(), "q");
        }
    }

    #[test]
    fn absent_value_is_skipped() {
        assert_eq!(
            normalize(&likert(), &ResponseValue::Absent).unwrap(),
            Contribution::Skipped
        );
    }

    #[test]
    fn degenerate_scale_scores_full() {
        let mut q = likert();
        q.scale = Some(ScaleBounds {
            min: 3,
            max: 3,
            labels: vec!["Only".into()],
        });
        assert_eq!(normalize(&q, &3.into()).unwrap(), Contribution::Scored(1.0));
    }

    #[test]
    fn correct_choice_is_binary() {
        let mut q = question(QuestionKind::SingleChoice, &["2mL", "10mL", "18mL"]);
        q.instrument = Instrument::Technical;
        q.correct_choice = Some("18mL".into());
        assert_eq!(normalize(&q, &"18mL".into()).unwrap(), Contribution::Scored(1.0));
        assert_eq!(normalize(&q, &"2mL".into()).unwrap(), Contribution::Scored(0.0));
        assert!(normalize(&q, &"20mL".into()).is_err());
        assert!(normalize(&q, &2.into()).is_err());
    }

    #[test]
    fn weighted_choice_uses_table() {
        let mut q = question(QuestionKind::ForcedChoicePair, &["alone", "team"]);
        q.choice_weights = Some(vec![1.0, 0.6]);
        assert_eq!(normalize(&q, &"team".into()).unwrap(), Contribution::Scored(0.6));
    }

    #[test]
    fn non_finite_weight_counts_for_coverage() {
        let mut q = question(QuestionKind::MultiChoiceScenario, &["a", "b", "c"]);
        q.choice_weights = Some(vec![f64::NAN, 1.0, f64::INFINITY]);
        assert_eq!(normalize(&q, &"a".into()).unwrap(), Contribution::CoverageOnly);
        assert_eq!(normalize(&q, &"c".into()).unwrap(), Contribution::CoverageOnly);
        assert_eq!(normalize(&q, &"b".into()).unwrap(), Contribution::Scored(1.0));
    }

    #[test]
    fn unsupported_value_is_malformed_for_every_kind() {
        let value = ResponseValue::Other(serde_json::json!({"choice": "a"}));
        for kind in [
            QuestionKind::SingleChoice,
            QuestionKind::MultiChoiceScenario,
            QuestionKind::ForcedChoicePair,
            QuestionKind::Ranking,
        ] {
            let err = normalize(&question(kind, &["a", "b"]), &value).unwrap_err();
            assert!(err.to_string().contains("unsupported value"), "{kind}: {err}");
        }
    }

    #[test]
    fn extreme_scale_bounds_do_not_overflow() {
        let mut q = likert();
        q.scale = Some(ScaleBounds {
            min: i64::MIN,
            max: i64::MAX,
            labels: vec![],
        });
        assert_eq!(normalize(&q, &i64::MIN.into()).unwrap(), Contribution::Scored(0.0));
        assert_eq!(normalize(&q, &i64::MAX.into()).unwrap(), Contribution::Scored(1.0));
        let Contribution::Scored(mid) = normalize(&q, &0i64.into()).unwrap() else {
            panic!("expected a scored contribution");
        };
        assert!((mid - 0.5).abs() < 1e-9, "got {mid}");
    }

    #[test]
    fn unkeyed_choice_counts_for_coverage() {
        let q = question(QuestionKind::MultiChoiceScenario, &["a", "b"]);
        assert_eq!(normalize(&q, &"b".into()).unwrap(), Contribution::CoverageOnly);
    }

    #[test]
    fn ranking_against_reference_order() {
        let mut q = question(QuestionKind::Ranking, &["a", "b", "c", "d"]);
        q.reference_order = Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]);

        let same = normalize(&q, &vec!["a", "b", "c", "d"].into()).unwrap();
        assert_eq!(same, Contribution::Scored(1.0));

        let reversed = normalize(&q, &vec!["d", "c", "b", "a"].into()).unwrap();
        assert_eq!(reversed, Contribution::Scored(0.0));

        let Contribution::Scored(partial) = normalize(&q, &vec!["b", "a", "c", "d"].into()).unwrap()
        else {
            panic!("expected a scored contribution");
        };
        assert!(partial > 0.5 && partial < 1.0, "got {partial}");
    }

    #[test]
    fn ranking_without_reference_counts_for_coverage() {
        let q = question(QuestionKind::Ranking, &["a", "b"]);
        assert_eq!(
            normalize(&q, &vec!["b", "a"].into()).unwrap(),
            Contribution::CoverageOnly
        );
    }

    #[test]
    fn ranking_must_be_a_permutation() {
        let q = question(QuestionKind::Ranking, &["a", "b", "c"]);
        assert!(normalize(&q, &vec!["a", "a", "b"].into()).is_err());
        assert!(normalize(&q, &vec!["a", "b"].into()).is_err());
        assert!(normalize(&q, &vec!["a", "b", "z"].into()).is_err());
        assert!(normalize(&q, &"a".into()).is_err());
    }

    #[test]
    fn rank_agreement_single_item() {
        assert_eq!(rank_agreement(&[0], &[0]), 1.0);
    }
}
