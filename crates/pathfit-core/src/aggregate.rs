//! Per-instrument aggregation.
//!
//! Folds normalized contributions into facet percentages and one overall
//! percentage per instrument. Facets weigh equally regardless of how many
//! questions they hold.

use std::collections::HashMap;

use crate::model::{Catalog, FacetScore, Instrument, InstrumentScore};
use crate::normalize::Contribution;

#[derive(Debug, Default)]
struct FacetTally {
    sum: f64,
    answered: usize,
    scored: usize,
}

/// Aggregate one instrument's contributions.
///
/// `contributions` maps question id to its normalized contribution; ids
/// outside `instrument` are ignored. A facet with nothing scored reports 0
/// and is left out of `overall`.
pub fn score_instrument(
    catalog: &Catalog,
    instrument: Instrument,
    contributions: &HashMap<&str, Contribution>,
) -> InstrumentScore {
    let mut tallies: HashMap<&str, FacetTally> = HashMap::new();
    let mut total = 0usize;

    for q in catalog.questions_for(instrument) {
        total += 1;
        let tally = tallies.entry(q.facet.as_str()).or_default();
        match contributions.get(q.id.as_str()) {
            Some(Contribution::Scored(v)) if v.is_finite() => {
                tally.sum += v.clamp(0.0, 1.0);
                tally.answered += 1;
                tally.scored += 1;
            }
            Some(Contribution::Scored(_)) | Some(Contribution::CoverageOnly) => {
                tally.answered += 1
            }
            Some(Contribution::Skipped) | None => {}
        }
    }

    let facets: Vec<FacetScore> = catalog
        .facets(instrument)
        .into_iter()
        .map(|facet| {
            let tally = tallies.remove(facet).unwrap_or_default();
            let percent = if tally.scored == 0 {
                0.0
            } else {
                to_percent(tally.sum / tally.scored as f64)
            };
            FacetScore {
                facet: facet.to_string(),
                percent,
                answered: tally.answered,
                scored: tally.scored,
            }
        })
        .collect();

    let scored: Vec<f64> = facets
        .iter()
        .filter(|f| f.scored > 0)
        .map(|f| f.percent)
        .collect();
    let overall = mean(&scored);

    InstrumentScore {
        instrument,
        answered: facets.iter().map(|f| f.answered).sum(),
        facets,
        overall,
        total,
    }
}

/// Arithmetic mean of the finite values, 0 when there are none, clamped
/// to `[0,100]`.
pub fn mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return 0.0;
    }
    (finite.iter().sum::<f64>() / finite.len() as f64).clamp(0.0, 100.0)
}

fn to_percent(fraction: f64) -> f64 {
    (fraction * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Question, QuestionKind, ScaleBounds};

    fn q(id: &str, instrument: Instrument, facet: &str) -> Question {
        Question {
            id: id.into(),
            kind: QuestionKind::ScaleRating,
            instrument,
            facet: facet.into(),
            prompt: "p".into(),
            choices: vec![],
            scale: Some(ScaleBounds {
                min: 1,
                max: 5,
                labels: vec![],
            }),
            correct_choice: None,
            choice_weights: None,
            reference_order: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::from_parts(
            "t",
            "T",
            "1",
            vec![
                q("p1", Instrument::Psychometric, "interest"),
                q("p2", Instrument::Psychometric, "interest"),
                q("p3", Instrument::Psychometric, "interest"),
                q("p4", Instrument::Psychometric, "personality"),
            ],
            vec![],
            vec![q("w1", Instrument::Wiscar, "will")],
        )
    }

    #[test]
    fn facets_weigh_equally_in_overall() {
        let catalog = catalog();
        let contributions = HashMap::from([
            ("p1", Contribution::Scored(1.0)),
            ("p2", Contribution::Scored(1.0)),
            ("p3", Contribution::Scored(1.0)),
            ("p4", Contribution::Scored(0.0)),
        ]);
        let score = score_instrument(&catalog, Instrument::Psychometric, &contributions);
        assert_eq!(score.percent("interest"), 100.0);
        assert_eq!(score.percent("personality"), 0.0);
        assert_eq!(score.overall, 50.0);
        assert_eq!(score.answered, 4);
        assert_eq!(score.total, 4);
    }

    #[test]
    fn empty_instrument_scores_zero() {
        let catalog = catalog();
        let score = score_instrument(&catalog, Instrument::Technical, &HashMap::new());
        assert_eq!(score.overall, 0.0);
        assert!(score.facets.is_empty());

        let score = score_instrument(&catalog, Instrument::Psychometric, &HashMap::new());
        assert_eq!(score.overall, 0.0);
        assert!(score.facets.iter().all(|f| f.percent == 0.0));
        assert!(!score.overall.is_nan());
    }

    #[test]
    fn unscored_facet_is_left_out_of_overall() {
        let catalog = catalog();
        let contributions = HashMap::from([
            ("p1", Contribution::Scored(0.8)),
            ("p4", Contribution::CoverageOnly),
        ]);
        let score = score_instrument(&catalog, Instrument::Psychometric, &contributions);
        let personality = score.facet("personality").unwrap();
        assert_eq!(personality.answered, 1);
        assert_eq!(personality.scored, 0);
        assert_eq!(personality.percent, 0.0);
        assert!((score.overall - 80.0).abs() < 1e-9);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[40.0, 60.0]), 50.0);
        assert_eq!(mean(&[f64::NAN, 60.0]), 60.0);
        assert_eq!(mean(&[f64::NAN]), 0.0);
    }

    #[test]
    fn non_finite_contribution_counts_for_coverage() {
        let catalog = catalog();
        let contributions = HashMap::from([
            ("p1", Contribution::Scored(f64::NAN)),
            ("p2", Contribution::Scored(1.0)),
            ("p4", Contribution::Scored(f64::INFINITY)),
        ]);
        let score = score_instrument(&catalog, Instrument::Psychometric, &contributions);
        let interest = score.facet("interest").unwrap();
        assert_eq!(interest.answered, 2);
        assert_eq!(interest.scored, 1);
        assert_eq!(interest.percent, 100.0);
        assert_eq!(score.facet("personality").unwrap().scored, 0);
        assert_eq!(score.overall, 100.0);
    }
}
