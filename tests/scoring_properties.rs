use std::collections::BTreeMap;

use carescore::scoring::{
    rank, recommend_weak_factors, score_by_category, Candidate, CandidateScore, Category,
    ScoreScale, ScoringError,
};
use proptest::prelude::*;

const FACTORS: [&str; 6] = ["schools", "employers", "density", "demand", "subsidy", "licensing"];

fn categories() -> Vec<Category> {
    vec![
        Category::new("proximity", &FACTORS[..3]),
        Category::new("tennessee", &FACTORS[3..]),
    ]
}

fn candidate(id: &str, ratings: &[u8]) -> Candidate {
    FACTORS
        .iter()
        .zip(ratings)
        .fold(Candidate::new(id), |c, (f, r)| c.with_rating(*f, *r))
}

fn weights(proximity: f64, tennessee: f64) -> BTreeMap<String, f64> {
    [
        ("proximity".to_string(), proximity),
        ("tennessee".to_string(), tennessee),
    ]
    .into()
}

fn single_score(ratings: &[u8], w: &BTreeMap<String, f64>, scale: ScoreScale) -> f64 {
    score_by_category(&[candidate("x", ratings)], &categories(), w, scale).unwrap()[0]
        .normalized_score
}

proptest! {
    #[test]
    fn raising_a_rating_never_lowers_the_score(
        ratings in prop::collection::vec(1u8..=9, 6),
        idx in 0usize..6,
        wp in 0.0f64..10.0,
        wt in 0.01f64..10.0,
    ) {
        let w = weights(wp, wt);
        let before = single_score(&ratings, &w, ScoreScale::Ten);
        let mut raised = ratings.clone();
        raised[idx] += 1;
        let after = single_score(&raised, &w, ScoreScale::Ten);
        prop_assert!(after >= before - 1e-12);
    }

    #[test]
    fn scoring_is_repeatable(
        ratings in prop::collection::vec(1u8..=10, 6),
        wp in 0.01f64..10.0,
        wt in 0.01f64..10.0,
    ) {
        let w = weights(wp, wt);
        let candidates = vec![candidate("a", &ratings), candidate("b", &ratings)];
        let first = score_by_category(&candidates, &categories(), &w, ScoreScale::Hundred).unwrap();
        let second = score_by_category(&candidates, &categories(), &w, ScoreScale::Hundred).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn uniform_ratings_collapse_to_the_rating(v in 1u8..=10, w in 0.01f64..100.0) {
        let score = single_score(&[v; 6], &weights(w, w), ScoreScale::Ten);
        prop_assert!((score - f64::from(v)).abs() < 1e-9);
    }

    #[test]
    fn scaling_all_weights_changes_nothing(
        ratings in prop::collection::vec(1u8..=10, 6),
        wp in 0.01f64..10.0,
        wt in 0.01f64..10.0,
        k in 0.01f64..100.0,
    ) {
        let base = single_score(&ratings, &weights(wp, wt), ScoreScale::Ten);
        let scaled = single_score(&ratings, &weights(wp * k, wt * k), ScoreScale::Ten);
        prop_assert!((base - scaled).abs() < 1e-9);
    }

    #[test]
    fn ties_rank_by_id(score in 0.0f64..100.0, ids in prop::collection::btree_set("[a-z]{1,6}", 2..6)) {
        let mut scores: Vec<CandidateScore> = ids
            .iter()
            .rev()
            .map(|id| CandidateScore {
                candidate_id: id.clone(),
                raw_score: score,
                normalized_score: score,
            })
            .collect();
        scores.rotate_left(1);

        let ranked = rank(scores).unwrap();
        let ranked_ids: Vec<_> = ranked.iter().map(|r| r.candidate_id.clone()).collect();
        let expected: Vec<_> = ids.iter().cloned().collect();
        prop_assert_eq!(ranked_ids, expected);
        for (i, r) in ranked.iter().enumerate() {
            prop_assert_eq!(r.rank, i + 1);
        }
    }

    #[test]
    fn weak_factors_are_below_threshold_sorted_and_bounded(
        ratings in prop::collection::vec(1u8..=10, 6),
        threshold in 1u8..=11,
        max in 0usize..8,
    ) {
        let weak = recommend_weak_factors(&candidate("x", &ratings), &categories(), threshold, max);
        prop_assert!(weak.len() <= max);
        prop_assert!(weak.iter().all(|w| w.value < threshold));
        prop_assert!(weak.windows(2).all(|pair| pair[0].value <= pair[1].value));
    }
}

#[test]
fn boundary_ratings() {
    let w = weights(1.0, 1.0);
    assert!(score_by_category(&[candidate("x", &[1; 6])], &categories(), &w, ScoreScale::Ten).is_ok());
    assert!(score_by_category(&[candidate("x", &[10; 6])], &categories(), &w, ScoreScale::Ten).is_ok());

    for bad in [0u8, 11] {
        let err = score_by_category(&[candidate("x", &[bad; 6])], &categories(), &w, ScoreScale::Ten)
            .unwrap_err();
        assert!(matches!(err, ScoringError::InvalidFactorRange { .. }));
    }
}

#[test]
fn duplicate_candidate_ids_rejected() {
    let candidates = vec![candidate("x", &[5; 6]), candidate("x", &[6; 6])];
    let err = score_by_category(&candidates, &categories(), &weights(1.0, 1.0), ScoreScale::Ten)
        .unwrap_err();
    assert_eq!(err, ScoringError::DuplicateCandidate("x".to_string()));
}
