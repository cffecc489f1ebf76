use std::collections::BTreeMap;

use super::error::ScoringError;
use super::types::{
    check_candidates, check_categories, check_declared_factors, Candidate, CandidateScore,
    Category, RatingRange, ScoreScale,
};

/// Score candidates by weighted average of per-category means.
///
/// Each category contributes the plain mean of the candidate's ratings for its
/// factors; category means are then averaged with `weights`. Weights need not
/// sum to 1, only their ratios matter. The result sits on the 0-10 rating
/// scale and is stretched linearly onto `scale`.
///
/// Ratings are checked against the default 1-10 range; see
/// [`score_by_category_within`] for a custom one.
pub fn score_by_category(
    candidates: &[Candidate],
    categories: &[Category],
    weights: &BTreeMap<String, f64>,
    scale: ScoreScale,
) -> Result<Vec<CandidateScore>, ScoringError> {
    score_by_category_within(&RatingRange::default(), candidates, categories, weights, scale)
}

pub fn score_by_category_within(
    range: &RatingRange,
    candidates: &[Candidate],
    categories: &[Category],
    weights: &BTreeMap<String, f64>,
    scale: ScoreScale,
) -> Result<Vec<CandidateScore>, ScoringError> {
    check_candidates(candidates, range)?;
    check_categories(categories)?;
    check_declared_factors(candidates, categories)?;
    let resolved = resolve_weights(categories, weights)?;
    let total_weight: f64 = resolved.iter().sum();

    Ok(candidates
        .iter()
        .map(|candidate| {
            let raw_score: f64 = categories
                .iter()
                .zip(&resolved)
                .map(|(category, weight)| category_mean(candidate, category) * weight)
                .sum();
            CandidateScore {
                candidate_id: candidate.id.clone(),
                raw_score,
                normalized_score: raw_score / total_weight * scale.factor(),
            }
        })
        .collect())
}

/// Unweighted mean of the candidate's ratings over one category.
pub fn category_mean(candidate: &Candidate, category: &Category) -> f64 {
    let sum: f64 = category
        .factors
        .iter()
        .map(|factor| f64::from(candidate.rating(factor)))
        .sum();
    sum / category.factors.len() as f64
}

/// Weights in category order, rejecting unknown, missing, negative and all-zero weights.
fn resolve_weights(
    categories: &[Category],
    weights: &BTreeMap<String, f64>,
) -> Result<Vec<f64>, ScoringError> {
    if let Some(unknown) = weights
        .keys()
        .find(|key| !categories.iter().any(|c| &c.name == *key))
    {
        return Err(ScoringError::UnknownCategory(unknown.clone()));
    }

    let mut resolved = Vec::with_capacity(categories.len());
    for category in categories {
        let weight = *weights
            .get(&category.name)
            .ok_or_else(|| ScoringError::MissingWeight(category.name.clone()))?;
        if !weight.is_finite() {
            return Err(ScoringError::weight(&category.name, "must be a finite number"));
        }
        if weight < 0.0 {
            return Err(ScoringError::weight(&category.name, "must be non-negative"));
        }
        resolved.push(weight);
    }

    let total: f64 = resolved.iter().sum();
    if !total.is_finite() {
        return Err(ScoringError::weight("*", "category weights overflow when summed"));
    }
    if total <= 0.0 {
        return Err(ScoringError::weight("*", "category weights sum to zero"));
    }
    Ok(resolved)
}
