use std::collections::BTreeMap;

use super::error::ScoringError;
use super::types::{check_candidates, Candidate, CandidateScore, RatingRange, ScoreScale};

/// Largest user weight a term can carry; a term's weight multiplier is `weight / MAX_WEIGHT`.
pub const MAX_WEIGHT: f64 = 10.0;

/// Upper bound of a term value.
pub const MAX_TERM: f64 = 10.0;

/// Slack within which a term value is snapped onto the [0, 10] bounds.
const TERM_EPSILON: f64 = 1e-9;

/// One independently normalized sub-score of a formula.
pub trait FormulaTerm {
    /// Label used in error messages.
    fn name(&self) -> &str;

    /// Key of the user weight that scales this term.
    fn weight_key(&self) -> &str;

    /// Term value for `candidate`, expected in [0, 10].
    fn value(&self, candidate: &Candidate) -> Result<f64, ScoringError>;
}

/// A term backed by a closure.
pub struct FnTerm<F> {
    name: String,
    weight_key: String,
    produce: F,
}

impl<F> FnTerm<F>
where
    F: Fn(&Candidate) -> f64,
{
    pub fn new(name: impl Into<String>, weight_key: impl Into<String>, produce: F) -> Self {
        Self {
            name: name.into(),
            weight_key: weight_key.into(),
            produce,
        }
    }
}

impl<F> FormulaTerm for FnTerm<F>
where
    F: Fn(&Candidate) -> f64,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn weight_key(&self) -> &str {
        &self.weight_key
    }

    fn value(&self, candidate: &Candidate) -> Result<f64, ScoringError> {
        Ok((self.produce)(candidate))
    }
}

/// Score candidates as a weighted sum of formula terms.
///
/// `raw = sum(term * weight / 10)` and
/// `normalized = round(raw / divisor * scale / 10)`.
/// With five terms a divisor of 5 maps a perfect candidate onto the top of
/// the scale, but the divisor is the caller's choice.
pub fn score_by_formula(
    candidates: &[Candidate],
    weights: &BTreeMap<String, f64>,
    terms: &[Box<dyn FormulaTerm>],
    divisor: f64,
    scale: ScoreScale,
) -> Result<Vec<CandidateScore>, ScoringError> {
    score_by_formula_within(&RatingRange::default(), candidates, weights, terms, divisor, scale)
}

pub fn score_by_formula_within(
    range: &RatingRange,
    candidates: &[Candidate],
    weights: &BTreeMap<String, f64>,
    terms: &[Box<dyn FormulaTerm>],
    divisor: f64,
    scale: ScoreScale,
) -> Result<Vec<CandidateScore>, ScoringError> {
    check_candidates(candidates, range)?;
    if !divisor.is_finite() || divisor <= 0.0 {
        return Err(ScoringError::InvalidDivisor(divisor));
    }
    let multipliers = resolve_multipliers(weights, terms)?;

    let mut scores = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let mut raw_score = 0.0;
        for (term, multiplier) in terms.iter().zip(&multipliers) {
            raw_score += checked_term(term.as_ref(), candidate)? * multiplier;
        }
        scores.push(CandidateScore {
            candidate_id: candidate.id.clone(),
            raw_score,
            normalized_score: (raw_score / divisor * scale.factor()).round(),
        });
    }
    Ok(scores)
}

fn resolve_multipliers(
    weights: &BTreeMap<String, f64>,
    terms: &[Box<dyn FormulaTerm>],
) -> Result<Vec<f64>, ScoringError> {
    terms
        .iter()
        .map(|term| {
            let key = term.weight_key();
            let weight = *weights
                .get(key)
                .ok_or_else(|| ScoringError::MissingWeight(key.to_string()))?;
            if !weight.is_finite() || !(0.0..=MAX_WEIGHT).contains(&weight) {
                return Err(ScoringError::weight(key, "must be between 0 and 10"));
            }
            Ok(weight / MAX_WEIGHT)
        })
        .collect()
}

/// Term value snapped onto [0, 10]; anything clearly outside is a term bug.
fn checked_term(term: &dyn FormulaTerm, candidate: &Candidate) -> Result<f64, ScoringError> {
    let value = term.value(candidate)?;
    if value.is_nan() || value < -TERM_EPSILON || value > MAX_TERM + TERM_EPSILON {
        return Err(ScoringError::TermRange {
            term: term.name().to_string(),
            candidate: candidate.id.clone(),
            value,
        });
    }
    Ok(value.clamp(0.0, MAX_TERM))
}
