use std::collections::BTreeMap;

use super::category::score_by_category_within;
use super::config::{ScoringConfig, ScoringMode};
use super::error::ScoringError;
use super::formula::{score_by_formula_within, FormulaTerm};
use super::rank::rank;
use super::recommend::{recommend_weak_factors, DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD};
use super::types::{
    check_categories, check_declared_factors, Candidate, Category, RatingRange, ScoreResult,
    ScoreScale,
};

/// Which scoring operation `evaluate` runs.
pub enum Method<'a> {
    Category {
        weights: &'a BTreeMap<String, f64>,
    },
    Formula {
        weights: &'a BTreeMap<String, f64>,
        terms: &'a [Box<dyn FormulaTerm>],
        divisor: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationOptions {
    pub scale: ScoreScale,
    pub range: RatingRange,
    pub threshold: u8,
    pub max_weak: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            scale: ScoreScale::default(),
            range: RatingRange::default(),
            threshold: DEFAULT_THRESHOLD,
            max_weak: DEFAULT_MAX_RESULTS,
        }
    }
}

impl From<&ScoringConfig> for EvaluationOptions {
    fn from(config: &ScoringConfig) -> Self {
        Self {
            scale: config.scale(),
            range: config.rating_range(),
            threshold: config.threshold(),
            max_weak: config.max_weak(),
        }
    }
}

/// Score, rank and attach weak factors in one pass.
///
/// Results come back best-first. Any invalid input fails the whole call.
pub fn evaluate(
    candidates: &[Candidate],
    categories: &[Category],
    method: &Method<'_>,
    options: &EvaluationOptions,
) -> Result<Vec<ScoreResult>, ScoringError> {
    check_categories(categories)?;
    check_declared_factors(candidates, categories)?;

    let scores = match method {
        Method::Category { weights } => score_by_category_within(
            &options.range,
            candidates,
            categories,
            weights,
            options.scale,
        )?,
        Method::Formula {
            weights,
            terms,
            divisor,
        } => score_by_formula_within(
            &options.range,
            candidates,
            weights,
            terms,
            *divisor,
            options.scale,
        )?,
    };

    let mut results = rank(scores)?;
    for result in &mut results {
        if let Some(candidate) = candidates.iter().find(|c| c.id == result.candidate_id) {
            result.weak_factors =
                recommend_weak_factors(candidate, categories, options.threshold, options.max_weak);
        }
    }

    tracing::debug!(
        candidates = results.len(),
        top = ?results.first().map(|r| r.candidate_id.as_str()),
        "evaluation complete"
    );
    Ok(results)
}

/// `evaluate` driven by a parsed scoring configuration.
pub fn evaluate_config(
    config: &ScoringConfig,
    candidates: &[Candidate],
    categories: &[Category],
) -> Result<Vec<ScoreResult>, ScoringError> {
    let options = EvaluationOptions::from(config);
    match config.effective_mode(categories) {
        ScoringMode::Category { weights } => {
            evaluate(candidates, categories, &Method::Category { weights: &weights }, &options)
        }
        ScoringMode::Formula(formula) => {
            let terms = formula.build_terms(options.range);
            let method = Method::Formula {
                weights: &formula.weights,
                terms: &terms,
                divisor: formula.divisor,
            };
            evaluate(candidates, categories, &method, &options)
        }
    }
}
