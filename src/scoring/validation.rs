use std::collections::{BTreeMap, BTreeSet};

use super::config::{FormulaConfig, ScoringConfig, ScoringMode, TermSource};
use super::formula::MAX_WEIGHT;
use super::types::{Candidate, Category, DEFAULT_RATING};

/// Validate scoring configuration before anything is scored.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(
    config: &ScoringConfig,
    categories: &[Category],
    candidates: &[Candidate],
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let range = config.rating_range();
    if range.min > range.max {
        errors.push(format!(
            "scoring.rating_range: min {} is greater than max {}",
            range.min, range.max
        ));
    } else if !range.contains(DEFAULT_RATING) {
        errors.push(format!(
            "scoring.rating_range: {}-{} must include {}, the rating of unset factors",
            range.min, range.max, DEFAULT_RATING
        ));
    }

    if let Some(max_weak) = config.max_weak {
        if max_weak == 0 {
            errors.push("scoring.max_weak: must be at least 1".to_string());
        }
    }

    validate_categories(categories, &mut errors);
    validate_rating_keys(candidates, categories, &mut errors);

    match config.effective_mode(categories) {
        ScoringMode::Category { weights } => {
            validate_category_weights(&weights, categories, &mut errors)
        }
        ScoringMode::Formula(formula) => validate_formula(&formula, categories, &mut errors),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_categories(categories: &[Category], errors: &mut Vec<String>) {
    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for (i, category) in categories.iter().enumerate() {
        if category.factors.is_empty() {
            errors.push(format!(
                "categories[{}] '{}': must list at least one factor",
                i, category.name
            ));
        }
        for factor in &category.factors {
            if let Some(first) = seen.insert(factor.as_str(), category.name.as_str()) {
                errors.push(format!(
                    "categories[{}] '{}': factor '{}' already belongs to '{}'",
                    i, category.name, factor, first
                ));
            }
        }
    }
}

fn validate_rating_keys(
    candidates: &[Candidate],
    categories: &[Category],
    errors: &mut Vec<String>,
) {
    let declared: BTreeSet<&str> = categories
        .iter()
        .flat_map(|c| c.factors.iter().map(String::as_str))
        .collect();
    for (i, candidate) in candidates.iter().enumerate() {
        for factor in candidate.ratings.keys() {
            if !declared.contains(factor.as_str()) {
                errors.push(format!(
                    "candidates[{}] '{}'.ratings.{}: factor is not in any category",
                    i, candidate.id, factor
                ));
            }
        }
    }
}

fn validate_category_weights(
    weights: &BTreeMap<String, f64>,
    categories: &[Category],
    errors: &mut Vec<String>,
) {
    let prefix = "scoring.mode.category.weights";

    for key in weights.keys() {
        if !categories.iter().any(|c| &c.name == key) {
            errors.push(format!("{}.{}: no such category", prefix, key));
        }
    }

    let mut total = 0.0;
    for category in categories {
        match weights.get(&category.name) {
            None => errors.push(format!("{}.{}: missing weight", prefix, category.name)),
            Some(w) if !w.is_finite() || *w < 0.0 => errors.push(format!(
                "{}.{}: must be non-negative, got {}",
                prefix, category.name, w
            )),
            Some(w) => total += w,
        }
    }

    if !total.is_finite() {
        errors.push(format!("{}: weights overflow when summed", prefix));
    } else if !categories.is_empty() && total <= 0.0 {
        errors.push(format!("{}: at least one weight must be positive", prefix));
    }
}

fn validate_formula(formula: &FormulaConfig, categories: &[Category], errors: &mut Vec<String>) {
    let prefix = "scoring.mode.formula";

    if !formula.divisor.is_finite() || formula.divisor <= 0.0 {
        errors.push(format!(
            "{}.divisor: must be positive, got {}",
            prefix, formula.divisor
        ));
    }

    for (key, weight) in &formula.weights {
        if !weight.is_finite() || !(0.0..=MAX_WEIGHT).contains(weight) {
            errors.push(format!(
                "{}.weights.{}: must be between 0 and 10, got {}",
                prefix, key, weight
            ));
        }
    }

    if formula.terms.is_empty() {
        errors.push(format!("{}.terms: at least one term is required", prefix));
    }

    let factors: BTreeSet<&str> = categories
        .iter()
        .flat_map(|c| c.factors.iter().map(String::as_str))
        .collect();

    for (i, term) in formula.terms.iter().enumerate() {
        if !formula.weights.contains_key(&term.weight) {
            errors.push(format!(
                "{}.terms[{}].weight: no weight named '{}'",
                prefix, i, term.weight
            ));
        }
        match &term.source {
            TermSource::Rating { factor } | TermSource::InverseRating { factor } => {
                if !factors.contains(factor.as_str()) {
                    errors.push(format!(
                        "{}.terms[{}].source: factor '{}' is not in any category",
                        prefix, i, factor
                    ));
                }
            }
            TermSource::InverseAttribute { max, .. } => {
                if !max.is_finite() || *max <= 0.0 {
                    errors.push(format!(
                        "{}.terms[{}].source.max: must be positive, got {}",
                        prefix, i, max
                    ));
                }
            }
            TermSource::Attribute { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{RatingRange, TermSpec};

    fn categories() -> Vec<Category> {
        vec![
            Category::new("proximity", &["schools", "employers"]),
            Category::new("tennessee", &["licensing"]),
        ]
    }

    fn category_mode(pairs: &[(&str, f64)]) -> ScoringConfig {
        ScoringConfig {
            mode: Some(ScoringMode::Category {
                weights: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            }),
            ..ScoringConfig::default()
        }
    }

    fn formula_mode(divisor: f64, weights: &[(&str, f64)], terms: Vec<TermSpec>) -> ScoringConfig {
        ScoringConfig {
            mode: Some(ScoringMode::Formula(FormulaConfig {
                divisor,
                weights: weights.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                terms,
            })),
            ..ScoringConfig::default()
        }
    }

    fn rating_term(weight: &str, factor: &str) -> TermSpec {
        TermSpec {
            name: None,
            weight: weight.to_string(),
            source: TermSource::Rating {
                factor: factor.to_string(),
            },
        }
    }

    #[test]
    fn test_valid_category_config() {
        let config = category_mode(&[("proximity", 0.6), ("tennessee", 0.4)]);
        assert!(validate_scoring(&config, &categories(), &[]).is_ok());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default(), &categories(), &[]).is_ok());
    }

    #[test]
    fn test_negative_weight() {
        let config = category_mode(&[("proximity", -1.0), ("tennessee", 1.0)]);
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("scoring.mode.category.weights.proximity"));
    }

    #[test]
    fn test_zero_weights() {
        let config = category_mode(&[("proximity", 0.0), ("tennessee", 0.0)]);
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        assert!(errors[0].contains("at least one weight must be positive"));
    }

    #[test]
    fn test_missing_and_unknown_weights() {
        let config = category_mode(&[("proximity", 1.0), ("staffing", 1.0)]);
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.contains("staffing: no such category")));
        assert!(errors.iter().any(|e| e.contains("tennessee: missing weight")));
    }

    #[test]
    fn test_bad_categories() {
        let categories = vec![
            Category::new("proximity", &["schools"]),
            Category::new("empty", &[]),
            Category::new("again", &["schools"]),
        ];
        let errors = validate_scoring(&ScoringConfig::default(), &categories, &[]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("categories[1] 'empty'"));
        assert!(errors[1].contains("already belongs to 'proximity'"));
    }

    #[test]
    fn test_valid_formula_config() {
        let config = formula_mode(5.0, &[("quality", 8.0)], vec![rating_term("quality", "schools")]);
        assert!(validate_scoring(&config, &categories(), &[]).is_ok());
    }

    #[test]
    fn test_formula_collects_all_errors() {
        let mut terms = vec![rating_term("quality", "parking"), rating_term("cost", "schools")];
        terms.push(TermSpec {
            name: None,
            weight: "quality".to_string(),
            source: TermSource::InverseAttribute {
                attribute: "cost".to_string(),
                max: 0.0,
            },
        });
        let config = formula_mode(0.0, &[("quality", 12.0)], terms);
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        // divisor, weight range, unknown factor, unknown weight key, max
        assert_eq!(errors.len(), 5);
        assert!(errors[0].contains("scoring.mode.formula.divisor"));
        assert!(errors[1].contains("scoring.mode.formula.weights.quality"));
        assert!(errors[2].contains("terms[0].source"));
        assert!(errors[3].contains("terms[1].weight"));
        assert!(errors[4].contains("terms[2].source.max"));
    }

    #[test]
    fn test_empty_terms() {
        let config = formula_mode(5.0, &[], vec![]);
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        assert!(errors[0].contains("at least one term"));
    }

    #[test]
    fn test_inverted_rating_range() {
        let config = ScoringConfig {
            rating_range: Some(RatingRange { min: 10, max: 1 }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        assert!(errors[0].contains("scoring.rating_range"));
    }

    #[test]
    fn test_range_excluding_default_rating() {
        let config = ScoringConfig {
            rating_range: Some(RatingRange { min: 6, max: 10 }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("must include 5"));
    }

    #[test]
    fn test_undeclared_rating_keys() {
        let candidates = vec![
            Candidate::new("midtown").with_rating("schools", 8),
            Candidate::new("rural")
                .with_rating("shcools", 3)
                .with_rating("parking", 9),
        ];
        let errors =
            validate_scoring(&ScoringConfig::default(), &categories(), &candidates).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("candidates[1] 'rural'.ratings.parking"));
        assert!(errors[1].contains("candidates[1] 'rural'.ratings.shcools"));
    }

    #[test]
    fn test_overflowing_weight_sum() {
        let config = category_mode(&[("proximity", 1e308), ("tennessee", 1e308)]);
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("overflow"));
    }

    #[test]
    fn test_zero_max_weak() {
        let config = ScoringConfig {
            max_weak: Some(0),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config, &categories(), &[]).unwrap_err();
        assert!(errors[0].contains("scoring.max_weak"));
    }
}
