use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::ScoringError;
use super::formula::FormulaTerm;
use super::recommend::{DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD};
use super::types::{Candidate, Category, RatingRange, ScoreScale};

/// Scoring settings of one evaluation.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   scale: 100
///   threshold: 5
///   mode:
///     category:
///       weights: { proximity: 0.5, tennessee: 0.5 }
/// ```
///
/// Every field is optional. Without a `mode`, categories are weighted equally.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Output scale, 10 or 100 (default: 10)
    #[serde(default)]
    pub scale: Option<ScoreScale>,

    /// Ratings strictly below this are reported as weak (default: 5)
    #[serde(default)]
    pub threshold: Option<u8>,

    /// Maximum weak factors reported per candidate (default: 5)
    #[serde(default)]
    pub max_weak: Option<usize>,

    /// Valid rating range (default: 1-10)
    #[serde(default)]
    pub rating_range: Option<RatingRange>,

    #[serde(default)]
    pub mode: Option<ScoringMode>,
}

impl ScoringConfig {
    pub fn scale(&self) -> ScoreScale {
        self.scale.unwrap_or_default()
    }

    pub fn threshold(&self) -> u8 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    pub fn max_weak(&self) -> usize {
        self.max_weak.unwrap_or(DEFAULT_MAX_RESULTS)
    }

    pub fn rating_range(&self) -> RatingRange {
        self.rating_range.unwrap_or_default()
    }

    /// Configured mode, or equal weights across `categories` when none is set.
    pub fn effective_mode(&self, categories: &[Category]) -> ScoringMode {
        match &self.mode {
            Some(mode) => mode.clone(),
            None => ScoringMode::Category {
                weights: categories.iter().map(|c| (c.name.clone(), 1.0)).collect(),
            },
        }
    }
}

/// How candidates are scored.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Weighted average of category means. Weights are relative.
    Category { weights: BTreeMap<String, f64> },

    /// Weighted sum of explicit terms, divided by `divisor`.
    Formula(FormulaConfig),
}

/// Formula mode settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormulaConfig {
    /// Raw sums are divided by this before scaling (5 for five 0-10 terms)
    pub divisor: f64,

    /// User importance per term, 0-10
    pub weights: BTreeMap<String, f64>,

    pub terms: Vec<TermSpec>,
}

impl FormulaConfig {
    /// Terms ready for `score_by_formula`.
    pub fn build_terms(&self, range: RatingRange) -> Vec<Box<dyn FormulaTerm>> {
        self.terms
            .iter()
            .map(|spec| {
                Box::new(ConfiguredTerm {
                    spec: spec.clone(),
                    range,
                }) as Box<dyn FormulaTerm>
            })
            .collect()
    }
}

/// One formula term: where its value comes from and which weight scales it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TermSpec {
    /// Display name (default: the weight key)
    #[serde(default)]
    pub name: Option<String>,

    /// Key into `weights`
    pub weight: String,

    pub source: TermSource,
}

/// Value producers available from configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TermSource {
    /// The factor rating itself
    Rating { factor: String },

    /// `min + max - rating`: a low rating is the good outcome
    InverseRating { factor: String },

    /// A raw attribute already on the 0-10 scale
    Attribute { attribute: String },

    /// `10 * (1 - value / max)`: cheaper or faster scores higher
    InverseAttribute { attribute: String, max: f64 },
}

struct ConfiguredTerm {
    spec: TermSpec,
    range: RatingRange,
}

impl ConfiguredTerm {
    fn attribute(&self, candidate: &Candidate, attribute: &str) -> Result<f64, ScoringError> {
        candidate
            .attributes
            .get(attribute)
            .copied()
            .ok_or_else(|| ScoringError::MissingAttribute {
                candidate: candidate.id.clone(),
                attribute: attribute.to_string(),
            })
    }
}

impl FormulaTerm for ConfiguredTerm {
    fn name(&self) -> &str {
        self.spec.name.as_deref().unwrap_or(&self.spec.weight)
    }

    fn weight_key(&self) -> &str {
        &self.spec.weight
    }

    fn value(&self, candidate: &Candidate) -> Result<f64, ScoringError> {
        match &self.spec.source {
            TermSource::Rating { factor } => Ok(f64::from(candidate.rating(factor))),
            TermSource::InverseRating { factor } => {
                let bounds = f64::from(self.range.min) + f64::from(self.range.max);
                Ok(bounds - f64::from(candidate.rating(factor)))
            }
            TermSource::Attribute { attribute } => self.attribute(candidate, attribute),
            TermSource::InverseAttribute { attribute, max } => {
                let value = self.attribute(candidate, attribute)?;
                Ok(10.0 * (1.0 - value / max))
            }
        }
    }
}
