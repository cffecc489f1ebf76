use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::error::ScoringError;

/// Rating assumed for any factor the caller left unset (midpoint of 1-10).
pub const DEFAULT_RATING: u8 = 5;

/// Inclusive range every factor rating must fall in.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RatingRange {
    pub min: u8,
    pub max: u8,
}

impl Default for RatingRange {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}

impl RatingRange {
    pub fn contains(&self, value: u8) -> bool {
        value >= self.min && value <= self.max
    }

    /// Rejects an empty range, and one that excludes [`DEFAULT_RATING`]
    /// since unset ratings would fall outside it.
    pub fn check(&self) -> Result<(), ScoringError> {
        if self.min > self.max || !self.contains(DEFAULT_RATING) {
            return Err(ScoringError::InvalidRange {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Output scale of a normalized score.
///
/// Serialized as the plain integers `10` and `100`.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(try_from = "u32", into = "u32")]
pub enum ScoreScale {
    #[default]
    Ten,
    Hundred,
}

impl ScoreScale {
    pub fn max(self) -> f64 {
        match self {
            ScoreScale::Ten => 10.0,
            ScoreScale::Hundred => 100.0,
        }
    }

    /// Factor applied to a value on the 0-10 rating scale.
    pub fn factor(self) -> f64 {
        self.max() / 10.0
    }
}

impl TryFrom<u32> for ScoreScale {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10 => Ok(ScoreScale::Ten),
            100 => Ok(ScoreScale::Hundred),
            other => Err(format!("scale must be 10 or 100, got {}", other)),
        }
    }
}

impl From<ScoreScale> for u32 {
    fn from(scale: ScoreScale) -> Self {
        match scale {
            ScoreScale::Ten => 10,
            ScoreScale::Hundred => 100,
        }
    }
}

/// A named group of factors. Categories partition the factor set.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub name: String,
    pub factors: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, factors: &[&str]) -> Self {
        Self {
            name: name.into(),
            factors: factors.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// An option being evaluated: a location, an accreditation, a strategy.
///
/// Value snapshot: scoring never mutates it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Candidate {
    pub id: String,

    /// Display name (falls back to `id`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Factor key -> rating
    #[serde(default)]
    pub ratings: BTreeMap<String, u8>,

    /// Raw measures (cost, months) read by formula terms
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, f64>,
}

impl Candidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            ratings: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_rating(mut self, factor: impl Into<String>, value: u8) -> Self {
        self.ratings.insert(factor.into(), value);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Rating for `factor`, or the midpoint when unset.
    pub fn rating(&self, factor: &str) -> u8 {
        self.ratings.get(factor).copied().unwrap_or(DEFAULT_RATING)
    }

    /// Rejects the first rating outside `range`.
    pub fn check_ratings(&self, range: &RatingRange) -> Result<(), ScoringError> {
        for (factor, &value) in &self.ratings {
            if !range.contains(value) {
                return Err(ScoringError::InvalidFactorRange {
                    candidate: self.id.clone(),
                    factor: factor.clone(),
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

/// Checks the candidate set is non-empty, ids are unique and every rating is in range.
pub(crate) fn check_candidates(
    candidates: &[Candidate],
    range: &RatingRange,
) -> Result<(), ScoringError> {
    if candidates.is_empty() {
        return Err(ScoringError::EmptyCandidateSet);
    }
    range.check()?;

    let mut seen = BTreeSet::new();
    for candidate in candidates {
        if !seen.insert(candidate.id.as_str()) {
            return Err(ScoringError::DuplicateCandidate(candidate.id.clone()));
        }
        candidate.check_ratings(range)?;
    }
    Ok(())
}

/// Rejects ratings keyed by a factor no category declares.
pub(crate) fn check_declared_factors(
    candidates: &[Candidate],
    categories: &[Category],
) -> Result<(), ScoringError> {
    let declared: BTreeSet<&str> = categories
        .iter()
        .flat_map(|c| c.factors.iter().map(String::as_str))
        .collect();
    for candidate in candidates {
        if let Some(factor) = candidate
            .ratings
            .keys()
            .find(|factor| !declared.contains(factor.as_str()))
        {
            return Err(ScoringError::UnknownFactor {
                candidate: candidate.id.clone(),
                factor: factor.clone(),
            });
        }
    }
    Ok(())
}

/// Checks categories are non-empty and no factor belongs to two of them.
pub(crate) fn check_categories(categories: &[Category]) -> Result<(), ScoringError> {
    let mut owner: BTreeMap<&str, &str> = BTreeMap::new();
    for category in categories {
        if category.factors.is_empty() {
            return Err(ScoringError::EmptyCategory(category.name.clone()));
        }
        for factor in &category.factors {
            if let Some(first) = owner.insert(factor.as_str(), category.name.as_str()) {
                return Err(ScoringError::DuplicateFactor {
                    factor: factor.clone(),
                    first: first.to_string(),
                    second: category.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Score of one candidate before ranking.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CandidateScore {
    pub candidate_id: String,
    /// Accumulator before normalization
    pub raw_score: f64,
    pub normalized_score: f64,
}

/// A factor rated below the recommendation threshold.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct WeakFactor {
    pub category: String,
    pub factor: String,
    pub value: u8,
}

/// Ranked score of one candidate.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScoreResult {
    pub candidate_id: String,
    pub raw_score: f64,
    pub normalized_score: f64,
    /// 1-based, unique within one evaluation
    pub rank: usize,
    /// Weakest first; empty unless produced by `evaluate`
    #[serde(default)]
    pub weak_factors: Vec<WeakFactor>,
}
