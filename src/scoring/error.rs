use thiserror::Error;

/// Failures of a scoring call. Scoring is all-or-nothing: no partial results.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoringError {
    #[error("candidate '{candidate}': rating {value} for '{factor}' is outside {min}-{max}")]
    InvalidFactorRange {
        candidate: String,
        factor: String,
        value: u8,
        min: u8,
        max: u8,
    },

    #[error("invalid weight for '{key}': {reason}")]
    InvalidWeight { key: String, reason: String },

    #[error("category '{0}' has no factors")]
    EmptyCategory(String),

    #[error("term '{term}' produced {value} for candidate '{candidate}', expected 0-10")]
    TermRange {
        term: String,
        candidate: String,
        value: f64,
    },

    #[error("no candidates to score")]
    EmptyCandidateSet,

    #[error("candidate id '{0}' appears more than once")]
    DuplicateCandidate(String),

    #[error("factor '{factor}' is listed in both '{first}' and '{second}'")]
    DuplicateFactor {
        factor: String,
        first: String,
        second: String,
    },

    #[error("weight given for undeclared category '{0}'")]
    UnknownCategory(String),

    #[error("no weight supplied for '{0}'")]
    MissingWeight(String),

    #[error("divisor must be a positive number, got {0}")]
    InvalidDivisor(f64),

    #[error("candidate '{candidate}' has no attribute '{attribute}'")]
    MissingAttribute { candidate: String, attribute: String },

    #[error("rating range {min}-{max} is empty or excludes the default rating 5")]
    InvalidRange { min: u8, max: u8 },

    #[error("candidate '{candidate}' rates '{factor}', which is not in any category")]
    UnknownFactor { candidate: String, factor: String },
}

impl ScoringError {
    pub(crate) fn weight(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ScoringError::InvalidWeight {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
