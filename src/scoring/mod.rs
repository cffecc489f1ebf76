pub mod category;
pub mod config;
pub mod engine;
pub mod error;
pub mod formula;
pub mod rank;
pub mod recommend;
pub mod types;
pub mod validation;

pub use category::{category_mean, score_by_category, score_by_category_within};
pub use config::*;
pub use engine::{evaluate, evaluate_config, EvaluationOptions, Method};
pub use error::ScoringError;
pub use formula::{score_by_formula, score_by_formula_within, FnTerm, FormulaTerm};
pub use rank::rank;
pub use recommend::{recommend_weak_factors, DEFAULT_MAX_RESULTS, DEFAULT_THRESHOLD};
pub use types::{
    Candidate, CandidateScore, Category, RatingRange, ScoreResult, ScoreScale, WeakFactor,
    DEFAULT_RATING,
};
pub use validation::validate_scoring;
