use std::cmp::Ordering;

use super::error::ScoringError;
use super::types::{CandidateScore, ScoreResult};

/// Order scores best-first and number them 1, 2, 3...
///
/// Equal scores never share a rank: the lexically smaller candidate id wins,
/// so repeated runs always produce the same list.
pub fn rank(scores: Vec<CandidateScore>) -> Result<Vec<ScoreResult>, ScoringError> {
    if scores.is_empty() {
        return Err(ScoringError::EmptyCandidateSet);
    }

    let mut scores = scores;
    scores.sort_by(compare);

    Ok(scores
        .into_iter()
        .enumerate()
        .map(|(idx, score)| ScoreResult {
            candidate_id: score.candidate_id,
            raw_score: score.raw_score,
            normalized_score: score.normalized_score,
            rank: idx + 1,
            weak_factors: Vec::new(),
        })
        .collect())
}

fn compare(a: &CandidateScore, b: &CandidateScore) -> Ordering {
    // Primary: score descending
    b.normalized_score
        .total_cmp(&a.normalized_score)
        // Tie-breaker: id ascending
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}
