use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{Candidate, ScoreResult, ScoreScale};

pub const HISTORY_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryState {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<SavedEvaluation>,
}

/// A scored candidate as it was when saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedEvaluation {
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub evaluation: Option<String>,
    /// Scale the score was normalized onto
    #[serde(default)]
    pub scale: ScoreScale,
    pub candidate: Candidate,
    pub result: ScoreResult,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryState {
    /// Create a new empty history with the current version
    pub fn new() -> Self {
        Self {
            version: HISTORY_VERSION,
            entries: Vec::new(),
        }
    }

    /// Append one entry per result, paired with its candidate snapshot.
    /// Returns how many entries were added.
    pub fn record(
        &mut self,
        evaluation: Option<&str>,
        scale: ScoreScale,
        candidates: &[Candidate],
        results: &[ScoreResult],
        saved_at: DateTime<Utc>,
    ) -> usize {
        let before = self.entries.len();
        for result in results {
            if let Some(candidate) = candidates.iter().find(|c| c.id == result.candidate_id) {
                self.entries.push(SavedEvaluation {
                    saved_at,
                    evaluation: evaluation.map(str::to_string),
                    scale,
                    candidate: candidate.clone(),
                    result: result.clone(),
                });
            }
        }
        self.entries.len() - before
    }

    /// Entries newest first
    pub fn newest_first(&self) -> Vec<&SavedEvaluation> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| {
            b.saved_at
                .cmp(&a.saved_at)
                .then_with(|| a.result.rank.cmp(&b.result.rank))
        });
        entries
    }

    /// Remove all entries. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }
}
