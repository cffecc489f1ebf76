use serde::{Deserialize, Serialize};

use crate::scoring::{Candidate, Category, ScoringConfig};

/// One evaluation file: what is scored, how, and against which factors.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Evaluation {
    /// Shown in listings and stored with saved results
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub scoring: ScoringConfig,

    pub categories: Vec<Category>,

    pub candidates: Vec<Candidate>,
}

impl Evaluation {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }
}
