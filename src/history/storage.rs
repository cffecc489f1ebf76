use super::types::{HistoryState, HISTORY_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default history file path (~/.config/carescore/history.json)
pub fn get_history_path() -> Result<PathBuf> {
    Ok(crate::config::get_config_dir()?.join("history.json"))
}

/// Load saved evaluations from a JSON file
///
/// If the file doesn't exist, returns a new empty history.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_history(path: &Path) -> Result<HistoryState> {
    if !path.exists() {
        return Ok(HistoryState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open history file at {}", path.display()))?;

    let state: HistoryState = serde_json::from_reader(file).context("Failed to load history")?;

    if state.version != HISTORY_VERSION {
        anyhow::bail!("Unsupported history version: {}", state.version);
    }

    Ok(state)
}

/// Save history to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if needed.
pub fn save_history(path: &Path, state: &HistoryState) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize history")?;

    file.commit().context("Failed to save history")?;

    tracing::debug!(path = %path.display(), entries = state.entries.len(), "saved history");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{Candidate, ScoreResult, ScoreScale, WeakFactor};
    use chrono::Utc;
    use std::env;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let temp_path = env::temp_dir().join("carescore_test_history_missing.json");
        let _ = std::fs::remove_file(&temp_path);

        let state = load_history(&temp_path).unwrap();
        assert_eq!(state.version, HISTORY_VERSION);
        assert!(state.entries.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let temp_path = env::temp_dir().join("carescore_test_history_save.json");
        let _ = std::fs::remove_file(&temp_path);

        let mut state = HistoryState::new();
        let candidates = vec![Candidate::new("midtown").with_rating("parking", 2)];
        let results = vec![ScoreResult {
            candidate_id: "midtown".to_string(),
            raw_score: 6.5,
            normalized_score: 65.0,
            rank: 1,
            weak_factors: vec![WeakFactor {
                category: "site".to_string(),
                factor: "parking".to_string(),
                value: 2,
            }],
        }];
        state.record(
            Some("Sites"),
            ScoreScale::Hundred,
            &candidates,
            &results,
            Utc::now(),
        );

        save_history(&temp_path, &state).unwrap();
        let loaded = load_history(&temp_path).unwrap();

        assert_eq!(loaded.entries, state.entries);

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_saved_at_is_iso8601() {
        let temp_path = env::temp_dir().join("carescore_test_history_iso.json");
        let mut state = HistoryState::new();
        let candidates = vec![Candidate::new("a")];
        let results = vec![ScoreResult {
            candidate_id: "a".to_string(),
            raw_score: 5.0,
            normalized_score: 5.0,
            rank: 1,
            weak_factors: vec![],
        }];
        state.record(None, ScoreScale::Ten, &candidates, &results, Utc::now());
        save_history(&temp_path, &state).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&temp_path).unwrap()).unwrap();
        let saved_at = raw["entries"][0]["saved_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(saved_at).is_ok());

        let _ = std::fs::remove_file(&temp_path);
    }

    #[test]
    fn test_unsupported_version() {
        let temp_path = env::temp_dir().join("carescore_test_history_version.json");
        std::fs::write(&temp_path, r#"{"version": 99, "entries": []}"#).unwrap();

        let err = load_history(&temp_path).unwrap_err();
        assert!(err.to_string().contains("Unsupported history version"));

        let _ = std::fs::remove_file(&temp_path);
    }
}
