mod init;
mod schema;

pub use init::{write_starter, STARTER_EVALUATION};
pub use schema::Evaluation;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.config/carescore/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("carescore"))
}

/// Get the default evaluation file path (~/.config/carescore/evaluation.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("evaluation.yaml"))
}

/// Ensure the parent directory of `path` exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory at {}", dir.display()))?;
        }
    }
    Ok(())
}

/// Load an evaluation from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to the file. If None, uses the default path (~/.config/carescore/evaluation.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The file does not exist
/// - The file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Evaluation> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Evaluation file not found at {}. Run `carescore init` to create one",
            config_path.display()
        );
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read evaluation file at {}", config_path.display()))?;

    parse_evaluation(&content)
        .with_context(|| format!("Failed to parse evaluation: invalid YAML in {}", config_path.display()))
}

/// Parse an evaluation from YAML text
pub fn parse_evaluation(content: &str) -> Result<Evaluation> {
    let evaluation: Evaluation = serde_saphyr::from_str(content)?;
    tracing::debug!(
        name = evaluation.display_name(),
        categories = evaluation.categories.len(),
        candidates = evaluation.candidates.len(),
        "loaded evaluation"
    );
    Ok(evaluation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_parse_minimal_evaluation() {
        let yaml = r#"
categories:
  - name: cost
    factors: [cost]
candidates:
  - id: a
    ratings: { cost: 8 }
"#;
        let evaluation = parse_evaluation(yaml).unwrap();
        assert!(evaluation.name.is_none());
        assert_eq!(evaluation.scoring, crate::scoring::ScoringConfig::default());
        assert_eq!(evaluation.candidates[0].rating("cost"), 8);
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let yaml = r#"
categories: []
candidates: []
extra: true
"#;
        assert!(parse_evaluation(yaml).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let path = env::temp_dir().join("carescore_test_missing_evaluation.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_from_file() {
        let path = env::temp_dir().join("carescore_test_load_evaluation.yaml");
        fs::write(&path, STARTER_EVALUATION).unwrap();

        let evaluation = load_config(Some(path.clone())).unwrap();
        assert!(!evaluation.candidates.is_empty());

        let _ = fs::remove_file(&path);
    }
}
