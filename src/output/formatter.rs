use chrono::{DateTime, Duration, Utc};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::history::SavedEvaluation;
use crate::scoring::{Candidate, ScoreResult, ScoreScale, WeakFactor};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a normalized score for its scale: one decimal on 0-10, whole numbers on 0-100
pub fn format_score(score: f64, scale: ScoreScale) -> String {
    match scale {
        ScoreScale::Ten => format!("{:.1}", score),
        ScoreScale::Hundred => format!("{:.0}", score),
    }
}

/// A ranked result with the candidate it belongs to, for display
pub struct RankedRow<'a> {
    pub candidate: &'a Candidate,
    pub result: &'a ScoreResult,
}

/// Pair results with their candidates, dropping results with no matching candidate
pub fn ranked_rows<'a>(candidates: &'a [Candidate], results: &'a [ScoreResult]) -> Vec<RankedRow<'a>> {
    results
        .iter()
        .filter_map(|result| {
            candidates
                .iter()
                .find(|c| c.id == result.candidate_id)
                .map(|candidate| RankedRow { candidate, result })
        })
        .collect()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a label to fit available width, accounting for Unicode
fn truncate_label(label: &str, max_width: usize) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= max_width {
        label.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn weak_summary(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => "1 weak factor".to_string(),
        n => format!("{} weak factors", n),
    }
}

/// Format results as a ranked table with columns: Rank, Score, Label, Weak factors
/// No headers. Rank column fits "99.", score column fits "100"/"10.0".
pub fn format_ranked_table(rows: &[RankedRow], scale: ScoreScale, use_colors: bool) -> String {
    if rows.is_empty() {
        return "No candidates to rank.".to_string();
    }

    let term_width = get_terminal_width();
    let rank_width = 3;
    let score_width = 5;
    let separator = "  ";

    rows.iter()
        .map(|row| {
            let rank_str = format!("{:>2}.", row.result.rank);
            let score_str = format!(
                "{:>width$}",
                format_score(row.result.normalized_score, scale),
                width = score_width
            );
            let weak = weak_summary(row.result.weak_factors.len());

            let fixed_width = rank_width + 1 + score_width + separator.len() * 2 + weak.len();
            let label = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_label(row.candidate.display_name(), width - fixed_width)
                }
                Some(_) => truncate_label(row.candidate.display_name(), 20),
                None => row.candidate.display_name().to_string(),
            };

            let line = if use_colors {
                format!(
                    "{} {}{}{}",
                    rank_str.dimmed(),
                    score_str.bold(),
                    separator,
                    label
                )
            } else {
                format!("{} {}{}{}", rank_str, score_str, separator, label)
            };

            if weak.is_empty() {
                line
            } else if use_colors {
                format!("{}{}{}", line, separator, weak.yellow())
            } else {
                format!("{}{}{}", line, separator, weak)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format results as tab-separated values for scripting
/// Columns: rank, score, id, label (no headers, no colors)
pub fn format_tsv(rows: &[RankedRow], scale: ScoreScale) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}",
                row.result.rank,
                format_score(row.result.normalized_score, scale),
                row.candidate.id,
                row.candidate.display_name()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format results as pretty JSON
pub fn format_json(results: &[ScoreResult]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(results)?)
}

/// Format the weak factors of one candidate, one per line
pub fn format_weak_factors(candidate: &Candidate, weak: &[WeakFactor], use_colors: bool) -> String {
    if weak.is_empty() {
        return format!("{}: no factors below threshold.", candidate.display_name());
    }

    let mut lines = vec![format!("{}:", candidate.display_name())];
    for factor in weak {
        let value = format!("{:>2}", factor.value);
        if use_colors {
            lines.push(format!(
                "  {}  {} ({})",
                value.red(),
                factor.factor,
                factor.category.dimmed()
            ));
        } else {
            lines.push(format!("  {}  {} ({})", value, factor.factor, factor.category));
        }
    }
    lines.join("\n")
}

/// Format saved evaluations, one per line: age, rank, score, candidate, evaluation name
pub fn format_history(
    entries: &[&SavedEvaluation],
    now: DateTime<Utc>,
    use_colors: bool,
) -> String {
    if entries.is_empty() {
        return "No saved evaluations.".to_string();
    }

    entries
        .iter()
        .map(|entry| {
            let age = format!("{:>4}", format_age(now - entry.saved_at));
            let score = format_score(entry.result.normalized_score, entry.scale);
            let evaluation = entry.evaluation.as_deref().unwrap_or("-");
            if use_colors {
                format!(
                    "{}  #{} {:>6}  {}  {}",
                    age.dimmed(),
                    entry.result.rank,
                    score.bold(),
                    entry.candidate.display_name(),
                    evaluation.cyan()
                )
            } else {
                format!(
                    "{}  #{} {:>6}  {}  {}",
                    age,
                    entry.result.rank,
                    score,
                    entry.candidate.display_name(),
                    evaluation
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
