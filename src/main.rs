use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use carescore::config::Evaluation;
use carescore::scoring::{self, ScoreResult};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_SCORING: i32 = 5;
const EXIT_STORAGE: i32 = 6;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Format {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank candidates by score (default if no subcommand)
    Rank {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// List the weakest factors of one candidate
    Weak {
        /// Candidate id as written in the evaluation file
        candidate: String,

        /// Report ratings strictly below this (overrides scoring.threshold)
        #[arg(short, long)]
        threshold: Option<u8>,

        /// Maximum factors to report (overrides scoring.max_weak)
        #[arg(short, long)]
        max: Option<usize>,
    },
    /// Score candidates and append the results to the history file
    Save {
        /// History file (defaults to ~/.config/carescore/history.json)
        #[arg(long)]
        history: Option<PathBuf>,
    },
    /// Show saved evaluations, newest first
    History {
        /// History file (defaults to ~/.config/carescore/history.json)
        #[arg(long)]
        history: Option<PathBuf>,

        /// Delete all saved evaluations
        #[arg(long)]
        clear: bool,
    },
    /// Write a starter evaluation file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "carescore")]
#[command(about = "Rank childcare center options by weighted multi-factor scoring", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to evaluation file (defaults to ~/.config/carescore/evaluation.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = carescore::telemetry::init(cli.verbose) {
        eprintln!("Logging setup failed: {}", e);
    }

    let command = cli.command.unwrap_or(Commands::Rank {
        format: Format::default(),
    });

    let code = match command {
        Commands::Init { force } => run_init(cli.config, force),
        Commands::History { history, clear } => run_history(history, clear),
        command => run_scoring(command, cli.config),
    };

    std::process::exit(code);
}

fn run_init(config: Option<PathBuf>, force: bool) -> i32 {
    let path = match config {
        Some(p) => Ok(p),
        None => carescore::config::get_config_path(),
    };
    let path = match path {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return EXIT_CONFIG;
        }
    };

    match carescore::config::write_starter(&path, force) {
        Ok(()) => {
            println!("Wrote starter evaluation to {}", path.display());
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            EXIT_CONFIG
        }
    }
}

fn run_history(history: Option<PathBuf>, clear: bool) -> i32 {
    match history_command(history, clear) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("History error: {:#}", e);
            EXIT_STORAGE
        }
    }
}

fn history_command(history: Option<PathBuf>, clear: bool) -> Result<()> {
    let path = resolve_history_path(history)?;
    let mut state = carescore::history::load_history(&path)?;

    if clear {
        let removed = state.clear();
        carescore::history::save_history(&path, &state)?;
        println!("Removed {} saved evaluations.", removed);
        return Ok(());
    }

    let entries = state.newest_first();
    let use_colors = carescore::output::should_use_colors();
    println!(
        "{}",
        carescore::output::format_history(&entries, Utc::now(), use_colors)
    );
    Ok(())
}

fn resolve_history_path(history: Option<PathBuf>) -> Result<PathBuf> {
    match history {
        Some(p) => Ok(p),
        None => carescore::history::get_history_path(),
    }
}

/// Commands that need a loaded, validated, scored evaluation.
fn run_scoring(command: Commands, config: Option<PathBuf>) -> i32 {
    let evaluation = match carescore::config::load_config(config) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return EXIT_CONFIG;
        }
    };

    tracing::info!(
        evaluation = evaluation.display_name(),
        candidates = evaluation.candidates.len(),
        "loaded evaluation"
    );

    // Validate scoring config before scoring anything
    if let Err(errors) = scoring::validate_scoring(
        &evaluation.scoring,
        &evaluation.categories,
        &evaluation.candidates,
    ) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return EXIT_CONFIG;
    }

    let results = match scoring::evaluate_config(
        &evaluation.scoring,
        &evaluation.candidates,
        &evaluation.categories,
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            return EXIT_SCORING;
        }
    };

    match command {
        Commands::Rank { format } => print_ranking(&evaluation, &results, format),
        Commands::Weak {
            candidate,
            threshold,
            max,
        } => print_weak(&evaluation, &candidate, threshold, max),
        Commands::Save { history } => match save_results(&evaluation, &results, history) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("History error: {:#}", e);
                EXIT_STORAGE
            }
        },
        Commands::History { .. } | Commands::Init { .. } => EXIT_SUCCESS,
    }
}

fn print_ranking(evaluation: &Evaluation, results: &[ScoreResult], format: Format) -> i32 {
    let scale = evaluation.scoring.scale();
    let rows = carescore::output::ranked_rows(&evaluation.candidates, results);

    match format {
        Format::Table => {
            let use_colors = carescore::output::should_use_colors();
            println!(
                "{}",
                carescore::output::format_ranked_table(&rows, scale, use_colors)
            );
        }
        Format::Tsv => println!("{}", carescore::output::format_tsv(&rows, scale)),
        Format::Json => match carescore::output::format_json(results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize results: {}", e);
                return EXIT_SCORING;
            }
        },
    }
    EXIT_SUCCESS
}

fn print_weak(
    evaluation: &Evaluation,
    candidate_id: &str,
    threshold: Option<u8>,
    max: Option<usize>,
) -> i32 {
    let Some(candidate) = evaluation.candidate(candidate_id) else {
        eprintln!(
            "Unknown candidate '{}'. Known: {}",
            candidate_id,
            evaluation
                .candidates
                .iter()
                .map(|c| c.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return EXIT_CONFIG;
    };

    let weak = scoring::recommend_weak_factors(
        candidate,
        &evaluation.categories,
        threshold.unwrap_or_else(|| evaluation.scoring.threshold()),
        max.unwrap_or_else(|| evaluation.scoring.max_weak()),
    );

    let use_colors = carescore::output::should_use_colors();
    println!(
        "{}",
        carescore::output::format_weak_factors(candidate, &weak, use_colors)
    );
    EXIT_SUCCESS
}

fn save_results(
    evaluation: &Evaluation,
    results: &[ScoreResult],
    history: Option<PathBuf>,
) -> Result<()> {
    let path = resolve_history_path(history)?;
    let mut state = carescore::history::load_history(&path)?;
    let added = state.record(
        evaluation.name.as_deref(),
        evaluation.scoring.scale(),
        &evaluation.candidates,
        results,
        Utc::now(),
    );
    carescore::history::save_history(&path, &state)?;

    tracing::info!(path = %path.display(), added, "saved evaluation");
    println!("Saved {} results to {}", added, path.display());
    Ok(())
}
