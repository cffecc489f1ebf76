pub mod formatter;

pub use formatter::{
    format_age, format_history, format_json, format_ranked_table, format_score, format_tsv,
    format_weak_factors, ranked_rows, should_use_colors, RankedRow,
};
