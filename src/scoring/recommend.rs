use super::types::{Candidate, Category, WeakFactor};

pub const DEFAULT_THRESHOLD: u8 = 5;
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Factors rated strictly below `threshold`, weakest first, at most `max_results`.
///
/// Ties keep category/factor declaration order. Produces data only; wording
/// the advice is left to the caller.
pub fn recommend_weak_factors(
    candidate: &Candidate,
    categories: &[Category],
    threshold: u8,
    max_results: usize,
) -> Vec<WeakFactor> {
    let mut weak: Vec<WeakFactor> = categories
        .iter()
        .flat_map(|category| {
            category.factors.iter().map(move |factor| WeakFactor {
                category: category.name.clone(),
                factor: factor.clone(),
                value: candidate.rating(factor),
            })
        })
        .filter(|weak| weak.value < threshold)
        .collect();

    // Stable sort keeps declaration order among equal values
    weak.sort_by_key(|weak| weak.value);
    weak.truncate(max_results);
    weak
}
