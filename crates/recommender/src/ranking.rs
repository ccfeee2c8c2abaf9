//! Ranking helpers shared by every recommender.

use data_loader::MovieId;
use std::cmp::Ordering;

/// Order by score descending, then by movie id ascending so equal scores
/// always come out in the same order.
fn by_score_then_id(a: &(MovieId, f64), b: &(MovieId, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Ids of the `k` best-scoring movies
pub fn top_k(scores: impl IntoIterator<Item = (MovieId, f64)>, k: usize) -> Vec<MovieId> {
    let mut scored: Vec<(MovieId, f64)> = scores.into_iter().collect();
    scored.sort_unstable_by(by_score_then_id);
    scored.truncate(k);
    scored.into_iter().map(|(id, _)| id).collect()
}

/// Linear rank-to-score mapping: `max_score` at position 0, decreasing by
/// `max_score / list_len` per position, never below 0.
pub fn position_score(position: usize, list_len: usize, max_score: f64) -> f64 {
    let step = max_score / list_len.max(1) as f64;
    (max_score - position as f64 * step).clamp(0.0, max_score)
}
