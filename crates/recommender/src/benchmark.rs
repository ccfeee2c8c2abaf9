//! Side-by-side comparison of the three recommenders for one user.

use crate::types::Recommendations;
use data_loader::{MovieId, UserId};
use std::collections::HashSet;
use std::time::Duration;

/// How many ids two lists share
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    pub left: &'static str,
    pub right: &'static str,
    pub count: usize,
    /// `count` as a share of the requested list length
    pub percent: f64,
    pub requested: usize,
}

impl Overlap {
    pub fn between(
        left: (&'static str, &Recommendations),
        right: (&'static str, &Recommendations),
        requested: usize,
    ) -> Self {
        let count = count_overlap(&left.1.movie_ids, &right.1.movie_ids);
        Self {
            left: left.0,
            right: right.0,
            count,
            percent: percent(count, requested),
            requested,
        }
    }

    /// Display form of `percent`; a zero-length request reads "0%"
    pub fn percent_label(&self) -> String {
        if self.requested == 0 {
            "0%".to_string()
        } else {
            format!("{:.1}%", self.percent)
        }
    }
}

/// Wall-clock time of each recommender
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    pub content: Duration,
    pub collaborative: Duration,
    pub hybrid: Duration,
}

#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub user_id: UserId,
    pub requested: usize,
    pub content: Recommendations,
    pub collaborative: Recommendations,
    pub hybrid: Recommendations,
    pub timings: Timings,
    pub overlaps: Vec<Overlap>,
}

impl BenchmarkReport {
    pub fn new(
        user_id: UserId,
        requested: usize,
        content: Recommendations,
        collaborative: Recommendations,
        hybrid: Recommendations,
        timings: Timings,
    ) -> Self {
        let overlaps = vec![
            Overlap::between(("content", &content), ("collaborative", &collaborative), requested),
            Overlap::between(("content", &content), ("hybrid", &hybrid), requested),
            Overlap::between(("collaborative", &collaborative), ("hybrid", &hybrid), requested),
        ];
        Self {
            user_id,
            requested,
            content,
            collaborative,
            hybrid,
            timings,
            overlaps,
        }
    }
}

fn count_overlap(a: &[MovieId], b: &[MovieId]) -> usize {
    let seen: HashSet<MovieId> = a.iter().copied().collect();
    b.iter().filter(|id| seen.contains(id)).count()
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}
