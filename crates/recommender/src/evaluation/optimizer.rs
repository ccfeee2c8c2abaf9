//! Grid search over hybrid weight pairs.
//!
//! Every point of the content x collaborative grid is evaluated with its own
//! RNG seeded from the base seed and the point's index, so the numbers do not
//! depend on evaluation order and the rayon path matches the sequential one.

use super::Evaluator;
use crate::random::{point_seed, seeded};
use crate::types::HybridWeights;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

/// One evaluated weight pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPoint {
    pub weights: HybridWeights,
    /// `None` when the evaluation was undefined
    pub mae: Option<f64>,
}

/// Every evaluated point plus the best one, if any point had a defined MAE
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    pub points: Vec<GridPoint>,
    pub best: Option<GridPoint>,
}

impl OptimizationReport {
    fn from_points(points: Vec<GridPoint>) -> Self {
        // strict `<` keeps the first point on ties
        let best = points.iter().copied().fold(None, |best: Option<GridPoint>, point| {
            match (best, point.mae) {
                (_, None) => best,
                (None, Some(_)) => Some(point),
                (Some(b), Some(mae)) => match b.mae {
                    Some(best_mae) if mae < best_mae => Some(point),
                    _ => Some(b),
                },
            }
        });
        Self { points, best }
    }
}

pub struct GridSearch {
    seed: u64,
    parallel: bool,
}

impl GridSearch {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            parallel: false,
        }
    }

    /// Evaluate grid points on the rayon pool (default: false)
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Cartesian product of the two weight lists, content-major
    fn grid(content_weights: &[f64], collab_weights: &[f64]) -> Vec<HybridWeights> {
        content_weights
            .iter()
            .flat_map(|&cw| collab_weights.iter().map(move |&rw| HybridWeights::new(cw, rw)))
            .collect()
    }

    fn evaluate_point(&self, evaluator: &Evaluator<'_>, index: usize, weights: HybridWeights) -> GridPoint {
        let mut rng = seeded(point_seed(self.seed, index));
        let mae = evaluator.mean_absolute_error(weights, &mut rng);
        match mae {
            Some(mae) => info!(
                "Weights content={:.3} collab={:.3} -> MAE={:.4}",
                weights.content, weights.collaborative, mae
            ),
            None => info!(
                "Weights content={:.3} collab={:.3} -> MAE undefined",
                weights.content, weights.collaborative
            ),
        }
        GridPoint { weights, mae }
    }

    pub fn run(
        &self,
        evaluator: &Evaluator<'_>,
        content_weights: &[f64],
        collab_weights: &[f64],
    ) -> OptimizationReport {
        let grid = Self::grid(content_weights, collab_weights);
        info!(
            "Evaluating {} weight pairs ({})",
            grid.len(),
            if self.parallel { "parallel" } else { "sequential" }
        );

        let points: Vec<GridPoint> = if self.parallel {
            grid.par_iter()
                .enumerate()
                .map(|(index, &weights)| self.evaluate_point(evaluator, index, weights))
                .collect()
        } else {
            grid.iter()
                .enumerate()
                .map(|(index, &weights)| self.evaluate_point(evaluator, index, weights))
                .collect()
        };

        let report = OptimizationReport::from_points(points);
        match report.best {
            Some(GridPoint { weights, mae: Some(mae) }) => info!(
                "Best weights: content={:.3} collab={:.3} with MAE={:.4}",
                weights.content, weights.collaborative, mae
            ),
            _ => warn!("No valid result: every weight pair had an undefined MAE"),
        }
        report
    }
}
