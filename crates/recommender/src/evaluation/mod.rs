//! Offline evaluation of hybrid weightings.
//!
//! ## Flow
//! 1. `TrainTestSplit` holds out a share of every eligible user's ratings
//! 2. `Evaluator` asks the hybrid recommender for a long list per test user,
//!    using only training ratings, and turns each held-out movie's rank into
//!    a predicted rating (top ≈ 5, bottom ≈ 0, missing = neutral 2.5)
//! 3. `GridSearch` evaluates every weight pair and keeps the lowest MAE
//!
//! An MAE of `None` means "undefined": no split yet, or nothing to evaluate.

pub mod optimizer;
pub mod split;

pub use optimizer::{GridPoint, GridSearch, OptimizationReport};
pub use split::TrainTestSplit;

use crate::config::EngineConfig;
use crate::hybrid::HybridRecommender;
use crate::random::RandomSource;
use crate::ranking::position_score;
use crate::types::{HybridWeights, RatingView, Recommendations};
use data_loader::{Catalog, MovieId, UserRatings};
use tracing::{debug, instrument};

/// Scores hybrid weightings against one train/test split.
///
/// Recommendations are generated from a view over the training ratings only;
/// the full ratings are never visible here.
pub struct Evaluator<'a> {
    catalog: &'a Catalog,
    split: &'a TrainTestSplit,
    hybrid: &'a HybridRecommender,
    config: &'a EngineConfig,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        catalog: &'a Catalog,
        split: &'a TrainTestSplit,
        hybrid: &'a HybridRecommender,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            catalog,
            split,
            hybrid,
            config,
        }
    }

    /// Predicted rating for a held-out movie given the recommendation list
    fn predicted_rating(&self, recs: &Recommendations, movie_id: MovieId) -> f64 {
        match recs.position(movie_id) {
            Some(pos) => position_score(pos, self.config.evaluation_list_len, self.config.max_rating),
            None => self.config.neutral_prediction,
        }
    }

    /// Sum of absolute errors and number of held-out ratings for one user
    fn user_error(&self, recs: &Recommendations, held_out: &UserRatings) -> (f64, usize) {
        held_out.iter().fold((0.0, 0), |(total, count), (&movie_id, &actual)| {
            let predicted = self.predicted_rating(recs, movie_id);
            let actual = actual.clamp(0.0, self.config.max_rating);
            (total + (predicted - actual).abs(), count + 1)
        })
    }

    /// Mean absolute error of the hybrid recommender under `weights`.
    ///
    /// `None` when the split is empty or no test user has enough training
    /// history to be evaluated.
    #[instrument(skip(self, rng))]
    pub fn mean_absolute_error(
        &self,
        weights: HybridWeights,
        rng: &mut dyn RandomSource,
    ) -> Option<f64> {
        if self.split.is_empty() {
            return None;
        }

        let view = RatingView::new(self.catalog, &self.split.training);
        let list_len = self.config.evaluation_list_len;

        let mut total_error = 0.0;
        let mut count = 0usize;
        let mut evaluated_users = 0usize;

        for (&user_id, held_out) in &self.split.test {
            let enough_history = self
                .split
                .training
                .get(&user_id)
                .is_some_and(|train| train.len() >= self.config.min_training_ratings);
            if !enough_history {
                continue;
            }

            let recs = self.hybrid.recommend(&view, user_id, list_len, weights, rng);
            let (error, n) = self.user_error(&recs, held_out);
            total_error += error;
            count += n;
            evaluated_users += 1;
        }

        debug!(
            "Evaluated {} held-out ratings across {} users",
            count, evaluated_users
        );
        (count > 0).then(|| total_error / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;
    use data_loader::{Movie, RatingMatrix};

    fn create_test_catalog() -> Catalog {
        (1..=20)
            .map(|id| Movie::new(id, format!("Movie {}", id), &["Drama"]))
            .collect()
    }

    fn split_with(training: &[(u32, f64)], test: &[(u32, f64)]) -> TrainTestSplit {
        let mut split = TrainTestSplit::default();
        split.training.insert(1, training.iter().copied().collect());
        split.test.insert(1, test.iter().copied().collect());
        split
    }

    #[test]
    fn test_empty_split_is_undefined() {
        let catalog = create_test_catalog();
        let split = TrainTestSplit::default();
        let hybrid = HybridRecommender::default();
        let config = EngineConfig::default();

        let evaluator = Evaluator::new(&catalog, &split, &hybrid, &config);
        assert_eq!(evaluator.mean_absolute_error(HybridWeights::default(), &mut seeded(1)), None);
    }

    #[test]
    fn test_too_little_history_is_undefined() {
        let catalog = create_test_catalog();
        let split = split_with(&[(1, 4.0), (2, 4.0)], &[(3, 5.0)]);
        let hybrid = HybridRecommender::default();
        let config = EngineConfig::default();

        let evaluator = Evaluator::new(&catalog, &split, &hybrid, &config);
        assert_eq!(evaluator.mean_absolute_error(HybridWeights::default(), &mut seeded(1)), None);
    }

    #[test]
    fn test_top_ranked_held_out_movie() {
        let catalog = create_test_catalog();
        // All movies share a genre, so content scores tie and rank by id:
        // movie 6 is the first unrated id and lands at position 0.
        let training: Vec<(u32, f64)> = (1..=5).map(|id| (id, 5.0)).collect();
        let split = split_with(&training, &[(6, 5.0)]);
        let hybrid = HybridRecommender::default();
        let config = EngineConfig::default();

        let evaluator = Evaluator::new(&catalog, &split, &hybrid, &config);
        let mae = evaluator
            .mean_absolute_error(HybridWeights::new(1.0, 0.0), &mut seeded(1))
            .unwrap();
        assert!(mae.abs() < 1e-12);
    }

    #[test]
    fn test_missing_movie_gets_neutral_prediction() {
        let catalog = create_test_catalog();
        let training: Vec<(u32, f64)> = (1..=5).map(|id| (id, 4.0)).collect();
        // movie 99 is not in the catalog, so it can never be recommended
        let split = split_with(&training, &[(99, 4.0)]);
        let hybrid = HybridRecommender::default();
        let config = EngineConfig::default();

        let evaluator = Evaluator::new(&catalog, &split, &hybrid, &config);
        let mae = evaluator
            .mean_absolute_error(HybridWeights::default(), &mut seeded(1))
            .unwrap();
        assert!((mae - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_mae_within_rating_scale() {
        let catalog = create_test_catalog();
        let mut ratings = RatingMatrix::new();
        for user_id in 1..=6u32 {
            let user = ratings.entry(user_id).or_default();
            for movie_id in 1..=15u32 {
                user.insert(movie_id, ((movie_id + user_id) % 5 + 1) as f64);
            }
        }
        let split = TrainTestSplit::new(&ratings, 0.3, 10, &mut seeded(42));
        let hybrid = HybridRecommender::default();
        let config = EngineConfig::default();

        let evaluator = Evaluator::new(&catalog, &split, &hybrid, &config);
        let mae = evaluator
            .mean_absolute_error(HybridWeights::default(), &mut seeded(3))
            .unwrap();
        assert!(mae.is_finite());
        assert!((0.0..=5.0).contains(&mae));
    }
}
