//! Train/test split of a rating matrix.

use crate::random::RandomSource;
use data_loader::{RatingMatrix, UserRatings};
use tracing::info;

/// Two disjoint rating matrices derived from the full ratings.
///
/// Invariants:
/// - every user in `training` has at least one rating
/// - users with fewer than the minimum rating count appear in neither side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainTestSplit {
    pub training: RatingMatrix,
    pub test: RatingMatrix,
}

impl TrainTestSplit {
    /// Assign each rating of every eligible user to the test side with
    /// probability `test_ratio`, otherwise to training.
    ///
    /// If a user's draws leave training empty, their lowest-id test rating is
    /// moved back so the user keeps some history.
    pub fn new(
        ratings: &RatingMatrix,
        test_ratio: f64,
        min_ratings: usize,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut split = TrainTestSplit::default();

        for (&user_id, user_ratings) in ratings {
            if user_ratings.len() < min_ratings {
                continue;
            }

            let mut train = UserRatings::new();
            let mut test = UserRatings::new();
            for (&movie_id, &rating) in user_ratings {
                if rng.next_f64() < test_ratio {
                    test.insert(movie_id, rating);
                } else {
                    train.insert(movie_id, rating);
                }
            }

            if train.is_empty()
                && let Some((movie_id, rating)) = test.pop_first()
            {
                train.insert(movie_id, rating);
            }

            if !train.is_empty() {
                split.training.insert(user_id, train);
            }
            if !test.is_empty() {
                split.test.insert(user_id, test);
            }
        }

        info!(
            "Split data: training users={} test users={}",
            split.training.len(),
            split.test.len()
        );
        split
    }

    /// True when either side has no users, i.e. nothing can be evaluated
    pub fn is_empty(&self) -> bool {
        self.training.is_empty() || self.test.is_empty()
    }

    /// (training ratings, test ratings)
    pub fn rating_counts(&self) -> (usize, usize) {
        let count = |m: &RatingMatrix| -> usize { m.values().map(|r| r.len()).sum() };
        (count(&self.training), count(&self.test))
    }
}
