//! Collaborative Recommender - similarity-weighted rating prediction
//!
//! "Users who rate like you rated these highly"
//!
//! ## Algorithm
//! 1. Compute the similarity between the target user and every other user
//!    (in parallel); keep the strictly positive ones as neighbours
//! 2. For each movie the target has not rated, predict
//!    `sum(sim * rating) / sum(sim)` over the neighbours who rated it.
//!    Movies no neighbour rated get no prediction at all.
//! 3. Rank predictions (ties by ascending movie id), take the top k
//! 4. Pad a short list with random unrated movies

use crate::random::{RandomSource, pad_with_random, random_movies};
use crate::ranking::top_k;
use crate::similarity::scaled_user_similarity;
use crate::types::{Provenance, RatingView, Recommendations};
use data_loader::{MAX_RATING, MovieId, UserId, UserRatings};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct CollaborativeRecommender {
    /// Top of the rating scale used for similarity
    max_rating: f64,
}

impl CollaborativeRecommender {
    pub fn new() -> Self {
        Self {
            max_rating: MAX_RATING,
        }
    }

    /// Configure the rating scale (default: 5.0)
    pub fn with_max_rating(mut self, max_rating: f64) -> Self {
        self.max_rating = max_rating;
        self
    }

    /// Users with strictly positive similarity to the target, in user id order
    pub fn neighbours(
        &self,
        view: &RatingView<'_>,
        user_id: UserId,
        target: &UserRatings,
    ) -> Vec<(UserId, f64)> {
        view.ratings()
            .par_iter()
            .filter(|&(&other_id, _)| other_id != user_id)
            .filter_map(|(&other_id, other)| {
                let sim = scaled_user_similarity(target, other, self.max_rating);
                (sim > 0.0).then_some((other_id, sim))
            })
            .collect()
    }

    /// Predicted ratings for catalog movies the target has not rated
    pub fn predict(
        &self,
        view: &RatingView<'_>,
        target: &UserRatings,
        neighbours: &[(UserId, f64)],
    ) -> BTreeMap<MovieId, f64> {
        // movie -> (weighted rating sum, similarity sum)
        let mut accumulated: BTreeMap<MovieId, (f64, f64)> = BTreeMap::new();

        for &(other_id, sim) in neighbours {
            let Some(other) = view.ratings().get(&other_id) else {
                continue;
            };
            for (&movie_id, &rating) in other {
                if target.contains_key(&movie_id) || !view.catalog().contains(movie_id) {
                    continue;
                }
                let entry = accumulated.entry(movie_id).or_insert((0.0, 0.0));
                entry.0 += sim * rating;
                entry.1 += sim;
            }
        }

        accumulated
            .into_iter()
            .filter(|(_, (_, weight))| *weight > 0.0)
            .map(|(movie_id, (weighted, weight))| (movie_id, weighted / weight))
            .collect()
    }

    /// Recommend up to `k` unrated movies for a user
    #[instrument(skip(self, view, rng))]
    pub fn recommend(
        &self,
        view: &RatingView<'_>,
        user_id: UserId,
        k: usize,
        rng: &mut dyn RandomSource,
    ) -> Recommendations {
        let Some(target) = view.user_ratings(user_id) else {
            debug!("User {} has no ratings, falling back to random picks", user_id);
            return Recommendations::random(random_movies(view.catalog(), k, |_| false, rng));
        };

        let neighbours = self.neighbours(view, user_id, target);
        debug!("Found {} positively similar users", neighbours.len());

        let predictions = self.predict(view, target, &neighbours);
        let mut movie_ids = top_k(predictions, k);

        let padded = pad_with_random(
            &mut movie_ids,
            k,
            view.catalog(),
            |id| target.contains_key(&id),
            rng,
        );
        let provenance = if padded > 0 {
            debug!(
                "Only {} predictions for user {}, padded {} random movies",
                movie_ids.len() - padded,
                user_id,
                padded
            );
            Provenance::Padded { padded }
        } else {
            Provenance::Ranked
        };

        debug!("Generated {} collaborative recommendations", movie_ids.len());
        Recommendations {
            movie_ids,
            provenance,
        }
    }
}

impl Default for CollaborativeRecommender {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;
    use data_loader::{Catalog, Movie, RatingMatrix};
    use std::collections::HashSet;

    fn create_test_catalog(n: u32) -> Catalog {
        (1..=n)
            .map(|id| Movie::new(id, format!("Movie {}", id), &["Action"]))
            .collect()
    }

    fn create_test_ratings() -> RatingMatrix {
        let mut ratings = RatingMatrix::new();
        // User 1 - target: rated 1, 2, 3
        for movie_id in 1..=3 {
            ratings.entry(1).or_default().insert(movie_id, 5.0);
        }
        // User 2 - agrees on 1..3, loves 4, dislikes 5
        let u2 = ratings.entry(2).or_default();
        for movie_id in 1..=3 {
            u2.insert(movie_id, 5.0);
        }
        u2.insert(4, 5.0);
        u2.insert(5, 1.0);
        // User 3 - shares nothing with user 1
        ratings.entry(3).or_default().insert(6, 4.0);
        ratings
    }

    #[test]
    fn test_neighbours_positive_only() {
        let catalog = create_test_catalog(10);
        let ratings = create_test_ratings();
        let view = RatingView::new(&catalog, &ratings);
        let recommender = CollaborativeRecommender::new();

        let neighbours = recommender.neighbours(&view, 1, &ratings[&1]);

        assert_eq!(neighbours, vec![(2, 1.0)]);
    }

    #[test]
    fn test_predict_weighted_average() {
        let catalog = create_test_catalog(10);
        let mut ratings = create_test_ratings();
        // User 4 rates movie 4 low and agrees with user 1 only half-way on movie 1
        let u4 = ratings.entry(4).or_default();
        u4.insert(1, 2.5);
        u4.insert(4, 2.0);
        let view = RatingView::new(&catalog, &ratings);
        let recommender = CollaborativeRecommender::new();

        let neighbours = recommender.neighbours(&view, 1, &ratings[&1]);
        let predictions = recommender.predict(&view, &ratings[&1], &neighbours);

        // sim(1,2) = 1.0, sim(1,4) = 0.5 -> (1.0*5 + 0.5*2) / 1.5 = 4.0
        assert!((predictions[&4] - 4.0).abs() < 1e-12);
        assert!((predictions[&5] - 1.0).abs() < 1e-12);
        // movie 6 only rated by a non-neighbour: no prediction, not zero
        assert!(!predictions.contains_key(&6));
        // already rated movies are never predicted
        assert!(!predictions.contains_key(&1));
    }

    #[test]
    fn test_recommend_pads_with_unrated_randoms() {
        let catalog = create_test_catalog(10);
        let ratings = create_test_ratings();
        let view = RatingView::new(&catalog, &ratings);

        let recs = CollaborativeRecommender::new().recommend(&view, 1, 5, &mut seeded(42));

        assert_eq!(recs.len(), 5);
        assert_eq!(&recs.movie_ids[..2], &[4, 5]);
        assert_eq!(recs.provenance, Provenance::Padded { padded: 3 });
        let unique: HashSet<_> = recs.iter().collect();
        assert_eq!(unique.len(), 5);
        assert!(recs.iter().all(|id| !ratings[&1].contains_key(&id)));
    }

    #[test]
    fn test_recommend_ranked_when_enough_predictions() {
        let catalog = create_test_catalog(10);
        let ratings = create_test_ratings();
        let view = RatingView::new(&catalog, &ratings);

        let recs = CollaborativeRecommender::new().recommend(&view, 1, 1, &mut seeded(42));
        assert_eq!(recs.movie_ids, vec![4]);
        assert_eq!(recs.provenance, Provenance::Ranked);
    }

    #[test]
    fn test_rating_scale_changes_neighbours() {
        let catalog = create_test_catalog(2);
        let mut ratings = RatingMatrix::new();
        ratings.entry(1).or_default().insert(1, 5.0);
        let u2 = ratings.entry(2).or_default();
        u2.insert(1, 0.0);
        u2.insert(2, 5.0);
        let view = RatingView::new(&catalog, &ratings);

        // a full 5-point gap is no similarity on 0..=5, but half on 0..=10
        let narrow = CollaborativeRecommender::new().recommend(&view, 1, 1, &mut seeded(1));
        assert_eq!(narrow.provenance, Provenance::Padded { padded: 1 });

        let wide = CollaborativeRecommender::new()
            .with_max_rating(10.0)
            .recommend(&view, 1, 1, &mut seeded(1));
        assert_eq!(wide.movie_ids, vec![2]);
        assert_eq!(wide.provenance, Provenance::Ranked);
    }

    #[test]
    fn test_unknown_user_gets_random_fallback() {
        let catalog = create_test_catalog(10);
        let ratings = create_test_ratings();
        let view = RatingView::new(&catalog, &ratings);

        let recs = CollaborativeRecommender::new().recommend(&view, 99, 4, &mut seeded(42));
        assert_eq!(recs.len(), 4);
        assert_eq!(recs.provenance, Provenance::Random);
    }
}
