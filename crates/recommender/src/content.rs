//! Content-Based Recommender - genre affinity scoring
//!
//! "You liked these genres, here are more movies in them"
//!
//! ## Algorithm
//! 1. Center each of the user's ratings on the midpoint (default 2.5), so a 5
//!    contributes +2.5 and a 1 contributes -1.5
//! 2. Add the centered rating to an affinity total for every genre of the
//!    rated movie
//! 3. Score each unrated movie as the sum of its genres' affinities
//! 4. Return the top k (ties by ascending movie id)
//!
//! Users without ratings get a random list tagged [`Provenance::Random`].

use crate::random::{RandomSource, random_movies};
use crate::ranking::top_k;
use crate::types::{Provenance, RatingView, Recommendations};
use data_loader::{MovieId, UserId, UserRatings};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct ContentRecommender {
    /// Ratings above this count for a genre, below it against
    rating_midpoint: f64,
}

impl ContentRecommender {
    pub fn new() -> Self {
        Self {
            rating_midpoint: 2.5,
        }
    }

    /// Configure the centering midpoint (default: 2.5)
    pub fn with_rating_midpoint(mut self, midpoint: f64) -> Self {
        self.rating_midpoint = midpoint;
        self
    }

    /// Per-genre affinity built from a user's rating history.
    ///
    /// Empty for users without ratings.
    pub fn genre_affinity(&self, view: &RatingView<'_>, user_id: UserId) -> BTreeMap<String, f64> {
        view.user_ratings(user_id)
            .map(|ratings| self.affinity_from(view, ratings))
            .unwrap_or_default()
    }

    fn affinity_from(&self, view: &RatingView<'_>, ratings: &UserRatings) -> BTreeMap<String, f64> {
        let mut affinity: BTreeMap<String, f64> = BTreeMap::new();
        for (&movie_id, &rating) in ratings {
            let centered = rating - self.rating_midpoint;
            for genre in view.catalog().genres(movie_id) {
                *affinity.entry(genre.clone()).or_insert(0.0) += centered;
            }
        }
        affinity
    }

    /// Score every catalog movie the user has not rated
    fn score_unrated(
        &self,
        view: &RatingView<'_>,
        ratings: &UserRatings,
        affinity: &BTreeMap<String, f64>,
    ) -> Vec<(MovieId, f64)> {
        view.catalog()
            .movies()
            .filter(|movie| !ratings.contains_key(&movie.id))
            .map(|movie| {
                let score: f64 = movie
                    .genres
                    .iter()
                    .map(|g| affinity.get(g).copied().unwrap_or(0.0))
                    .sum();
                (movie.id, score)
            })
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
        let Some(ratings) = view.user_ratings(user_id) else {
            debug!("User {} has no ratings, falling back to random picks", user_id);
            return Recommendations::random(random_movies(view.catalog(), k, |_| false, rng));
        };

        let affinity = self.affinity_from(view, ratings);
        debug!(
            "User {} rated {} movies spanning {} genres",
            user_id,
            ratings.len(),
            affinity.len()
        );

        let scores = self.score_unrated(view, ratings, &affinity);
        let movie_ids = top_k(scores, k);

        debug!("Generated {} content-based recommendations", movie_ids.len());
        Recommendations {
            movie_ids,
            provenance: Provenance::Ranked,
        }
    }
}

impl Default for ContentRecommender {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;
    use data_loader::{Catalog, Movie, RatingMatrix};

    fn create_test_catalog() -> Catalog {
        [
            Movie::new(1, "A", &["Drama"]),
            Movie::new(2, "B", &["Comedy"]),
            Movie::new(3, "C", &["Drama"]),
        ]
        .into_iter()
        .collect()
    }

    fn single_rating(user_id: UserId, movie_id: MovieId, rating: f64) -> RatingMatrix {
        let mut ratings = RatingMatrix::new();
        ratings.entry(user_id).or_default().insert(movie_id, rating);
        ratings
    }

    #[test]
    fn test_shared_genre_ranks_first() {
        let catalog = create_test_catalog();
        let ratings = single_rating(1, 1, 5.0);
        let view = RatingView::new(&catalog, &ratings);

        let recs = ContentRecommender::new().recommend(&view, 1, 2, &mut seeded(42));

        assert_eq!(recs.movie_ids, vec![3, 2]);
        assert_eq!(recs.provenance, Provenance::Ranked);
    }

    #[test]
    fn test_negative_affinity_sinks() {
        let catalog = create_test_catalog();
        // Disliking a drama pushes the other drama below the neutral comedy
        let ratings = single_rating(1, 1, 1.0);
        let view = RatingView::new(&catalog, &ratings);

        let recs = ContentRecommender::new().recommend(&view, 1, 2, &mut seeded(42));
        assert_eq!(recs.movie_ids, vec![2, 3]);
    }

    #[test]
    fn test_genre_affinity() {
        let catalog: Catalog = [
            Movie::new(1, "Action Movie", &["Action", "Adventure"]),
            Movie::new(2, "Drama Movie", &["Drama"]),
            Movie::new(3, "Action Movie 2", &["Action", "Sci-Fi"]),
        ]
        .into_iter()
        .collect();
        let mut ratings = RatingMatrix::new();
        let user = ratings.entry(1).or_default();
        user.insert(1, 5.0);
        user.insert(2, 3.0);
        user.insert(3, 4.5);
        let view = RatingView::new(&catalog, &ratings);

        let affinity = ContentRecommender::new().genre_affinity(&view, 1);

        // Action: (5.0 - 2.5) + (4.5 - 2.5) = 4.5
        assert!((affinity["Action"] - 4.5).abs() < 1e-12);
        assert!((affinity["Drama"] - 0.5).abs() < 1e-12);
        assert!((affinity["Adventure"] - 2.5).abs() < 1e-12);
        assert!((affinity["Sci-Fi"] - 2.0).abs() < 1e-12);
        assert!(ContentRecommender::new().genre_affinity(&view, 99).is_empty());
    }

    #[test]
    fn test_custom_midpoint() {
        let catalog = create_test_catalog();
        let ratings = single_rating(1, 1, 3.0);
        let view = RatingView::new(&catalog, &ratings);

        let recommender = ContentRecommender::new().with_rating_midpoint(4.0);
        assert!((recommender.genre_affinity(&view, 1)["Drama"] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_user_gets_random_fallback() {
        let catalog = create_test_catalog();
        let ratings = RatingMatrix::new();
        let view = RatingView::new(&catalog, &ratings);

        let recs = ContentRecommender::new().recommend(&view, 7, 2, &mut seeded(42));
        assert_eq!(recs.len(), 2);
        assert_eq!(recs.provenance, Provenance::Random);
        assert!(recs.iter().all(|id| catalog.contains(id)));
    }

    #[test]
    fn test_excludes_rated_and_bounds_length() {
        let catalog = create_test_catalog();
        let ratings = single_rating(1, 1, 4.0);
        let view = RatingView::new(&catalog, &ratings);

        let recs = ContentRecommender::new().recommend(&view, 1, 10, &mut seeded(42));
        // only two unrated movies exist
        assert_eq!(recs.len(), 2);
        assert!(!recs.contains(1));
    }
}
