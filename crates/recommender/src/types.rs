//! Shared types for the recommenders.

use data_loader::{Catalog, Dataset, MovieId, RatingMatrix, UserId, UserRatings};
use serde::Serialize;

/// The catalog plus whichever rating matrix is currently in effect.
///
/// Recommenders never reach for global data: they are handed a view. Normal
/// calls build it over the full ratings, evaluation builds it over the
/// training half of a split. The view only lives as long as the borrow, so
/// there is nothing to restore afterwards.
#[derive(Debug, Clone, Copy)]
pub struct RatingView<'a> {
    catalog: &'a Catalog,
    ratings: &'a RatingMatrix,
}

impl<'a> RatingView<'a> {
    pub fn new(catalog: &'a Catalog, ratings: &'a RatingMatrix) -> Self {
        Self { catalog, ratings }
    }

    /// View over a dataset's full ratings
    pub fn of(dataset: &'a Dataset) -> Self {
        Self::new(&dataset.catalog, &dataset.ratings)
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn ratings(&self) -> &'a RatingMatrix {
        self.ratings
    }

    /// A user's ratings, or `None` if the user is unknown or has rated nothing
    pub fn user_ratings(&self, user_id: UserId) -> Option<&'a UserRatings> {
        self.ratings.get(&user_id).filter(|r| !r.is_empty())
    }
}

/// Where the ids in a recommendation list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Provenance {
    /// Every id was ranked by a score
    Ranked,
    /// Ranked ids followed by `padded` random ids because too few could be scored
    Padded { padded: usize },
    /// No usable history; the whole list is random
    Random,
}

/// Ordered, duplicate-free list of recommended movies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub movie_ids: Vec<MovieId>,
    pub provenance: Provenance,
}

impl Recommendations {
    pub fn ranked(movie_ids: Vec<MovieId>) -> Self {
        Self {
            movie_ids,
            provenance: Provenance::Ranked,
        }
    }

    pub fn random(movie_ids: Vec<MovieId>) -> Self {
        Self {
            movie_ids,
            provenance: Provenance::Random,
        }
    }

    pub fn len(&self) -> usize {
        self.movie_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movie_ids.is_empty()
    }

    /// True when any part of the list is random filler
    pub fn is_fallback(&self) -> bool {
        !matches!(self.provenance, Provenance::Ranked)
    }

    /// 0-indexed rank of a movie in the list
    pub fn position(&self, movie_id: MovieId) -> Option<usize> {
        self.movie_ids.iter().position(|&id| id == movie_id)
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.movie_ids.contains(&movie_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.movie_ids.iter().copied()
    }
}

/// Relative weights of the two recommenders inside the hybrid blend
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HybridWeights {
    pub content: f64,
    pub collaborative: f64,
}

impl HybridWeights {
    pub fn new(content: f64, collaborative: f64) -> Self {
        Self {
            content,
            collaborative,
        }
    }

    /// Denominator for the weighted blend; 1.0 when the weights sum to <= 0
    pub fn normalizer(&self) -> f64 {
        let sum = self.content + self.collaborative;
        if sum <= 0.0 { 1.0 } else { sum }
    }
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::Movie;

    #[test]
    fn test_view_hides_empty_users() {
        let catalog: Catalog = [Movie::new(1, "A", &[])].into_iter().collect();
        let mut ratings = RatingMatrix::new();
        ratings.insert(1, UserRatings::new());
        ratings.entry(2).or_default().insert(1, 4.0);

        let view = RatingView::new(&catalog, &ratings);
        assert!(view.user_ratings(1).is_none());
        assert!(view.user_ratings(2).is_some());
        assert!(view.user_ratings(3).is_none());
    }

    #[test]
    fn test_weight_normalizer() {
        assert_eq!(HybridWeights::new(0.2, 0.6).normalizer(), 0.8);
        assert_eq!(HybridWeights::new(0.0, 0.0).normalizer(), 1.0);
        assert_eq!(HybridWeights::new(-1.0, 0.5).normalizer(), 1.0);
    }

    #[test]
    fn test_recommendations_helpers() {
        let recs = Recommendations::ranked(vec![5, 3, 9]);
        assert_eq!(recs.position(3), Some(1));
        assert_eq!(recs.position(4), None);
        assert!(!recs.is_fallback());
        assert!(Recommendations::random(vec![1]).is_fallback());
    }
}
