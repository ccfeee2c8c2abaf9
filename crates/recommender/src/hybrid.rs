//! Hybrid Blender - position-based merge of content and collaborative lists
//!
//! Both recommenders are asked for `k` movies. Each list position is turned
//! into a score on a linear scale (`max_rating`, 5.0 by default, at the top,
//! dropping by `max_rating / k` per slot), so the blend rewards rank rather
//! than raw score magnitude. A movie missing from one list scores 0 there. The two position scores are combined
//! as a weighted average; if the weights sum to <= 0 the sum is replaced by
//! 1.0 instead of dividing by zero.

use crate::collaborative::CollaborativeRecommender;
use crate::content::ContentRecommender;
use crate::random::{RandomSource, pad_with_random};
use crate::ranking::{position_score, top_k};
use crate::types::{HybridWeights, Provenance, RatingView, Recommendations};
use data_loader::{MAX_RATING, MovieId, UserId};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct HybridRecommender {
    content: ContentRecommender,
    collaborative: CollaborativeRecommender,
    /// Score of the first list position
    max_rating: f64,
}

impl HybridRecommender {
    pub fn new(content: ContentRecommender, collaborative: CollaborativeRecommender) -> Self {
        Self {
            content,
            collaborative,
            max_rating: MAX_RATING,
        }
    }

    /// Configure the top position score (default: 5.0)
    pub fn with_max_rating(mut self, max_rating: f64) -> Self {
        self.max_rating = max_rating;
        self
    }

    pub fn content(&self) -> &ContentRecommender {
        &self.content
    }

    pub fn collaborative(&self) -> &CollaborativeRecommender {
        &self.collaborative
    }

    /// Position score for every movie in a list
    fn position_scores(&self, list: &Recommendations, k: usize) -> BTreeMap<MovieId, f64> {
        list.iter()
            .enumerate()
            .map(|(pos, movie_id)| (movie_id, position_score(pos, k, self.max_rating)))
            .collect()
    }

    /// Blend content and collaborative recommendations into one list of up to `k`
    #[instrument(skip(self, view, rng))]
    pub fn recommend(
        &self,
        view: &RatingView<'_>,
        user_id: UserId,
        k: usize,
        weights: HybridWeights,
        rng: &mut dyn RandomSource,
    ) -> Recommendations {
        let content_list = self.content.recommend(view, user_id, k, rng);
        let collab_list = self.collaborative.recommend(view, user_id, k, rng);
        debug!(
            "Blending content ({:?}, {}) and collaborative ({:?}, {}) lists",
            content_list.provenance,
            content_list.len(),
            collab_list.provenance,
            collab_list.len()
        );

        let content_scores = self.position_scores(&content_list, k);
        let collab_scores = self.position_scores(&collab_list, k);
        let normalizer = weights.normalizer();

        let mut combined: BTreeMap<MovieId, f64> = BTreeMap::new();
        for &movie_id in content_scores.keys().chain(collab_scores.keys()) {
            combined.entry(movie_id).or_insert_with(|| {
                let cs = content_scores.get(&movie_id).copied().unwrap_or(0.0);
                let rs = collab_scores.get(&movie_id).copied().unwrap_or(0.0);
                (weights.content * cs + weights.collaborative * rs) / normalizer
            });
        }

        let mut movie_ids = top_k(combined, k);

        let rated = view.user_ratings(user_id);
        let padded = pad_with_random(
            &mut movie_ids,
            k,
            view.catalog(),
            |id| rated.is_some_and(|r| r.contains_key(&id)),
            rng,
        );

        let provenance = if content_list.provenance == Provenance::Random
            && collab_list.provenance == Provenance::Random
        {
            Provenance::Random
        } else if padded > 0 {
            Provenance::Padded { padded }
        } else {
            Provenance::Ranked
        };

        debug!("Generated {} hybrid recommendations", movie_ids.len());
        Recommendations {
            movie_ids,
            provenance,
        }
    }
}

impl Default for HybridRecommender {
    fn default() -> Self {
        Self::new(ContentRecommender::default(), CollaborativeRecommender::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded;
    use data_loader::{Catalog, Movie, RatingMatrix};
    use std::collections::HashSet;

    /// Content favours dramas, collaborative favours what user 2 liked
    fn create_test_data() -> (Catalog, RatingMatrix) {
        let catalog: Catalog = [
            Movie::new(1, "Seen Drama", &["Drama"]),
            Movie::new(2, "Other Drama", &["Drama"]),
            Movie::new(3, "Comedy", &["Comedy"]),
            Movie::new(4, "Thriller", &["Thriller"]),
            Movie::new(5, "Horror", &["Horror"]),
        ]
        .into_iter()
        .collect();

        let mut ratings = RatingMatrix::new();
        ratings.entry(1).or_default().insert(1, 5.0);
        let u2 = ratings.entry(2).or_default();
        u2.insert(1, 5.0);
        u2.insert(4, 5.0);
        u2.insert(3, 2.0);
        (catalog, ratings)
    }

    #[test]
    fn test_weights_steer_the_blend() {
        let (catalog, ratings) = create_test_data();
        let view = RatingView::new(&catalog, &ratings);
        let hybrid = HybridRecommender::default();

        let content_heavy = hybrid.recommend(&view, 1, 2, HybridWeights::new(1.0, 0.0), &mut seeded(42));
        assert_eq!(content_heavy.movie_ids[0], 2);

        let collab_heavy = hybrid.recommend(&view, 1, 2, HybridWeights::new(0.0, 1.0), &mut seeded(42));
        assert_eq!(collab_heavy.movie_ids[0], 4);
    }

    #[test]
    fn test_position_scores_follow_rating_scale() {
        let list = Recommendations::ranked(vec![7, 3]);

        let default_scores = HybridRecommender::default().position_scores(&list, 2);
        assert_eq!(default_scores[&7], 5.0);
        assert_eq!(default_scores[&3], 2.5);

        let wide = HybridRecommender::default().with_max_rating(10.0);
        let scores = wide.position_scores(&list, 2);
        assert_eq!(scores[&7], 10.0);
        assert_eq!(scores[&3], 5.0);
    }

    #[test]
    fn test_zero_weights_do_not_divide_by_zero() {
        let (catalog, ratings) = create_test_data();
        let view = RatingView::new(&catalog, &ratings);

        let recs = HybridRecommender::default().recommend(
            &view,
            1,
            3,
            HybridWeights::new(0.0, 0.0),
            &mut seeded(42),
        );

        // every combined score is 0, so the ids come out in ascending order
        assert_eq!(recs.len(), 3);
        let mut sorted = recs.movie_ids.clone();
        sorted.sort_unstable();
        assert_eq!(recs.movie_ids, sorted);
        assert!(!recs.contains(1));
    }

    #[test]
    fn test_no_duplicates_and_length() {
        let (catalog, ratings) = create_test_data();
        let view = RatingView::new(&catalog, &ratings);

        let recs = HybridRecommender::default().recommend(
            &view,
            1,
            4,
            HybridWeights::default(),
            &mut seeded(7),
        );

        assert_eq!(recs.len(), 4);
        let unique: HashSet<_> = recs.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_unknown_user_is_random() {
        let (catalog, ratings) = create_test_data();
        let view = RatingView::new(&catalog, &ratings);

        let recs = HybridRecommender::default().recommend(
            &view,
            42,
            3,
            HybridWeights::default(),
            &mut seeded(1),
        );

        assert_eq!(recs.len(), 3);
        assert_eq!(recs.provenance, Provenance::Random);
    }
}
