//! User-user similarity from co-rated movies.
//!
//! Each movie both users rated contributes a closeness score
//! `(5 - |rA - rB|) / 5`: 1.0 for identical ratings, 0.0 for ratings a full
//! scale apart. Similarity is the mean over the co-rated set. Users with
//! nothing in common get 0.0, meaning "no evidence", not "opposites".

use data_loader::{MAX_RATING, UserRatings};

/// Similarity in `[0, 1]` between two users' ratings on the 0..=5 scale
pub fn user_similarity(a: &UserRatings, b: &UserRatings) -> f64 {
    scaled_user_similarity(a, b, MAX_RATING)
}

/// Similarity on a `0..=max_rating` scale
pub fn scaled_user_similarity(a: &UserRatings, b: &UserRatings, max_rating: f64) -> f64 {
    let mut total = 0.0;
    let mut co_rated = 0usize;

    for (movie_id, &rating_a) in a {
        if let Some(&rating_b) = b.get(movie_id) {
            let closeness = (max_rating - (rating_a - rating_b).abs()) / max_rating;
            total += closeness.clamp(0.0, 1.0);
            co_rated += 1;
        }
    }

    if co_rated == 0 {
        0.0
    } else {
        total / co_rated as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(pairs: &[(u32, f64)]) -> UserRatings {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_identical_ratings() {
        let u1 = ratings(&[(1, 5.0), (2, 3.0)]);
        let u2 = ratings(&[(1, 5.0), (2, 3.0)]);
        assert_eq!(user_similarity(&u1, &u2), 1.0);
    }

    #[test]
    fn test_self_similarity() {
        let u = ratings(&[(1, 1.0), (7, 4.5), (9, 2.0)]);
        assert_eq!(user_similarity(&u, &u), 1.0);
    }

    #[test]
    fn test_no_overlap_is_zero() {
        let u1 = ratings(&[(1, 5.0)]);
        let u2 = ratings(&[(2, 5.0)]);
        assert_eq!(user_similarity(&u1, &u2), 0.0);
        assert_eq!(user_similarity(&u1, &UserRatings::new()), 0.0);
    }

    #[test]
    fn test_mean_over_co_rated_only() {
        // movie 1: |5-1| = 4 -> 0.2, movie 2: identical -> 1.0, movie 3 not shared
        let u1 = ratings(&[(1, 5.0), (2, 3.0), (3, 4.0)]);
        let u2 = ratings(&[(1, 1.0), (2, 3.0), (4, 2.0)]);
        let sim = user_similarity(&u1, &u2);
        assert!((sim - 0.6).abs() < 1e-12);
        assert_eq!(sim, user_similarity(&u2, &u1));
    }

    #[test]
    fn test_wider_scale_softens_differences() {
        // |5-1| = 4 on a 0..=10 scale -> (10 - 4) / 10
        let u1 = ratings(&[(1, 5.0)]);
        let u2 = ratings(&[(1, 1.0)]);
        assert!((scaled_user_similarity(&u1, &u2, 10.0) - 0.6).abs() < 1e-12);
        assert_eq!(scaled_user_similarity(&u1, &u2, MAX_RATING), user_similarity(&u1, &u2));
    }

    #[test]
    fn test_bounds() {
        let extremes = [0.0, 0.5, 2.5, 5.0];
        for &a in &extremes {
            for &b in &extremes {
                let sim = user_similarity(&ratings(&[(1, a)]), &ratings(&[(1, b)]));
                assert!((0.0..=1.0).contains(&sim), "{a} vs {b} gave {sim}");
            }
        }
        assert_eq!(user_similarity(&ratings(&[(1, 0.0)]), &ratings(&[(1, 5.0)])), 0.0);
    }
}
