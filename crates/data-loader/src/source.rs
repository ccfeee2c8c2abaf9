//! Data sources that can populate a [`Dataset`].
//!
//! The recommendation engine never cares where its data came from; it only
//! needs a catalog and a rating matrix. A `DataSource` is anything that can
//! produce both.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Supplies the movie catalog and the rating matrix.
///
/// `Send + Sync` so both halves can be loaded in parallel.
pub trait DataSource: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    fn load_catalog(&self) -> Result<Catalog>;

    fn load_ratings(&self) -> Result<RatingMatrix>;
}

// =============================================================================
// MovieLens .dat files
// =============================================================================

/// Reads `movies.dat` and `ratings.dat` from a MovieLens directory.
#[derive(Debug, Clone)]
pub struct DatFileSource {
    data_dir: PathBuf,
}

impl DatFileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

impl DataSource for DatFileSource {
    fn name(&self) -> &str {
        "movielens-dat"
    }

    fn load_catalog(&self) -> Result<Catalog> {
        let path = self.data_dir.join("movies.dat");
        debug!("Parsing catalog from {}", path.display());
        let movies = parser::parse_movies(&path)?;
        Ok(movies.into_iter().collect())
    }

    fn load_ratings(&self) -> Result<RatingMatrix> {
        let path = self.data_dir.join("ratings.dat");
        debug!("Parsing ratings from {}", path.display());
        let rows = parser::parse_ratings(&path)?;
        Ok(build_rating_matrix(rows))
    }
}

// =============================================================================
// Synthetic in-memory demo data
// =============================================================================

const SYNTHETIC_GENRES: [&str; 6] = ["Action", "Comedy", "Drama", "Sci-Fi", "Romance", "Thriller"];

/// Small reproducible dataset for demos, benches and tests.
///
/// Every movie gets one or two genres from a fixed pool and every user rates
/// 12 to 20 random movies with whole-star ratings (duplicate draws collapse,
/// so a user can end up with slightly fewer).
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    num_movies: u32,
    num_users: u32,
    seed: u64,
}

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        Self {
            num_movies: 100,
            num_users: 50,
            seed,
        }
    }

    /// Configure the catalog size (default: 100)
    pub fn with_movies(mut self, num_movies: u32) -> Self {
        self.num_movies = num_movies;
        self
    }

    /// Configure the number of users (default: 50)
    pub fn with_users(mut self, num_users: u32) -> Self {
        self.num_users = num_users;
        self
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(42)
    }
}

impl DataSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn load_catalog(&self) -> Result<Catalog> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let catalog = (1..=self.num_movies)
            .map(|id| {
                let genre_count = rng.random_range(1..=2);
                let genres = (0..genre_count)
                    .map(|_| SYNTHETIC_GENRES[rng.random_range(0..SYNTHETIC_GENRES.len())].to_string())
                    .collect();
                Movie {
                    id,
                    title: format!("Movie {}", id),
                    genres,
                }
            })
            .collect();
        Ok(catalog)
    }

    fn load_ratings(&self) -> Result<RatingMatrix> {
        // Separate stream from the catalog so the two can load in parallel.
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(1));
        let mut matrix = RatingMatrix::new();
        if self.num_movies == 0 {
            return Ok(matrix);
        }

        for user_id in 1..=self.num_users {
            let count = rng.random_range(12..=20);
            let ratings = matrix.entry(user_id).or_default();
            for _ in 0..count {
                let movie_id = rng.random_range(1..=self.num_movies);
                let rating = rng.random_range(1..=5) as f64;
                ratings.insert(movie_id, rating);
            }
        }
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_shape() {
        let source = SyntheticSource::default();
        let catalog = source.load_catalog().unwrap();
        let ratings = source.load_ratings().unwrap();

        assert_eq!(catalog.len(), 100);
        assert_eq!(ratings.len(), 50);
        for movie in catalog.movies() {
            assert!(!movie.genres.is_empty() && movie.genres.len() <= 2);
        }
        for user_ratings in ratings.values() {
            assert!(user_ratings.len() <= 20);
            assert!(user_ratings.keys().all(|id| catalog.contains(*id)));
            assert!(user_ratings.values().all(|r| (1.0..=5.0).contains(r)));
        }
    }

    #[test]
    fn test_synthetic_is_reproducible() {
        let a = SyntheticSource::new(7).load_ratings().unwrap();
        let b = SyntheticSource::new(7).load_ratings().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dat_source_missing_dir() {
        let source = DatFileSource::new("no/such/dir");
        assert!(source.load_catalog().is_err());
        assert!(source.load_ratings().is_err());
    }
}
