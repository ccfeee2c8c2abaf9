//! Dataset loading and validation.
//!
//! - Load catalog and ratings from any [`DataSource`], in parallel
//! - Validate that every rating is usable by the engine

use crate::error::{DataLoadError, Result};
use crate::source::DataSource;
use crate::types::*;
use tracing::info;

/// Highest rating value the engine's scales are built around
pub const MAX_RATING: f64 = 5.0;

impl Dataset {
    /// Load a complete dataset from a source.
    ///
    /// Steps:
    /// 1. Load catalog and ratings in parallel (`rayon::join`)
    /// 2. Validate data integrity
    pub fn load(source: &impl DataSource) -> Result<Self> {
        info!("Loading dataset from source '{}'", source.name());

        let (catalog, ratings) = rayon::join(|| source.load_catalog(), || source.load_ratings());
        let dataset = Dataset::new(catalog?, ratings?);

        dataset.validate()?;

        let (users, movies, ratings) = dataset.counts();
        info!(
            "Loaded {} movies and {} ratings for {} users",
            movies, ratings, users
        );
        Ok(dataset)
    }

    /// Validate data integrity
    ///
    /// Check that:
    /// - All rated movie ids exist in the catalog
    /// - Ratings are finite and in range (0.0 - 5.0)
    pub fn validate(&self) -> Result<()> {
        for user_ratings in self.ratings.values() {
            for (&movie_id, &rating) in user_ratings {
                if !self.catalog.contains(movie_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Movie".to_string(),
                        id: movie_id,
                    });
                }
                if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
                    return Err(DataLoadError::InvalidValue {
                        field: "rating".to_string(),
                        value: rating.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
