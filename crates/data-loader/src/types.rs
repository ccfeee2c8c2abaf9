//! Core domain types for the MovieLens dataset.
//!
//! The recommendation engine only ever sees two things: a movie catalog and a
//! sparse rating matrix. Both are ordered maps so that iterating them (and
//! therefore every random draw made while iterating them) is reproducible.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

/// One user's ratings, keyed by movie
pub type UserRatings = BTreeMap<MovieId, f64>;

/// Sparse user -> (movie -> rating) matrix.
///
/// A missing entry means "unrated", which is not the same thing as a rating of 0.
pub type RatingMatrix = BTreeMap<UserId, UserRatings>;

// =============================================================================
// Movie-related Types
// =============================================================================

/// Represents a movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre labels in the order the source listed them (may be empty)
    pub genres: Vec<String>,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>, genres: &[&str]) -> Self {
        Self {
            id,
            title: title.into(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }
}

/// A single rating row as it comes out of a data file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f64,
}

// =============================================================================
// Catalog
// =============================================================================

/// All known movies, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    movies: BTreeMap<MovieId, Movie>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a movie
    pub fn insert(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.movies.contains_key(&id)
    }

    /// Title lookup, used for display
    pub fn title(&self, id: MovieId) -> Option<&str> {
        self.movies.get(&id).map(|m| m.title.as_str())
    }

    /// Genres of a movie, empty for unknown ids
    pub fn genres(&self, id: MovieId) -> &[String] {
        self.movies
            .get(&id)
            .map(|m| m.genres.as_slice())
            .unwrap_or(&[])
    }

    /// Movie ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.movies.keys().copied()
    }

    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

impl FromIterator<Movie> for Catalog {
    fn from_iter<I: IntoIterator<Item = Movie>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for movie in iter {
            catalog.insert(movie);
        }
        catalog
    }
}

// =============================================================================
// Dataset - catalog plus ratings
// =============================================================================

/// Everything a loader hands to the engine.
///
/// Built once at load time and treated as immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub catalog: Catalog,
    pub ratings: RatingMatrix,
}

impl Dataset {
    pub fn new(catalog: Catalog, ratings: RatingMatrix) -> Self {
        Self { catalog, ratings }
    }

    /// Ratings made by a user, if any
    pub fn user_ratings(&self, user_id: UserId) -> Option<&UserRatings> {
        self.ratings.get(&user_id)
    }

    /// Get counts for debugging/validation: (users, movies, ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_ratings = self.ratings.values().map(|r| r.len()).sum();
        (self.ratings.len(), self.catalog.len(), total_ratings)
    }
}

/// Fold rating rows into a matrix. Later rows for the same (user, movie) win.
pub fn build_rating_matrix(rows: impl IntoIterator<Item = Rating>) -> RatingMatrix {
    let mut matrix = RatingMatrix::new();
    for row in rows {
        matrix
            .entry(row.user_id)
            .or_default()
            .insert(row.movie_id, row.rating);
    }
    matrix
}
