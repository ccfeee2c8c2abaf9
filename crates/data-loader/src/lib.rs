//! # Data Loader Crate
//!
//! Loads the movie catalog and rating matrix that feed the recommendation
//! engine.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Movie, Catalog, RatingMatrix, Dataset)
//! - **parser**: Parse MovieLens .dat files
//! - **source**: The `DataSource` trait plus file-backed and synthetic sources
//! - **dataset**: Parallel loading and integrity checks
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{Dataset, DatFileSource};
//!
//! let dataset = Dataset::load(&DatFileSource::new("data/ml-1m"))?;
//! let (users, movies, ratings) = dataset.counts();
//! println!("{} users rated {} of {} movies", users, ratings, movies);
//! ```

pub mod dataset;
pub mod error;
pub mod parser;
pub mod source;
pub mod types;

pub use dataset::MAX_RATING;
pub use error::{DataLoadError, Result};
pub use source::{DatFileSource, DataSource, SyntheticSource};
pub use types::{
    // Type aliases
    MovieId,
    RatingMatrix,
    UserId,
    UserRatings,
    // Core types
    Catalog,
    Dataset,
    Movie,
    Rating,
    build_rating_matrix,
};
