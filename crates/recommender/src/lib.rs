//! # Recommender Crate
//!
//! Content-based, collaborative and hybrid movie recommendations over a
//! [`data_loader::Dataset`], plus offline evaluation of the hybrid weights.
//!
//! ## Components
//!
//! ### Content-Based Recommender
//! Genre affinity from the user's centered ratings:
//! - "You liked these genres, here are more movies in them"
//!
//! ### Collaborative Recommender
//! Similarity-weighted rating prediction from like-minded users:
//! - "Users who rate like you rated these highly"
//!
//! ### Hybrid Blender
//! Weighted merge of both lists by list position
//!
//! ### Evaluation
//! Train/test split, MAE of a weighting, and a grid search over weight pairs
//!
//! Users without history never cause an error: they get a random list tagged
//! with [`Provenance::Random`], and short ranked lists are padded with
//! random unrated movies ([`Provenance::Padded`]).
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::SyntheticSource;
//! use recommender::{EngineConfig, RecommendationEngine};
//!
//! let mut engine = RecommendationEngine::load(&SyntheticSource::default(), EngineConfig::default())?;
//!
//! let recs = engine.hybrid_recommendation(1, 10, 0.5, 0.5);
//! let report = engine.run_optimization()?;
//! if let Some(best) = report.best {
//!     println!("best weights: {:?}", best.weights);
//! }
//! ```

pub mod benchmark;
pub mod collaborative;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod hybrid;
pub mod random;
pub mod ranking;
pub mod similarity;
pub mod types;

// Re-export commonly used types
pub use benchmark::{BenchmarkReport, Overlap, Timings};
pub use collaborative::CollaborativeRecommender;
pub use config::{DEFAULT_WEIGHT_GRID, EngineConfig};
pub use content::ContentRecommender;
pub use engine::RecommendationEngine;
pub use error::{EngineError, Result};
pub use evaluation::{Evaluator, GridPoint, GridSearch, OptimizationReport, TrainTestSplit};
pub use hybrid::HybridRecommender;
pub use random::RandomSource;
pub use similarity::user_similarity;
pub use types::{HybridWeights, Provenance, RatingView, Recommendations};
