//! Engine configuration.
//!
//! Every tunable number the recommenders and the evaluator use lives here.
//! The CLI reads an optional JSON file into this struct and then overrides
//! individual fields from command-line flags.

use crate::error::{EngineError, Result};
use data_loader::MAX_RATING;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default weight grid searched by `run_optimization`
pub const DEFAULT_WEIGHT_GRID: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine's random source and the per-point grid RNGs
    pub seed: u64,

    /// Ratings above this add positive genre affinity, below it negative
    pub rating_midpoint: f64,

    /// Top of the rating scale. Bounds rating closeness in the similarity,
    /// the hybrid blend's position scores and the evaluator's predictions.
    pub max_rating: f64,

    /// Users with fewer ratings are left out of the train/test split
    pub min_ratings_for_split: usize,

    /// Test users need at least this many training ratings to be evaluated
    pub min_training_ratings: usize,

    /// Length of the hybrid list requested per user during evaluation
    pub evaluation_list_len: usize,

    /// Predicted rating for held-out movies missing from the list, within
    /// `[0, max_rating]`
    pub neutral_prediction: f64,

    /// Fraction of each user's ratings held out for testing
    pub test_ratio: f64,

    pub content_weights: Vec<f64>,
    pub collab_weights: Vec<f64>,

    /// Evaluate grid points on the rayon pool instead of one by one
    pub parallel_grid: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rating_midpoint: 2.5,
            max_rating: MAX_RATING,
            min_ratings_for_split: 10,
            min_training_ratings: 5,
            evaluation_list_len: 100,
            neutral_prediction: 2.5,
            test_ratio: 0.2,
            content_weights: DEFAULT_WEIGHT_GRID.to_vec(),
            collab_weights: DEFAULT_WEIGHT_GRID.to_vec(),
            parallel_grid: false,
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigFile {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_test_ratio(mut self, test_ratio: f64) -> Self {
        self.test_ratio = test_ratio;
        self
    }

    pub fn with_weight_grid(mut self, content: Vec<f64>, collab: Vec<f64>) -> Self {
        self.content_weights = content;
        self.collab_weights = collab;
        self
    }

    pub fn with_parallel_grid(mut self, parallel: bool) -> Self {
        self.parallel_grid = parallel;
        self
    }

    pub fn with_evaluation_list_len(mut self, len: usize) -> Self {
        self.evaluation_list_len = len;
        self
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        check_test_ratio(self.test_ratio)?;
        if !(self.max_rating.is_finite() && self.max_rating > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "max_rating must be positive, got {}",
                self.max_rating
            )));
        }
        if !self.rating_midpoint.is_finite() || !self.neutral_prediction.is_finite() {
            return Err(EngineError::InvalidConfig(
                "rating_midpoint and neutral_prediction must be finite".to_string(),
            ));
        }
        if !(0.0..=self.max_rating).contains(&self.neutral_prediction) {
            return Err(EngineError::InvalidConfig(format!(
                "neutral_prediction must be within [0, {}], got {}",
                self.max_rating, self.neutral_prediction
            )));
        }
        if self.evaluation_list_len == 0 {
            return Err(EngineError::InvalidConfig(
                "evaluation_list_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn check_test_ratio(test_ratio: f64) -> Result<()> {
    if (0.0..=1.0).contains(&test_ratio) {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig(format!(
            "test_ratio must be within [0, 1], got {}",
            test_ratio
        )))
    }
}
