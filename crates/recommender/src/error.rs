//! Error types for the recommender crate.
//!
//! Sparse or missing data is never an error here (it falls back to random
//! lists or an undefined MAE). What remains is a dataset that failed to load
//! and configuration the engine cannot run with.

use data_loader::DataLoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The loader could not populate the catalog or ratings
    #[error("Failed to load dataset: {0}")]
    Load(#[from] DataLoadError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
