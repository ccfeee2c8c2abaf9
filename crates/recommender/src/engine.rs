//! Recommendation Engine - the façade callers talk to
//!
//! Owns the dataset, the configuration, the random source and the current
//! train/test split. Every call that draws randomness or touches the split
//! takes `&mut self`, so one engine runs at most one evaluation at a time.

use crate::benchmark::{BenchmarkReport, Timings};
use crate::collaborative::CollaborativeRecommender;
use crate::config::{EngineConfig, check_test_ratio};
use crate::content::ContentRecommender;
use crate::error::Result;
use crate::evaluation::{Evaluator, GridSearch, OptimizationReport, TrainTestSplit};
use crate::hybrid::HybridRecommender;
use crate::random::{RandomSource, seeded};
use crate::types::{HybridWeights, RatingView, Recommendations};
use data_loader::{DataSource, Dataset, Movie, UserId};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, instrument, warn};

pub struct RecommendationEngine {
    dataset: Dataset,
    config: EngineConfig,
    hybrid: HybridRecommender,
    rng: Box<dyn RandomSource + Send>,
    split: Option<TrainTestSplit>,
}

impl RecommendationEngine {
    /// Engine over an already loaded dataset, drawing from a `StdRng`
    /// seeded with `config.seed`
    pub fn new(dataset: Dataset, config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let content = ContentRecommender::new().with_rating_midpoint(config.rating_midpoint);
        let collaborative = CollaborativeRecommender::new().with_max_rating(config.max_rating);
        let hybrid =
            HybridRecommender::new(content, collaborative).with_max_rating(config.max_rating);
        let rng = Box::new(seeded(config.seed));

        let (users, movies, ratings) = dataset.counts();
        info!(
            "Engine ready: {} movies, {} users, {} ratings (seed {})",
            movies, users, ratings, config.seed
        );

        Ok(Self {
            dataset,
            config,
            hybrid,
            rng,
            split: None,
        })
    }

    /// Load a dataset from `source` and build an engine over it
    pub fn load(source: &impl DataSource, config: EngineConfig) -> Result<Self> {
        let dataset = Dataset::load(source)?;
        Self::new(dataset, config)
    }

    /// Replace the random source (default: seeded `StdRng`)
    pub fn with_random_source(mut self, rng: Box<dyn RandomSource + Send>) -> Self {
        self.rng = rng;
        self
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The split from the last `split_data_for_validation`, if any
    pub fn split(&self) -> Option<&TrainTestSplit> {
        self.split.as_ref()
    }

    // =========================================================================
    // Recommendations over the full ratings
    // =========================================================================

    pub fn content_based_recommendation(&mut self, user_id: UserId, n: usize) -> Recommendations {
        let view = RatingView::of(&self.dataset);
        self.hybrid.content().recommend(&view, user_id, n, &mut *self.rng)
    }

    pub fn collaborative_filtering_recommendation(
        &mut self,
        user_id: UserId,
        n: usize,
    ) -> Recommendations {
        let view = RatingView::of(&self.dataset);
        self.hybrid.collaborative().recommend(&view, user_id, n, &mut *self.rng)
    }

    pub fn hybrid_recommendation(
        &mut self,
        user_id: UserId,
        n: usize,
        content_weight: f64,
        collab_weight: f64,
    ) -> Recommendations {
        let view = RatingView::of(&self.dataset);
        let weights = HybridWeights::new(content_weight, collab_weight);
        self.hybrid.recommend(&view, user_id, n, weights, &mut *self.rng)
    }

    /// Per-genre affinity over the user's full rating history
    pub fn genre_affinity(&self, user_id: UserId) -> BTreeMap<String, f64> {
        let view = RatingView::of(&self.dataset);
        self.hybrid.content().genre_affinity(&view, user_id)
    }

    /// Catalog movies whose title contains `query`, ignoring case
    pub fn search_movies(&self, query: &str) -> Vec<&Movie> {
        let needle = query.to_lowercase();
        self.dataset
            .catalog
            .movies()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .collect()
    }

    // =========================================================================
    // Evaluation
    // =========================================================================

    /// Split the ratings into training and test sides, replacing any
    /// previous split
    pub fn split_data_for_validation(&mut self, test_ratio: f64) -> Result<&TrainTestSplit> {
        let split = self.draw_split(test_ratio)?;
        Ok(self.split.insert(split))
    }

    fn draw_split(&mut self, test_ratio: f64) -> Result<TrainTestSplit> {
        check_test_ratio(test_ratio)?;
        Ok(TrainTestSplit::new(
            &self.dataset.ratings,
            test_ratio,
            self.config.min_ratings_for_split,
            &mut *self.rng,
        ))
    }

    /// MAE of the hybrid recommender on the current split, `None` when
    /// there is no usable split or nothing could be evaluated
    #[instrument(skip(self))]
    pub fn evaluate_hybrid(&mut self, content_weight: f64, collab_weight: f64) -> Option<f64> {
        let split = match &self.split {
            Some(split) if !split.is_empty() => split,
            _ => {
                warn!("No usable train/test split, run the split first");
                return None;
            }
        };

        let evaluator = Evaluator::new(&self.dataset.catalog, split, &self.hybrid, &self.config);
        let weights = HybridWeights::new(content_weight, collab_weight);
        let mae = evaluator.mean_absolute_error(weights, &mut *self.rng);
        match mae {
            Some(mae) => info!("Hybrid MAE: {:.4}", mae),
            None => warn!("No test user had enough training ratings to evaluate"),
        }
        mae
    }

    /// Split with the configured test ratio, then grid-search every
    /// (content, collaborative) weight pair
    pub fn optimize_hybrid(
        &mut self,
        content_weights: &[f64],
        collab_weights: &[f64],
    ) -> Result<OptimizationReport> {
        let split = self.draw_split(self.config.test_ratio)?;
        let split = &*self.split.insert(split);

        let evaluator = Evaluator::new(&self.dataset.catalog, split, &self.hybrid, &self.config);
        let report = GridSearch::new(self.config.seed)
            .with_parallel(self.config.parallel_grid)
            .run(&evaluator, content_weights, collab_weights);
        Ok(report)
    }

    /// Grid search over the configured weight grids
    pub fn run_optimization(&mut self) -> Result<OptimizationReport> {
        let content_weights = self.config.content_weights.clone();
        let collab_weights = self.config.collab_weights.clone();
        self.optimize_hybrid(&content_weights, &collab_weights)
    }

    /// Time all three recommenders for one user and compare their lists
    #[instrument(skip(self))]
    pub fn run_benchmark(&mut self, user_id: UserId, n: usize) -> BenchmarkReport {
        let start = Instant::now();
        let content = self.content_based_recommendation(user_id, n);
        let content_time = start.elapsed();

        let start = Instant::now();
        let collaborative = self.collaborative_filtering_recommendation(user_id, n);
        let collaborative_time = start.elapsed();

        let weights = HybridWeights::default();
        let start = Instant::now();
        let hybrid = self.hybrid_recommendation(user_id, n, weights.content, weights.collaborative);
        let hybrid_time = start.elapsed();

        info!(
            "Benchmark user {}: content {:?}, collaborative {:?}, hybrid {:?}",
            user_id, content_time, collaborative_time, hybrid_time
        );

        BenchmarkReport::new(
            user_id,
            n,
            content,
            collaborative,
            hybrid,
            Timings {
                content: content_time,
                collaborative: collaborative_time,
                hybrid: hybrid_time,
            },
        )
    }
}
