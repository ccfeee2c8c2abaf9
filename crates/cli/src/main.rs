use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{Catalog, DatFileSource, SyntheticSource, UserId};
use recommender::{
    BenchmarkReport, EngineConfig, GridPoint, OptimizationReport, Provenance, RecommendationEngine,
    Recommendations,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// MovieRecs - genre, collaborative and hybrid movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Movie recommendation engine over MovieLens ratings", long_about = None)]
struct Cli {
    /// Path to MovieLens dataset directory
    #[arg(short, long, default_value = "data/ml-1m")]
    data_dir: PathBuf,

    /// Use the built-in synthetic dataset instead of MovieLens files
    #[arg(long)]
    synthetic: bool,

    /// Seed for random fallbacks, splits and the synthetic dataset
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    Content,
    Collaborative,
    Hybrid,
}

#[derive(Subcommand)]
enum Commands {
    /// Get movie recommendations for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long)]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        #[arg(long, value_enum, default_value = "hybrid")]
        strategy: Strategy,

        /// Hybrid weight of the content-based list
        #[arg(long, default_value = "0.5")]
        content_weight: f64,

        /// Hybrid weight of the collaborative list
        #[arg(long, default_value = "0.5")]
        collab_weight: f64,
    },

    /// Show a user's rating history and genre affinity
    User {
        /// User ID to display
        #[arg(long)]
        user_id: UserId,
    },

    /// Search for movies by title
    Search {
        /// Movie title to search for (case-insensitive substring match)
        #[arg(long)]
        title: String,
    },

    /// Compare the three recommenders for one user
    Benchmark {
        #[arg(long, default_value = "1")]
        user_id: UserId,

        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Grid-search the hybrid weights against a train/test split
    Optimize {
        /// Fraction of each user's ratings held out for testing
        #[arg(long)]
        test_ratio: Option<f64>,

        /// Content weights to try, comma separated
        #[arg(long, value_delimiter = ',')]
        content_weights: Option<Vec<f64>>,

        /// Collaborative weights to try, comma separated
        #[arg(long, value_delimiter = ',')]
        collab_weights: Option<Vec<f64>>,

        /// Evaluate weight pairs in parallel
        #[arg(long)]
        parallel: bool,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let start = Instant::now();
    let mut engine = if cli.synthetic {
        println!("Generating synthetic dataset (seed {})...", config.seed);
        RecommendationEngine::load(&SyntheticSource::new(config.seed), config)
            .context("Failed to build synthetic dataset")?
    } else {
        println!("Loading MovieLens dataset from {}...", cli.data_dir.display());
        RecommendationEngine::load(&DatFileSource::new(&cli.data_dir), config)
            .context("Failed to load MovieLens dataset")?
    };
    println!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user_id,
            limit,
            strategy,
            content_weight,
            collab_weight,
        } => handle_recommend(&mut engine, user_id, limit, strategy, content_weight, collab_weight),
        Commands::User { user_id } => handle_user(&engine, user_id)?,
        Commands::Search { title } => handle_search(&engine, &title),
        Commands::Benchmark { user_id, limit } => handle_benchmark(&mut engine, user_id, limit),
        Commands::Optimize { json, .. } => handle_optimize(&mut engine, json)?,
    }

    Ok(())
}

/// Config file (if any) with command-line flags applied on top
fn build_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to read engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    if let Commands::Optimize {
        test_ratio,
        content_weights,
        collab_weights,
        parallel,
        ..
    } = &cli.command
    {
        if let Some(ratio) = test_ratio {
            config = config.with_test_ratio(*ratio);
        }
        let content = content_weights.clone().unwrap_or_else(|| config.content_weights.clone());
        let collab = collab_weights.clone().unwrap_or_else(|| config.collab_weights.clone());
        let parallel = *parallel || config.parallel_grid;
        config = config.with_weight_grid(content, collab).with_parallel_grid(parallel);
    }

    config.validate().context("Invalid engine settings")?;
    Ok(config)
}

/// Handle the 'recommend' command
fn handle_recommend(
    engine: &mut RecommendationEngine,
    user_id: UserId,
    limit: usize,
    strategy: Strategy,
    content_weight: f64,
    collab_weight: f64,
) {
    let start = Instant::now();
    let (label, recs) = match strategy {
        Strategy::Content => ("Content-based", engine.content_based_recommendation(user_id, limit)),
        Strategy::Collaborative => (
            "Collaborative",
            engine.collaborative_filtering_recommendation(user_id, limit),
        ),
        Strategy::Hybrid => (
            "Hybrid",
            engine.hybrid_recommendation(user_id, limit, content_weight, collab_weight),
        ),
    };
    info!("Generated {} recommendations in {:?}", recs.len(), start.elapsed());

    let header = format!("{} recommendations for user {}:", label, user_id);
    print_recommendations(&header, &recs, &engine.dataset().catalog);
}

/// Handle the 'user' command
fn handle_user(engine: &RecommendationEngine, user_id: UserId) -> Result<()> {
    let Some(ratings) = engine.dataset().user_ratings(user_id) else {
        bail!("User {} not found", user_id);
    };
    let catalog = &engine.dataset().catalog;

    println!("{}", format!("User ID: {}", user_id).bold().blue());

    let avg_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.values().sum::<f64>() / ratings.len() as f64
    };
    println!("{}Number of ratings: {}", "• ".cyan(), ratings.len());
    println!("{}Average rating: {:.2}", "• ".cyan(), avg_rating);

    let mut top_rated: Vec<_> = ratings.iter().collect();
    top_rated.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    println!("Top rated movies:");
    for (&movie_id, rating) in top_rated.into_iter().take(5) {
        let title = catalog.title(movie_id).unwrap_or("<unknown>");
        println!("  - {} (Rating: {})", title, rating);
    }

    let mut affinity: Vec<_> = engine.genre_affinity(user_id).into_iter().collect();
    affinity.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    println!("Genre affinity:");
    for (genre, score) in affinity {
        let score_str = format!("{:+.1}", score);
        let score_str = if score >= 0.0 { score_str.green() } else { score_str.red() };
        println!("  - {}: {}", genre, score_str);
    }
    Ok(())
}

/// Handle the 'search' command
fn handle_search(engine: &RecommendationEngine, title: &str) {
    let ratings = &engine.dataset().ratings;
    let needle = title.to_lowercase();

    let mut matches: Vec<_> = engine
        .search_movies(title)
        .into_iter()
        .map(|movie| {
            let exact = movie.title.to_lowercase() == needle;
            let scores: Vec<f64> = ratings.values().filter_map(|r| r.get(&movie.id).copied()).collect();
            let avg = if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            };
            (movie, exact, avg, scores.len())
        })
        .collect();

    // Exact matches first, then by average rating
    matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.2.total_cmp(&a.2)));

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if matches.is_empty() {
        println!("  (no matches)");
    }
    for (movie, _, avg, count) in matches.iter().take(20) {
        println!(
            "{}: {} [{}] avg {:.2} ({} ratings)",
            movie.id,
            movie.title,
            movie.genres.join(", "),
            avg,
            count
        );
    }
}

/// Handle the 'benchmark' command
fn handle_benchmark(engine: &mut RecommendationEngine, user_id: UserId, limit: usize) {
    let report = engine.run_benchmark(user_id, limit);
    let catalog = &engine.dataset().catalog;

    println!(
        "{}",
        format!("Benchmark for user {} ({} recommendations)", user_id, limit)
            .bold()
            .blue()
    );
    print_recommendations("Content-based:", &report.content, catalog);
    print_recommendations("Collaborative:", &report.collaborative, catalog);
    print_recommendations("Hybrid (0.5 / 0.5):", &report.hybrid, catalog);
    print_benchmark_summary(&report);
}

fn print_benchmark_summary(report: &BenchmarkReport) {
    println!("{}", "Timings:".bold());
    println!("  Content-based: {:?}", report.timings.content);
    println!("  Collaborative: {:?}", report.timings.collaborative);
    println!("  Hybrid:        {:?}", report.timings.hybrid);

    println!("{}", "Overlap:".bold());
    for overlap in &report.overlaps {
        println!(
            "  {} / {}: {} movies ({})",
            overlap.left,
            overlap.right,
            overlap.count,
            overlap.percent_label()
        );
    }
}

/// Handle the 'optimize' command
fn handle_optimize(engine: &mut RecommendationEngine, json: bool) -> Result<()> {
    let config = engine.config();
    println!(
        "Searching {} x {} weight pairs (test ratio {}, {})",
        config.content_weights.len(),
        config.collab_weights.len(),
        config.test_ratio,
        if config.parallel_grid { "parallel" } else { "sequential" }
    );

    let start = Instant::now();
    let report = engine.run_optimization().context("Optimization failed")?;
    info!("Optimization finished in {:?}", start.elapsed());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_optimization(&report);
    }
    Ok(())
}

fn print_optimization(report: &OptimizationReport) {
    println!("{}", "Hybrid weight search:".bold().blue());
    for point in &report.points {
        let mae = match point.mae {
            Some(mae) => format!("{:.4}", mae),
            None => "undefined".yellow().to_string(),
        };
        println!(
            "  content={:.2} collab={:.2} -> MAE {}",
            point.weights.content, point.weights.collaborative, mae
        );
    }

    match report.best {
        Some(GridPoint {
            weights,
            mae: Some(mae),
        }) => println!(
            "{} Best weights: content={:.2} collab={:.2} (MAE {:.4})",
            "✓".green(),
            weights.content,
            weights.collaborative,
            mae
        ),
        _ => println!("{} No valid result", "✗".red()),
    }
}

/// Print a ranked list with titles and genres
fn print_recommendations(header: &str, recs: &Recommendations, catalog: &Catalog) {
    println!("{}", header.bold().blue());
    for (rank, movie_id) in recs.iter().enumerate() {
        let (title, genres) = match catalog.get(movie_id) {
            Some(movie) => (movie.title.as_str(), movie.genres.join(", ")),
            None => ("<unknown>", String::new()),
        };
        println!(
            "{}. {} [{}]",
            (rank + 1).to_string().green(),
            title,
            genres
        );
    }
    match recs.provenance {
        Provenance::Ranked => {}
        Provenance::Padded { padded } => println!(
            "   {}",
            format!("({} random picks added to fill the list)", padded).yellow()
        ),
        Provenance::Random => println!(
            "   {}",
            "(no rating history, showing random picks)".yellow()
        ),
    }
}
