//! Times a full dataset load and prints matrix density.
//!
//! Run with: cargo run --release --example benchmark_load -p data-loader [DATA_DIR]

use data_loader::{DatFileSource, Dataset};
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/ml-1m"));

    println!("Loading dataset from {}...\n", data_dir.display());

    let start = Instant::now();
    let dataset = match Dataset::load(&DatFileSource::new(&data_dir)) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Failed to load dataset: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed = start.elapsed();

    let (users, movies, ratings) = dataset.counts();
    let density = if users > 0 && movies > 0 {
        ratings as f64 / (users as f64 * movies as f64)
    } else {
        0.0
    };

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}  Movies: {}  Ratings: {}", users, movies, ratings);
    println!("Matrix density: {:.4}%", density * 100.0);
    println!("Throughput: {:.0} ratings/second", ratings as f64 / elapsed.as_secs_f64());
}
