use clap::Parser;
use std::path::Path;

use map_harvest::{Harvest, HarvestConfig, output};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting harvest for query: {}", args.query);

    println!("Note: harvesting requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    // Build the configuration: file first (if given), then CLI overrides
    let mut config = match &args.config {
        Some(path) => match HarvestConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config {}: {}", path, e);
                return;
            }
        },
        None => HarvestConfig::new(&args.query),
    };
    args.apply_to(&mut config);

    let output_dir = config.output_dir.clone();
    let start_time = std::time::Instant::now();

    let outcome = match Harvest::new(&config.query).with_config(config).run().await {
        Ok(outcome) => outcome,
        Err(e) => {
            ::log::error!("Harvest failed: {}", e);
            return;
        }
    };

    if outcome.places.is_empty() {
        ::log::warn!("No listings were scraped; nothing to write");
        return;
    }

    // Persist both datasets
    let dir = Path::new(&output_dir);
    if let Err(e) = output::write_places(dir, &outcome.places) {
        ::log::error!("Failed to write places: {}", e);
        return;
    }
    if let Err(e) = output::write_reviews(dir, &outcome.reviews) {
        ::log::error!("Failed to write reviews: {}", e);
        return;
    }

    let duration = start_time.elapsed();
    ::log::info!(
        "Harvest complete - {} places, {} reviews in {:.2} seconds",
        outcome.places.len(),
        outcome.reviews.len(),
        duration.as_secs_f64()
    );

    for place in &outcome.places {
        ::log::info!(
            "{}. {} [{}] - {} reviews",
            place.place_id,
            place.name,
            place.category,
            place.reviews_count
        );
    }
}
