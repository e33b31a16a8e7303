use std::fs;
use std::path::{Path, PathBuf};

use crate::error::HarvestError;
use crate::records::{PlaceRecord, ReviewRecord};

/// Filenames are fixed so every run fully rewrites the previous datasets.
pub const PLACES_FILE: &str = "places.csv";
pub const REVIEWS_FILE: &str = "reviews.csv";

/// Writes the place dataset, one row per scraped listing, header included.
pub fn write_places(dir: &Path, places: &[PlaceRecord]) -> Result<PathBuf, HarvestError> {
    let path = prepare(dir, PLACES_FILE)?;
    let mut writer = csv::Writer::from_path(&path)?;
    for place in places {
        writer.serialize(place)?;
    }
    writer.flush()?;
    ::log::info!("Wrote {} places to {}", places.len(), path.display());
    Ok(path)
}

/// Writes the review dataset, one row per deduplicated review.
pub fn write_reviews(dir: &Path, reviews: &[ReviewRecord]) -> Result<PathBuf, HarvestError> {
    let path = prepare(dir, REVIEWS_FILE)?;
    let mut writer = csv::Writer::from_path(&path)?;
    for review in reviews {
        writer.serialize(review)?;
    }
    writer.flush()?;
    ::log::info!("Wrote {} reviews to {}", reviews.len(), path.display());
    Ok(path)
}

fn prepare(dir: &Path, file: &str) -> Result<PathBuf, HarvestError> {
    fs::create_dir_all(dir)?;
    Ok(dir.join(file))
}
