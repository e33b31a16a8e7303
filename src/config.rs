use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::collector::CollectLimits;
use crate::error::HarvestError;

/// Configuration for a harvest run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Search query to run against the map site
    pub query: String,

    /// Map-search entry page
    #[serde(default = "default_map_url")]
    pub map_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Maximum listings to open
    #[serde(default = "default_max_places")]
    pub max_places: usize,

    /// Maximum reviews to keep per listing
    #[serde(default = "default_max_reviews")]
    pub max_reviews: usize,

    /// Scroll-round budget for the result feed
    #[serde(default = "default_feed_rounds")]
    pub feed_rounds: usize,

    /// Scroll-round budget for the review pane
    #[serde(default = "default_review_rounds")]
    pub review_rounds: usize,

    /// Consecutive no-growth scroll rounds tolerated before giving up
    #[serde(default = "default_stall_limit")]
    pub stall_limit: usize,

    /// Delay between driver actions, in milliseconds
    #[serde(default = "default_pacing_ms")]
    pub pacing_ms: u64,

    /// Delay after navigation, in milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Reviews shorter than this are skipped as UI noise
    #[serde(default = "default_min_review_len")]
    pub min_review_len: usize,

    /// Directory the CSV files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl HarvestConfig {
    /// Create a new configuration with default values
    pub fn new(query: &str) -> Self {
        Self {
            query: query.to_string(),
            map_url: default_map_url(),
            webdriver_url: default_webdriver_url(),
            max_places: default_max_places(),
            max_reviews: default_max_reviews(),
            feed_rounds: default_feed_rounds(),
            review_rounds: default_review_rounds(),
            stall_limit: default_stall_limit(),
            pacing_ms: default_pacing_ms(),
            settle_ms: default_settle_ms(),
            min_review_len: default_min_review_len(),
            output_dir: default_output_dir(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, HarvestError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Override the WebDriver URL from the environment, if set
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    /// Collector bounds for listing discovery in the result feed
    pub fn feed_limits(&self) -> CollectLimits {
        CollectLimits {
            cap: self.max_places,
            max_rounds: self.feed_rounds,
            stall_limit: self.stall_limit,
        }
    }

    /// Collector bounds for the review pane of one listing
    pub fn review_limits(&self) -> CollectLimits {
        CollectLimits {
            cap: self.max_reviews,
            max_rounds: self.review_rounds,
            stall_limit: self.stall_limit,
        }
    }
}

fn default_map_url() -> String {
    "https://maps.google.com/".to_string()
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_max_places() -> usize {
    10
}

fn default_max_reviews() -> usize {
    10
}

fn default_feed_rounds() -> usize {
    6
}

fn default_review_rounds() -> usize {
    8
}

fn default_stall_limit() -> usize {
    3
}

fn default_pacing_ms() -> u64 {
    2000
}

fn default_settle_ms() -> u64 {
    5000
}

fn default_min_review_len() -> usize {
    10
}

fn default_output_dir() -> String {
    ".".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json_fills_defaults() {
        let config: HarvestConfig =
            serde_json::from_str(r#"{"query": "italian food jakarta timur"}"#).unwrap();
        assert_eq!(config.query, "italian food jakarta timur");
        assert_eq!(config.webdriver_url, "http://localhost:4444");
        assert_eq!(config.max_places, 10);
        assert_eq!(config.stall_limit, 3);
        assert_eq!(config.output_dir, ".");
    }

    #[test]
    fn test_limits_derive_from_fields() {
        let mut config = HarvestConfig::new("coffee");
        config.max_places = 4;
        config.feed_rounds = 7;
        config.max_reviews = 15;
        config.stall_limit = 2;

        let feed = config.feed_limits();
        assert_eq!(feed.cap, 4);
        assert_eq!(feed.max_rounds, 7);
        assert_eq!(feed.stall_limit, 2);

        let review = config.review_limits();
        assert_eq!(review.cap, 15);
        assert_eq!(review.stall_limit, 2);
    }
}
