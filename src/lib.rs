// Re-export modules
pub mod collector;
pub mod config;
pub mod drivers;
pub mod error;
pub mod extract;
pub mod output;
pub mod records;

// Re-export commonly used types for convenience
pub use config::HarvestConfig;
pub use error::HarvestError;
pub use records::{PlaceRecord, ReviewRecord};

use crate::collector::collect;
use crate::drivers::{FeedSource, ReviewSource, WebSession};
use crate::extract::fields;
use crate::records::IdSequence;

/// Everything one run produced: the two datasets, ready for CSV export.
#[derive(Debug)]
pub struct HarvestOutcome {
    pub places: Vec<PlaceRecord>,
    pub reviews: Vec<ReviewRecord>,
}

/// Builder for configuring and running a harvest
pub struct Harvest {
    config: HarvestConfig,
}

impl Harvest {
    /// Create a new Harvest builder for the given search query
    pub fn new(query: &str) -> Self {
        Self {
            config: HarvestConfig::new(query),
        }
    }

    /// Apply a configuration wholesale
    pub fn with_config(mut self, config: HarvestConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(
        mut self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, HarvestError> {
        self.config = HarvestConfig::from_file(path)?;
        Ok(self)
    }

    /// Set the maximum number of listings to open
    pub fn with_max_places(mut self, value: usize) -> Self {
        self.config.max_places = value;
        self
    }

    /// Set the maximum number of reviews kept per listing
    pub fn with_max_reviews(mut self, value: usize) -> Self {
        self.config.max_reviews = value;
        self
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    /// Run the harvest: discover listings for the query, open each one,
    /// extract its fields and reviews, and return both datasets.
    ///
    /// Only session setup and the initial search can fail the run. Everything
    /// after that degrades per listing or per field: a listing that cannot be
    /// opened is skipped, a field that cannot be read gets its placeholder,
    /// a missing reviews panel yields zero reviews.
    pub async fn run(mut self) -> Result<HarvestOutcome, HarvestError> {
        self.config.apply_env();
        let config = self.config;

        let session = WebSession::connect(&config).await?;
        session.open_search(&config.map_url, &config.query).await?;

        let feed = {
            let mut source = FeedSource::new(&session);
            collect(&mut source, config.feed_limits()).await
        };
        ::log::info!(
            "Discovered {} listings in {} rounds ({:?})",
            feed.items.len(),
            feed.rounds,
            feed.reason
        );

        let mut places = Vec::new();
        let mut reviews = Vec::new();
        let mut review_ids = IdSequence::default();

        for index in 0..feed.items.len() {
            let place_id = format!("{:03}", index + 1);
            ::log::info!("Opening listing {}/{}", index + 1, feed.items.len());

            match session.open_listing(index).await {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    ::log::error!("Failed to open listing {}: {}", index + 1, e);
                    if let Err(e) = session.back_to_results().await {
                        ::log::warn!("Back navigation failed: {}", e);
                    }
                    continue;
                }
            }

            let (place, place_reviews) =
                scrape_listing(&session, &config, place_id, &mut review_ids).await;
            ::log::info!(
                "Scraped {} ({} reviews)",
                place.name,
                place.reviews_count
            );
            places.push(place);
            reviews.extend(place_reviews);

            if let Err(e) = session.back_to_results().await {
                ::log::warn!("Back navigation failed: {}", e);
            }
        }

        if let Err(e) = session.close().await {
            ::log::warn!("Failed to close browser session: {}", e);
        }

        Ok(HarvestOutcome { places, reviews })
    }
}

/// Extracts one opened listing: structured fields through their fallback
/// tiers, then the bounded review collection.
async fn scrape_listing(
    session: &WebSession,
    config: &HarvestConfig,
    place_id: String,
    review_ids: &mut IdSequence,
) -> (PlaceRecord, Vec<ReviewRecord>) {
    let coordinates = session.coordinates().await;
    if coordinates.is_none() {
        ::log::warn!("No coordinates in the listing URL");
    }

    let name = match session.field_text(fields::NAME).await {
        Some(value) => value,
        None => session
            .source_text(fields::NAME_SOURCE_CSS, fields::non_empty)
            .await
            .unwrap_or_else(|| "Unknown".to_string()),
    };

    let category = match session.field_text(fields::CATEGORY).await {
        Some(value) => value,
        None => session
            .source_text(fields::CATEGORY_SOURCE_CSS, fields::not_rating_like)
            .await
            .unwrap_or_else(|| "Unknown".to_string()),
    };

    let price_range = session
        .field_text(fields::PRICE)
        .await
        .unwrap_or_else(|| "N/A".to_string());

    session.expand_description().await;
    let description = match session.field_text(fields::DESCRIPTION).await {
        Some(value) => value,
        None => session
            .source_text(fields::DESCRIPTION_SOURCE_CSS, fields::long_prose)
            .await
            .unwrap_or_else(|| "N/A".to_string()),
    };

    let raw_reviews = match session.open_reviews_tab().await {
        Ok(true) => {
            let mut source = ReviewSource::new(session, config.min_review_len);
            let collected = collect(&mut source, config.review_limits()).await;
            ::log::info!(
                "Collected {} reviews in {} rounds ({:?})",
                collected.items.len(),
                collected.rounds,
                collected.reason
            );
            collected.items
        }
        Ok(false) => Vec::new(),
        Err(e) => {
            ::log::warn!("Failed to open the reviews tab: {}", e);
            Vec::new()
        }
    };

    let mut user_ids = IdSequence::default();
    let place_reviews: Vec<ReviewRecord> = raw_reviews
        .into_iter()
        .map(|review| ReviewRecord {
            review_id: review_ids.next_id(),
            user_id: user_ids.next_id(),
            place_id: place_id.clone(),
            review_text: review.text,
            rating: review.rating,
            posted: review.posted,
        })
        .collect();

    let place = PlaceRecord {
        place_id,
        name,
        category,
        latitude: coordinates.map(|(lat, _)| lat),
        longitude: coordinates.map(|(_, lng)| lng),
        price_range,
        description,
        reviews_count: place_reviews.len(),
    };

    (place, place_reviews)
}
