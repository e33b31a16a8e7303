use serde::Serialize;

use crate::collector::Dedupe;
use crate::extract::text;

/// One row of `places.csv`: a single scraped listing.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceRecord {
    /// Ordinal id, zero-padded ("001", "002", ...)
    pub place_id: String,
    pub name: String,
    pub category: String,
    /// Empty cell when the URL carried no coordinates
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price_range: String,
    pub description: String,
    /// Number of reviews captured for this place
    pub reviews_count: usize,
}

/// One row of `reviews.csv`: a single deduplicated review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRecord {
    /// Run-wide sequential id
    pub review_id: String,
    /// Per-place sequential id
    pub user_id: String,
    pub place_id: String,
    pub review_text: String,
    /// Parsed star rating; empty cell when no rating label was readable
    pub rating: Option<u8>,
    /// The review's own relative-date text, when shown
    pub posted: String,
}

/// A listing anchor discovered in the result feed. Only the link and its
/// label are captured here; everything else is extracted after navigating to
/// the listing itself.
#[derive(Debug, Clone)]
pub struct ListingStub {
    pub href: String,
    pub label: String,
}

impl Dedupe for ListingStub {
    fn dedupe_key(&self) -> String {
        // The feed re-renders anchors freely; the link is the stable identity.
        self.href.trim_end_matches('/').to_string()
    }
}

/// A review as pulled from one poll of the review pane, before it is assigned
/// ids and turned into a [`ReviewRecord`].
#[derive(Debug, Clone)]
pub struct RawReview {
    pub text: String,
    pub rating: Option<u8>,
    pub posted: String,
}

impl Dedupe for RawReview {
    fn dedupe_key(&self) -> String {
        text::normalize_key(&self.text)
    }
}

/// Zero-padded sequential id allocator. Threaded explicitly through a run so
/// review ids stay globally unique without any ambient counter.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    pub fn next_id(&mut self) -> String {
        self.next += 1;
        format!("{:03}", self.next)
    }
}
