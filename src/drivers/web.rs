use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::key::Key;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use std::time::Duration;

use crate::collector::ItemSource;
use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::extract::{FieldStrategy, Locator, fields, html, text};
use crate::records::{ListingStub, RawReview};

/// Upper bound on a single element lookup before falling to the next tier.
const LOOKUP_WAIT: Duration = Duration::from_secs(2);

const SCROLL_ELEMENT_TO_BOTTOM: &str = "arguments[0].scrollTop = arguments[0].scrollHeight;";
const SCROLL_WINDOW_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Search box candidates, in lookup order.
const SEARCH_BOXES: &[Locator] = &[
    Locator::Css("input#searchboxinput"),
    Locator::XPath("//input[@id='searchboxinput']"),
    Locator::Css("input[name='q']"),
];

/// Result-feed listing anchors.
const LISTING_ANCHORS: &[Locator] = &[
    Locator::Css("a.hfpxzc"),
    Locator::XPath("//a[contains(@href, '/maps/place/')]"),
];

/// Scrollable container of the result feed.
const RESULT_FEEDS: &[Locator] = &[Locator::Css("div[role='feed']")];

/// Tab that opens the reviews panel. Labels depend on the page locale.
const REVIEW_TABS: &[Locator] = &[
    Locator::XPath("//button[@role='tab' and contains(@aria-label, 'Ulasan')]"),
    Locator::XPath("//button[@role='tab' and contains(@aria-label, 'Review')]"),
    Locator::XPath("//button[contains(@class, 'hh2c6') and contains(., 'Ulasan')]"),
];

/// Scrollable review pane.
const REVIEW_PANES: &[Locator] = &[
    Locator::Css("div.m6QErb.DxyBCb"),
    Locator::XPath("//div[contains(@class, 'm6QErb') and @tabindex='-1']"),
];

/// One rendered review block.
const REVIEW_CONTAINER: WdLocator<'static> = WdLocator::Css("div[data-review-id]");

/// Review body candidates inside one container.
const REVIEW_TEXT_CSS: &[&str] = &["span.wiI7pd", "span.MyEned"];

/// Relative-date span inside one container.
const REVIEW_DATE_CSS: &str = "span.rsqaWe";

fn to_wd(locator: &Locator) -> WdLocator<'static> {
    match locator {
        Locator::Css(css) => WdLocator::Css(css),
        Locator::XPath(xpath) => WdLocator::XPath(xpath),
    }
}

/// A connected WebDriver session plus the pacing knobs the harvest uses
/// between actions. This is the page-driver collaborator everything else
/// talks to; it never hands element handles across a navigation.
pub struct WebSession {
    client: Client,
    pacing: Duration,
    settle: Duration,
}

impl WebSession {
    /// Connects to the configured WebDriver URL, then to a list of common
    /// fallback ports when that fails.
    pub async fn connect(config: &HarvestConfig) -> Result<Self, HarvestError> {
        let mut last_err = None;

        for url in candidate_urls(&config.webdriver_url) {
            match ClientBuilder::native().connect(url).await {
                Ok(client) => {
                    ::log::debug!("Connected to WebDriver at {}", url);
                    return Ok(Self {
                        client,
                        pacing: Duration::from_millis(config.pacing_ms),
                        settle: Duration::from_millis(config.settle_ms),
                    });
                }
                Err(e) => {
                    ::log::debug!("WebDriver connect to {} failed: {}", url, e);
                    last_err = Some(e);
                }
            }
        }

        ::log::error!("Failed to connect to any WebDriver server");
        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(HarvestError::Connect(
            last_err.expect("candidate URL list is never empty"),
        ))
    }

    /// Opens the map page and submits the search query.
    pub async fn open_search(&self, map_url: &str, query: &str) -> Result<(), HarvestError> {
        self.client.goto(map_url).await?;
        self.settle().await;

        let search_box = self
            .first_present(SEARCH_BOXES)
            .await
            .ok_or(HarvestError::SearchBoxMissing)?;
        search_box.clear().await?;
        search_box.send_keys(query).await?;
        self.pace().await;
        search_box
            .send_keys(&char::from(Key::Enter).to_string())
            .await?;
        ::log::info!("Submitted search: {}", query);
        self.settle().await;
        Ok(())
    }

    /// Clicks the listing at `index` in the result feed. The anchor set is
    /// re-queried immediately before the click; handles from earlier polls
    /// are stale once any navigation has happened.
    pub async fn open_listing(&self, index: usize) -> Result<bool, CmdError> {
        let anchors = self.listing_anchors().await?;
        let Some(anchor) = anchors.into_iter().nth(index) else {
            ::log::warn!("Listing {} no longer present in the feed", index + 1);
            return Ok(false);
        };
        anchor.click().await?;
        self.settle().await;
        Ok(true)
    }

    /// Navigates back to the result feed after a listing visit.
    pub async fn back_to_results(&self) -> Result<(), CmdError> {
        self.client.back().await?;
        self.settle().await;
        Ok(())
    }

    /// Extracts one field through its live lookup tiers.
    pub async fn field_text(&self, strategies: &[FieldStrategy]) -> Option<String> {
        for strategy in strategies {
            let Some(element) = self.first_present(std::slice::from_ref(&strategy.locator)).await
            else {
                continue;
            };

            let raw = match strategy.attr {
                Some(attr) => match element.attr(attr).await {
                    Ok(value) => value.unwrap_or_default(),
                    Err(_) => continue,
                },
                None => match element.text().await {
                    Ok(value) => value,
                    Err(_) => continue,
                },
            };

            if let Some(value) = strategy.accept(&raw) {
                return Some(value);
            }
        }
        None
    }

    /// Extracts one field from the raw page source, the tier of last resort.
    pub async fn source_text(
        &self,
        selectors: &[&str],
        validate: fn(&str) -> bool,
    ) -> Option<String> {
        match self.client.source().await {
            Ok(source) => html::first_valid_text(&source, selectors, validate),
            Err(e) => {
                ::log::warn!("Failed to read page source: {}", e);
                None
            }
        }
    }

    /// Clicks the description expander when one is present, so the full text
    /// renders before extraction. Failures here are ignored.
    pub async fn expand_description(&self) {
        for locator in fields::DESCRIPTION_EXPANDERS {
            if let Some(button) = self.first_present(std::slice::from_ref(locator)).await {
                if button.click().await.is_ok() {
                    ::log::debug!("Expanded truncated description");
                    self.pace().await;
                }
                return;
            }
        }
    }

    /// Coordinates parsed from the current (post-navigation) URL.
    pub async fn coordinates(&self) -> Option<(f64, f64)> {
        match self.client.current_url().await {
            Ok(url) => fields::coordinates_from_url(&url),
            Err(e) => {
                ::log::warn!("Failed to read current URL: {}", e);
                None
            }
        }
    }

    /// Opens the reviews tab. Returns false when the listing has no such tab,
    /// which callers treat as "no reviews" rather than an error.
    pub async fn open_reviews_tab(&self) -> Result<bool, CmdError> {
        let Some(tab) = self.first_present(REVIEW_TABS).await else {
            ::log::info!("No reviews tab on this listing");
            return Ok(false);
        };
        tab.click().await?;
        self.settle().await;
        Ok(true)
    }

    /// Closes the browser session.
    pub async fn close(self) -> Result<(), CmdError> {
        self.client.close().await
    }

    async fn listing_anchors(&self) -> Result<Vec<Element>, CmdError> {
        for locator in LISTING_ANCHORS {
            let anchors = self.client.find_all(to_wd(locator)).await?;
            if !anchors.is_empty() {
                return Ok(anchors);
            }
        }
        Ok(Vec::new())
    }

    async fn first_present(&self, locators: &[Locator]) -> Option<Element> {
        for locator in locators {
            if let Ok(element) = self
                .client
                .wait()
                .at_most(LOOKUP_WAIT)
                .for_element(to_wd(locator))
                .await
            {
                return Some(element);
            }
        }
        None
    }

    async fn pace(&self) {
        tokio::time::sleep(self.pacing).await;
    }

    async fn settle(&self) {
        tokio::time::sleep(self.settle).await;
    }
}

fn candidate_urls(configured: &str) -> impl Iterator<Item = &str> {
    // Common alternatives: ChromeDriver, Appium, Chrome debug port, and the
    // default with an IP instead of localhost.
    let fallbacks = [
        "http://localhost:9515",
        "http://localhost:4723",
        "http://localhost:9222",
        "http://127.0.0.1:4444",
    ];
    std::iter::once(configured).chain(
        fallbacks
            .into_iter()
            .filter(move |url| *url != configured),
    )
}

/// Result-feed source for the collector: advancing scrolls the feed, items
/// are the listing anchors currently rendered.
pub struct FeedSource<'a> {
    session: &'a WebSession,
}

impl<'a> FeedSource<'a> {
    pub fn new(session: &'a WebSession) -> Self {
        Self { session }
    }
}

impl ItemSource for FeedSource<'_> {
    type Item = ListingStub;
    type Error = CmdError;

    async fn count_visible(&mut self) -> Result<usize, CmdError> {
        Ok(self.session.listing_anchors().await?.len())
    }

    async fn advance(&mut self) -> Result<(), CmdError> {
        if let Some(feed) = self.session.first_present(RESULT_FEEDS).await {
            let arg = serde_json::to_value(&feed).unwrap_or(serde_json::Value::Null);
            self.session
                .client
                .execute(SCROLL_ELEMENT_TO_BOTTOM, vec![arg])
                .await?;
        } else {
            self.session
                .client
                .execute(SCROLL_WINDOW_TO_BOTTOM, vec![])
                .await?;
        }
        self.session.pace().await;
        Ok(())
    }

    async fn extract_all(&mut self) -> Result<Vec<ListingStub>, CmdError> {
        let mut stubs = Vec::new();
        for anchor in self.session.listing_anchors().await? {
            let href = match anchor.attr("href").await? {
                Some(href) if !href.is_empty() => href,
                _ => continue,
            };
            let label = anchor.attr("aria-label").await?.unwrap_or_default();
            stubs.push(ListingStub {
                href,
                label: text::clean_text(&label),
            });
        }
        Ok(stubs)
    }
}

/// Review-pane source for the collector: advancing scrolls the pane element,
/// items are the rendered review containers. The pane and the containers are
/// re-queried on every call; the panel re-renders as it loads.
pub struct ReviewSource<'a> {
    session: &'a WebSession,
    min_len: usize,
}

impl<'a> ReviewSource<'a> {
    pub fn new(session: &'a WebSession, min_len: usize) -> Self {
        Self { session, min_len }
    }

    async fn read_review(&self, container: &Element) -> Result<Option<RawReview>, CmdError> {
        let mut body = String::new();
        for css in REVIEW_TEXT_CSS {
            if let Ok(span) = container.find(WdLocator::Css(css)).await {
                if let Ok(raw) = span.text().await {
                    body = text::clean_text(&raw);
                    if !body.is_empty() {
                        break;
                    }
                }
            }
        }
        if body.len() < self.min_len {
            return Ok(None);
        }

        let mut labels = Vec::new();
        for span in container
            .find_all(WdLocator::XPath(".//span[@aria-label]"))
            .await?
        {
            if let Ok(Some(label)) = span.attr("aria-label").await {
                labels.push(label);
            }
        }
        let rating = fields::rating_from_aria_labels(&labels);

        let posted = match container.find(WdLocator::Css(REVIEW_DATE_CSS)).await {
            Ok(span) => span.text().await.map(|t| text::clean_text(&t)).unwrap_or_default(),
            Err(_) => String::new(),
        };

        Ok(Some(RawReview {
            text: body,
            rating,
            posted,
        }))
    }
}

impl ItemSource for ReviewSource<'_> {
    type Item = RawReview;
    type Error = CmdError;

    async fn count_visible(&mut self) -> Result<usize, CmdError> {
        Ok(self.session.client.find_all(REVIEW_CONTAINER).await?.len())
    }

    async fn advance(&mut self) -> Result<(), CmdError> {
        if let Some(pane) = self.session.first_present(REVIEW_PANES).await {
            let arg = serde_json::to_value(&pane).unwrap_or(serde_json::Value::Null);
            self.session
                .client
                .execute(SCROLL_ELEMENT_TO_BOTTOM, vec![arg])
                .await?;
        } else {
            self.session
                .client
                .execute(SCROLL_WINDOW_TO_BOTTOM, vec![])
                .await?;
        }
        self.session.pace().await;
        Ok(())
    }

    async fn extract_all(&mut self) -> Result<Vec<RawReview>, CmdError> {
        let mut reviews = Vec::new();
        for container in self.session.client.find_all(REVIEW_CONTAINER).await? {
            match self.read_review(&container).await {
                Ok(Some(review)) => reviews.push(review),
                Ok(None) => {}
                // A container that re-rendered mid-read is dropped this poll;
                // the next poll sees it again.
                Err(e) => ::log::debug!("Skipping review container: {}", e),
            }
        }
        Ok(reviews)
    }
}
