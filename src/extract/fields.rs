use regex::Regex;
use url::Url;

use super::{FieldStrategy, Locator};

/// Ordered lookup tiers for the listing name.
pub static NAME: &[FieldStrategy] = &[
    FieldStrategy::element(Locator::XPath("//h1[contains(@class, 'DUwDvf')]"), non_empty),
    FieldStrategy::element(Locator::XPath("//div[@class='lMbq3e']//h1"), non_empty),
    FieldStrategy::element(
        Locator::XPath("//span[contains(@class, 'DUwDvf')]"),
        non_empty,
    ),
];

/// Ordered lookup tiers for the listing category.
pub static CATEGORY: &[FieldStrategy] = &[
    FieldStrategy::element(
        Locator::XPath("//button[contains(@class, 'DkEaL')]"),
        not_rating_like,
    ),
    FieldStrategy::element(
        Locator::XPath("//span[contains(@class, 'DkEaL')]"),
        not_rating_like,
    ),
    FieldStrategy::element(Locator::XPath("//div[@class='LBgpqf']//button"), not_rating_like),
];

/// Ordered lookup tiers for the price range. The site exposes this both as an
/// aria-label and as inline text depending on locale and layout.
pub static PRICE: &[FieldStrategy] = &[
    FieldStrategy::attribute(
        Locator::XPath("//span[contains(@aria-label, 'harga')]"),
        "aria-label",
        looks_like_price,
    ),
    FieldStrategy::attribute(
        Locator::XPath("//span[contains(@aria-label, 'Price')]"),
        "aria-label",
        looks_like_price,
    ),
    FieldStrategy::element(
        Locator::XPath("//div[contains(@class, 'fontBodyMedium')]//span"),
        looks_like_price,
    ),
];

/// Ordered lookup tiers for the listing description.
pub static DESCRIPTION: &[FieldStrategy] = &[
    FieldStrategy::element(Locator::XPath("//span[contains(@class, 'HlvSq')]"), long_prose),
    FieldStrategy::element(Locator::XPath("//div[contains(@class, 'PYvSYb')]"), long_prose),
    FieldStrategy::element(
        Locator::XPath("//div[@data-attrid='description']//span"),
        long_prose,
    ),
];

/// Button that expands a truncated description, when present.
pub static DESCRIPTION_EXPANDERS: &[Locator] = &[
    Locator::XPath("//button[contains(., 'Selengkapnya')]"),
    Locator::XPath("//button[contains(., 'More')]"),
];

/// Page-source CSS tiers, tried against the raw HTML when all live lookups
/// for the field came back empty.
pub static NAME_SOURCE_CSS: &[&str] = &["h1.DUwDvf", "div.lMbq3e h1"];
pub static CATEGORY_SOURCE_CSS: &[&str] = &["button.DkEaL", "span.DkEaL"];
pub static DESCRIPTION_SOURCE_CSS: &[&str] = &["span.HlvSq", "div.PYvSYb"];

/// Accepts any non-empty value. Emptiness is already rejected before the
/// validator runs, so this is the identity tier.
pub fn non_empty(_value: &str) -> bool {
    true
}

/// The category slot sometimes renders the star rating instead ("4.5" etc.);
/// reject anything that leads with a digit.
pub fn not_rating_like(value: &str) -> bool {
    !value.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// A plausible price string carries a currency marker or names a range.
pub fn looks_like_price(value: &str) -> bool {
    let lower = value.to_lowercase();
    value.contains("Rp")
        || value.contains('$')
        || lower.contains("price")
        || lower.contains("harga")
}

/// Descriptions are prose: long enough to be real and not a bare number.
pub fn long_prose(value: &str) -> bool {
    value.len() > 20 && value.chars().any(|c| c.is_alphabetic())
}

/// Pulls latitude/longitude out of a map URL. Two forms occur: the viewport
/// form `.../@-6.21,106.85,15z/...` and the data-blob form `!3d-6.21!4d106.85`.
pub fn coordinates_from_url(url: &Url) -> Option<(f64, f64)> {
    let raw = url.as_str();

    if let Some((_, tail)) = raw.split_once('@') {
        let coords = tail.split('/').next().unwrap_or(tail);
        let mut parts = coords.split(',');
        if let (Some(lat), Some(lng)) = (parts.next(), parts.next()) {
            if let (Ok(lat), Ok(lng)) = (lat.parse::<f64>(), lng.parse::<f64>()) {
                return Some((lat, lng));
            }
        }
    }

    let lat_re = Regex::new(r"!3d(-?\d+\.?\d*)").ok()?;
    let lng_re = Regex::new(r"!4d(-?\d+\.?\d*)").ok()?;
    let lat = lat_re.captures(raw)?.get(1)?.as_str().parse().ok()?;
    let lng = lng_re.captures(raw)?.get(1)?.as_str().parse().ok()?;
    Some((lat, lng))
}

/// Scans the aria-labels found inside a review container for a star rating.
/// Returns `None` when no label parses to a 1..=5 value; the caller records
/// the rating as unknown rather than inventing one.
pub fn rating_from_aria_labels(labels: &[String]) -> Option<u8> {
    let digits = Regex::new(r"\d+").ok()?;
    for label in labels {
        let lower = label.to_lowercase();
        if !(lower.contains("star") || lower.contains("rated") || lower.contains("bintang")) {
            continue;
        }
        if let Some(m) = digits.find(label) {
            if let Ok(n) = m.as_str().parse::<u8>() {
                if (1..=5).contains(&n) {
                    return Some(n);
                }
            }
        }
    }
    None
}
