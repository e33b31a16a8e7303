use scraper::{Html, Selector};

use super::text;

/// Last-resort extraction tier: parse the raw page source and try CSS
/// selectors against it. Used when every live element lookup for a field
/// failed, which happens when the panel re-rendered mid-query.
pub fn first_valid_text(source: &str, selectors: &[&str], validate: fn(&str) -> bool) -> Option<String> {
    let document = Html::parse_document(source);

    for css in selectors {
        let selector = match Selector::parse(css) {
            Ok(selector) => selector,
            Err(_) => {
                ::log::debug!("Skipping invalid CSS selector: {}", css);
                continue;
            }
        };

        for element in document.select(&selector) {
            let raw = element.text().collect::<Vec<_>>().join(" ");
            let cleaned = text::clean_text(&raw);
            if !cleaned.is_empty() && validate(&cleaned) {
                return Some(cleaned);
            }
        }
    }

    None
}
