use crate::extract::fields;
use crate::extract::html::first_valid_text;

const PANEL: &str = r#"
<html><body>
  <div class="lMbq3e"><h1 class="DUwDvf">Sapori d'Italia</h1></div>
  <button class="DkEaL">4.5</button>
  <span class="DkEaL">Italian restaurant</span>
  <span class="HlvSq">A cozy trattoria serving handmade pasta daily.</span>
</body></html>
"#;

#[test]
fn test_name_from_source() {
    let name = first_valid_text(PANEL, fields::NAME_SOURCE_CSS, fields::non_empty);
    assert_eq!(name, Some("Sapori d'Italia".to_string()));
}

#[test]
fn test_category_skips_rating_shaped_match() {
    // The first selector hits the rating button; the validator rejects it and
    // the span tier supplies the real category.
    let category = first_valid_text(PANEL, fields::CATEGORY_SOURCE_CSS, fields::not_rating_like);
    assert_eq!(category, Some("Italian restaurant".to_string()));
}

#[test]
fn test_description_from_source() {
    let description =
        first_valid_text(PANEL, fields::DESCRIPTION_SOURCE_CSS, fields::long_prose);
    assert_eq!(
        description,
        Some("A cozy trattoria serving handmade pasta daily.".to_string())
    );
}

#[test]
fn test_missing_elements_yield_none() {
    let html = "<html><body><p>nothing here</p></body></html>";
    assert_eq!(
        first_valid_text(html, fields::NAME_SOURCE_CSS, fields::non_empty),
        None
    );
}

#[test]
fn test_invalid_selector_is_skipped() {
    let selectors = ["<<<", "h1.DUwDvf"];
    let name = first_valid_text(PANEL, &selectors, fields::non_empty);
    assert_eq!(name, Some("Sapori d'Italia".to_string()));
}
