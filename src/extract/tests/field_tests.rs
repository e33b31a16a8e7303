use url::Url;

use crate::extract::fields::{
    self, coordinates_from_url, long_prose, looks_like_price, not_rating_like,
    rating_from_aria_labels,
};
use crate::extract::{FieldStrategy, Locator};

#[test]
fn test_coordinates_from_viewport_url() {
    let url =
        Url::parse("https://maps.google.com/maps/place/Foo/@-6.2146,106.8451,15z/data=abc").unwrap();
    let (lat, lng) = coordinates_from_url(&url).unwrap();
    assert!((lat - -6.2146).abs() < 1e-9);
    assert!((lng - 106.8451).abs() < 1e-9);
}

#[test]
fn test_coordinates_from_data_blob_url() {
    let url = Url::parse("https://maps.google.com/maps/place/Foo/data=!3d-6.19!4d106.82").unwrap();
    let (lat, lng) = coordinates_from_url(&url).unwrap();
    assert!((lat - -6.19).abs() < 1e-9);
    assert!((lng - 106.82).abs() < 1e-9);
}

#[test]
fn test_coordinates_absent() {
    let url = Url::parse("https://maps.google.com/").unwrap();
    assert_eq!(coordinates_from_url(&url), None);
}

#[test]
fn test_malformed_viewport_falls_back_to_data_blob() {
    // '@' present but not followed by coordinates; the data blob still parses
    let url = Url::parse("https://maps.google.com/place/a@b/data=!3d1.5!4d2.5").unwrap();
    assert_eq!(coordinates_from_url(&url), Some((1.5, 2.5)));
}

#[test]
fn test_rating_from_aria_labels() {
    let labels = vec![
        "Share".to_string(),
        "Rated 4 out of 5 stars".to_string(),
    ];
    assert_eq!(rating_from_aria_labels(&labels), Some(4));

    // Indonesian locale
    let labels = vec!["Bintang 5".to_string()];
    assert_eq!(rating_from_aria_labels(&labels), Some(5));

    // No rating-shaped label: unknown, never invented
    let labels = vec!["Share".to_string(), "Photo of food".to_string()];
    assert_eq!(rating_from_aria_labels(&labels), None);

    // Out-of-range numbers are rejected
    let labels = vec!["Rated 7 stars".to_string()];
    assert_eq!(rating_from_aria_labels(&labels), None);
}

#[test]
fn test_category_validator_rejects_rating_text() {
    assert!(not_rating_like("Italian restaurant"));
    assert!(!not_rating_like("4.5"));
    assert!(!not_rating_like("4,5 (1.203)"));
}

#[test]
fn test_price_validator() {
    assert!(looks_like_price("Rp 50.000-100.000"));
    assert!(looks_like_price("$$"));
    assert!(looks_like_price("Rentang harga: Rp 25.000"));
    assert!(!looks_like_price("Open 24 hours"));
}

#[test]
fn test_description_validator() {
    assert!(long_prose("A cozy trattoria serving handmade pasta."));
    assert!(!long_prose("Short"));
    assert!(!long_prose("1234567890123456789012345"));
}

#[test]
fn test_strategy_accept_cleans_before_validating() {
    let strategy = FieldStrategy::element(Locator::Css("h1"), fields::non_empty);
    assert_eq!(
        strategy.accept("  Sapori \n d'Italia  "),
        Some("Sapori d'Italia".to_string())
    );
    assert_eq!(strategy.accept("   \n  "), None);
}

#[test]
fn test_strategy_accept_applies_validator() {
    let strategy = FieldStrategy::element(Locator::Css("button"), not_rating_like);
    assert_eq!(strategy.accept("Pizza place"), Some("Pizza place".to_string()));
    assert_eq!(strategy.accept("4.2 stars"), None);
}
