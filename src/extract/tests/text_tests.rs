use crate::extract::text::{clean_text, normalize_key};

#[test]
fn test_clean_text() {
    // Empty and whitespace-only input
    assert_eq!(clean_text(""), "");
    assert_eq!(clean_text("   \n\t  "), "");

    // Already clean
    assert_eq!(clean_text("Great food"), "Great food");

    // Newlines and carriage returns collapse to single spaces
    assert_eq!(
        clean_text("Great food\nfriendly staff\r\nwill return"),
        "Great food friendly staff will return"
    );

    // Runs of mixed whitespace collapse
    assert_eq!(clean_text("  a \t b\n\n  c  "), "a b c");
}

#[test]
fn test_normalize_key_case_folds() {
    assert_eq!(normalize_key("Great Food!"), "great food!");
    assert_eq!(
        normalize_key("Great\nFood!"),
        normalize_key("  great food!  ")
    );
}

#[test]
fn test_normalize_key_collapses_reextractions() {
    // The same review re-extracted after a re-render differs only in
    // whitespace and must map to the same key.
    let first = "Lovely place,\nwould visit again.";
    let second = "Lovely place, would visit again.";
    assert_eq!(normalize_key(first), normalize_key(second));
}
