pub mod fields;
pub mod html;
pub mod text;

#[cfg(test)]
mod tests;

/// Where an extraction strategy looks for its element.
#[derive(Debug, Clone, Copy)]
pub enum Locator {
    /// CSS selector
    Css(&'static str),
    /// XPath expression
    XPath(&'static str),
}

/// One tier in an ordered fallback chain for a single listing field.
///
/// Tiers are tried in order until one yields a non-empty value the validator
/// accepts; a failed tier is skipped, never fatal.
#[derive(Debug, Clone, Copy)]
pub struct FieldStrategy {
    /// Element to look up.
    pub locator: Locator,

    /// Attribute to read instead of the element text, when set.
    pub attr: Option<&'static str>,

    /// Accepts or rejects the cleaned candidate value.
    pub validate: fn(&str) -> bool,
}

impl FieldStrategy {
    /// Strategy that reads the element text.
    pub const fn element(locator: Locator, validate: fn(&str) -> bool) -> Self {
        Self {
            locator,
            attr: None,
            validate,
        }
    }

    /// Strategy that reads an attribute value.
    pub const fn attribute(
        locator: Locator,
        attr: &'static str,
        validate: fn(&str) -> bool,
    ) -> Self {
        Self {
            locator,
            attr: Some(attr),
            validate,
        }
    }

    /// Clean a raw candidate and run it through the validator.
    pub fn accept(&self, raw: &str) -> Option<String> {
        let cleaned = text::clean_text(raw);
        if !cleaned.is_empty() && (self.validate)(&cleaned) {
            Some(cleaned)
        } else {
            None
        }
    }
}
