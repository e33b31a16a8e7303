pub mod web;

pub use web::{FeedSource, ReviewSource, WebSession};
