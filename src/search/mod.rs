//! Search module - autocomplete suggestions over POI text columns
//!
//! No relevance scoring: each column is matched by substring and hits are
//! merged in a fixed column order, deduplicated and capped.

pub mod autocomplete;

pub use autocomplete::{autocomplete, merge_suggestions, SuggestField, Suggestion};
