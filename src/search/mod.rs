//! Matching and highlighting for note card filtering
//!
//! Local attribute matching is synchronous; cards that miss here fall back
//! to the content lookup path in [`crate::content`].

pub mod highlight;
pub mod matcher;
pub mod snippet;

pub use highlight::Highlighter;
pub use matcher::local_match;
pub use snippet::{extract_snippet, SNIPPET_RADIUS};
