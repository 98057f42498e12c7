//! notefilter: incremental search and filtering for note card collections
//!
//! Filters a rendered list of note cards against a user-typed query:
//! - synchronous matching on locally-available card attributes;
//! - an asynchronous fallback that fetches and caches full note bodies when
//!   the local attributes miss;
//! - snippet extraction and whole-word highlighting around the match;
//! - unit section visibility derived from member card visibility;
//! - debounced scheduling with last-writer-wins pass commits.
//!
//! Presentation is an external collaborator: it supplies the card
//! collection and a [`content::ContentSource`], feeds input events into the
//! [`schedule::FilterScheduler`], and renders the committed
//! [`model::FilterResult`].

pub mod cache;
pub mod content;
pub mod error;
pub mod filter;
pub mod http;
pub mod model;
pub mod schedule;
pub mod search;
pub mod units;

pub use cache::ContentCache;
pub use content::{ContentBody, ContentLookup, ContentSource, HttpContentSource, FETCH_TIMEOUT};
pub use error::{normalize_content, normalize_query, FilterError};
pub use filter::FilterEngine;
pub use model::{CardResult, FilterResult, MatchOrigin, NoteCard, UnitState, Visibility};
pub use schedule::{FilterScheduler, DEBOUNCE_WINDOW};
pub use search::{extract_snippet, local_match, Highlighter, SNIPPET_RADIUS};
pub use units::{recompute_unit, unit_states};
