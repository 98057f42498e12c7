//! Filter pass orchestration
//!
//! One pass takes a query snapshot and the current card collection, runs the
//! synchronous local-attribute check, fans out content lookups for the
//! misses, joins them all, then applies visibility, markup and unit states
//! atomically. No partial pass is ever observable.

use crate::content::{ContentLookup, ContentSource};
use crate::error::normalize_query;
use crate::model::{CardResult, FilterResult, MatchOrigin, NoteCard, Visibility};
use crate::search::highlight::Highlighter;
use crate::search::matcher::local_match;
use crate::search::snippet::{extract_snippet, SNIPPET_RADIUS};
use crate::units::unit_states;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::debug;

/// Runs complete filter passes over a card collection
pub struct FilterEngine<S> {
    lookup: ContentLookup<S>,
    highlighter: Highlighter,
    snippet_radius: usize,
}

impl<S: ContentSource> FilterEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            lookup: ContentLookup::new(source),
            highlighter: Highlighter::default(),
            snippet_radius: SNIPPET_RADIUS,
        }
    }

    /// Replace the default markup markers
    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Adjust the snippet window size
    pub fn with_snippet_radius(mut self, radius: usize) -> Self {
        self.snippet_radius = radius;
        self
    }

    /// The content cache backing this engine's lookups
    pub fn cache(&self) -> &crate::cache::ContentCache {
        self.lookup.cache()
    }

    /// Execute one complete filter pass
    ///
    /// The result's `pass` stamp is left at zero; the scheduler assigns it
    /// when sequencing passes.
    pub async fn run_filter(
        &self,
        raw_query: &str,
        worksheets_only: bool,
        cards: &[NoteCard],
    ) -> FilterResult {
        let query = normalize_query(raw_query);

        // Fast path: no query means everything is visible with plain text,
        // the worksheet toggle included.
        if query.is_empty() {
            debug!("Empty query, showing all {} cards", cards.len());
            return FilterResult::initial(cards);
        }

        let mut results: HashMap<String, CardResult> = HashMap::new();
        let mut misses: Vec<&NoteCard> = Vec::new();

        for card in cards {
            if worksheets_only && !card.has_worksheet {
                results.insert(card.id.clone(), CardResult::hidden());
                continue;
            }
            if local_match(card, &query) {
                results.insert(
                    card.id.clone(),
                    CardResult {
                        visibility: Visibility::Visible,
                        origin: Some(MatchOrigin::Local),
                        title_markup: None,
                        content_markup: None,
                    },
                );
            } else {
                results.insert(card.id.clone(), CardResult::hidden());
                misses.push(card);
            }
        }

        // Fan out lookups for the local misses and join them all before any
        // result is applied.
        let lookups = misses.iter().map(|card| {
            let id = card.id.clone();
            async move {
                let content = self.lookup.lookup(&id).await;
                (id, content)
            }
        });
        let settled: Vec<(String, Option<String>)> = join_all(lookups).await;

        let mut matched_bodies: HashMap<String, String> = HashMap::new();
        for (id, content) in settled {
            if let Some(body) = content {
                if body.contains(&query) {
                    if let Some(entry) = results.get_mut(&id) {
                        entry.visibility = Visibility::Visible;
                        entry.origin = Some(MatchOrigin::Content);
                    }
                    matched_bodies.insert(id, body);
                }
            }
        }

        // Markup for the visible cards: highlighted title everywhere, and a
        // highlighted snippet replacing the preview for content matches.
        for card in cards {
            let entry = match results.get_mut(&card.id) {
                Some(entry) if entry.is_visible() => entry,
                _ => continue,
            };
            entry.title_markup = Some(self.highlighter.highlight(&card.title, &query));
            entry.content_markup = match entry.origin {
                Some(MatchOrigin::Content) => matched_bodies
                    .get(&card.id)
                    .and_then(|body| extract_snippet(body, &query, self.snippet_radius))
                    .map(|snippet| self.highlighter.highlight(&snippet, &query)),
                _ => Some(self.highlighter.highlight(&card.preview, &query)),
            };
        }

        let visible = results.values().filter(|entry| entry.is_visible()).count();
        let no_results = !cards.is_empty() && visible == 0;
        let units = unit_states(cards, &results);

        debug!(
            "Filter pass for '{}' matched {}/{} cards",
            query,
            visible,
            cards.len()
        );

        FilterResult {
            pass: 0,
            cards: results,
            units,
            no_results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContentBody, ContentSource};
    use crate::error::FilterError;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Source serving canned bodies; unknown ids fail with a transport error
    struct CannedSource {
        calls: Arc<AtomicUsize>,
        bodies: Vec<(String, String)>,
    }

    impl CannedSource {
        fn new(bodies: &[(&str, &str)]) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                bodies: bodies
                    .iter()
                    .map(|(id, body)| (id.to_string(), body.to_string()))
                    .collect(),
            }
        }

        fn empty() -> Self {
            Self::new(&[])
        }
    }

    impl ContentSource for CannedSource {
        fn fetch_content(
            &self,
            id: &str,
        ) -> impl Future<Output = Result<ContentBody, FilterError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let body = self
                .bodies
                .iter()
                .find(|(candidate, _)| candidate == id)
                .map(|(_, body)| body.clone());
            async move {
                match body {
                    Some(content) => Ok(ContentBody { content }),
                    None => Err(FilterError::Transport("connection refused".to_string())),
                }
            }
        }
    }

    fn sample_cards() -> Vec<NoteCard> {
        vec![
            NoteCard::new("1", "Vectors", "intro to vectors", "U1"),
            NoteCard::new("2", "Matrices", "row operations", "U1").with_worksheet(true),
            NoteCard::new("3", "Sequences", "limits and sums", "U2"),
        ]
    }

    #[tokio::test]
    async fn test_empty_query_shows_everything() {
        let engine = FilterEngine::new(CannedSource::empty());
        let result = engine.run_filter("   ", true, &sample_cards()).await;

        assert!(result.is_visible("1"));
        assert!(result.is_visible("2"));
        assert!(result.is_visible("3"));
        assert!(!result.no_results);
        assert!(result.units["U1"].visible);
        assert_eq!(result.units["U1"].display_count, 2);
        // Plain text, no markup
        assert!(result.cards["1"].title_markup.is_none());
    }

    #[tokio::test]
    async fn test_local_match_highlights_title_and_preview() {
        let engine = FilterEngine::new(CannedSource::empty());
        let result = engine.run_filter("Vectors", false, &sample_cards()).await;

        assert!(result.is_visible("1"));
        assert!(!result.is_visible("2"));
        assert!(!result.is_visible("3"));

        let card = &result.cards["1"];
        assert_eq!(card.origin, Some(MatchOrigin::Local));
        assert_eq!(
            card.title_markup.as_deref(),
            Some("<mark class=\"highlight\">Vectors</mark>")
        );
        assert_eq!(
            card.content_markup.as_deref(),
            Some("intro to <mark class=\"highlight\">vectors</mark>")
        );
    }

    #[tokio::test]
    async fn test_worksheet_toggle_excludes_cards_without_worksheets() {
        let engine = FilterEngine::new(CannedSource::empty());
        // "o" occurs in every card's attributes
        let result = engine.run_filter("o", true, &sample_cards()).await;

        assert!(!result.is_visible("1"));
        assert!(result.is_visible("2"));
        assert!(!result.is_visible("3"));
        assert_eq!(result.units["U1"].display_count, 1);
        assert!(!result.units["U2"].visible);
    }

    #[tokio::test]
    async fn test_content_match_replaces_preview_with_snippet() {
        let source = CannedSource::new(&[("3", "This note discusses eigenvalues widely.")]);
        let engine = FilterEngine::new(source).with_snippet_radius(10);
        let result = engine.run_filter("eigen", false, &sample_cards()).await;

        assert!(result.is_visible("3"));
        let card = &result.cards["3"];
        assert_eq!(card.origin, Some(MatchOrigin::Content));
        let markup = card.content_markup.as_deref().unwrap();
        assert!(markup.contains("eigen"), "snippet should contain the match: {}", markup);
        assert!(markup.starts_with("..."), "left edge clipped: {}", markup);
        // Whole-word highlighting never fires inside "eigenvalues"
        assert!(!markup.contains("<mark"));
    }

    #[tokio::test]
    async fn test_content_match_whole_word_gets_highlighted_snippet() {
        let source = CannedSource::new(&[("3", "Deep dive: eigen decompositions in practice.")]);
        let engine = FilterEngine::new(source);
        let result = engine.run_filter("eigen", false, &sample_cards()).await;

        let markup = result.cards["3"].content_markup.as_deref().unwrap();
        assert!(markup.contains("<mark class=\"highlight\">eigen</mark>"));
    }

    #[tokio::test]
    async fn test_lookup_failure_degrades_to_hidden() {
        let engine = FilterEngine::new(CannedSource::empty());
        let result = engine.run_filter("eigen", false, &sample_cards()).await;

        assert!(!result.has_visible_cards());
        assert!(result.no_results);
    }

    #[tokio::test]
    async fn test_failed_sibling_does_not_abort_pass() {
        // Card 1 matches locally, card 3's lookup fails; the pass still
        // completes with card 1 visible.
        let engine = FilterEngine::new(CannedSource::empty());
        let result = engine.run_filter("vectors", false, &sample_cards()).await;

        assert!(result.is_visible("1"));
        assert!(!result.is_visible("3"));
        assert!(!result.no_results);
    }

    #[tokio::test]
    async fn test_no_results_false_for_empty_collection() {
        let engine = FilterEngine::new(CannedSource::empty());
        let result = engine.run_filter("anything", false, &[]).await;
        assert!(!result.no_results);
    }

    #[tokio::test]
    async fn test_content_misses_do_not_refetch_cached_bodies() {
        let source = CannedSource::new(&[("3", "limits of eigen sequences")]);
        let calls = source.calls.clone();
        let engine = FilterEngine::new(source);
        let cards = sample_cards();

        let first = engine.run_filter("eigen", false, &cards).await;
        assert!(first.is_visible("3"));
        // All three cards missed locally: two failed fetches, one success
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let second = engine.run_filter("eigen", false, &cards).await;
        assert!(second.is_visible("3"));
        // The failed cards are re-attempted; "3" comes from cache
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_metacharacter_query_matches_literally() {
        let source = CannedSource::new(&[("3", "notes about a.b*c expressions")]);
        let engine = FilterEngine::new(source);
        let cards = sample_cards();

        let result = engine.run_filter("a.b*c", false, &cards).await;
        assert!(result.is_visible("3"));

        // "axbxc" must not be treated as a pattern match
        let source = CannedSource::new(&[("3", "notes about axbxc expressions")]);
        let engine = FilterEngine::new(source);
        let result = engine.run_filter("a.b*c", false, &cards).await;
        assert!(!result.is_visible("3"));
    }

    #[tokio::test]
    async fn test_query_normalization_trims_and_folds() {
        let engine = FilterEngine::new(CannedSource::empty());
        let result = engine.run_filter("  VECTORS ", false, &sample_cards()).await;
        assert!(result.is_visible("1"));
    }
}
