//! Card, unit and pass-result data model
//!
//! Cards carry immutable attribute snapshots taken at render time; visibility
//! is an explicit state the render collaborator translates to presentation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single filterable note card
///
/// Local attributes are available without a network round-trip. The full note
/// body is fetched on demand through [`crate::content::ContentLookup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteCard {
    /// Unique, stable identifier
    pub id: String,
    pub title: String,
    /// Short content preview shown on the card
    pub preview: String,
    /// Identifier of the unit section this card belongs to
    pub unit: String,
    pub tags: String,
    pub date: String,
    /// Favorite marker as rendered ("true"/"false"), matched as plain text
    pub favorite: String,
    /// Whether the note carries an attached worksheet
    pub has_worksheet: bool,
}

impl NoteCard {
    /// Create a card with the required attributes; the rest default to empty
    pub fn new(id: &str, title: &str, preview: &str, unit: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            preview: preview.to_string(),
            unit: unit.to_string(),
            tags: String::new(),
            date: String::new(),
            favorite: String::new(),
            has_worksheet: false,
        }
    }

    /// Set the tags attribute
    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = tags.to_string();
        self
    }

    /// Set the date attribute
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    /// Set the favorite attribute
    pub fn with_favorite(mut self, favorite: &str) -> Self {
        self.favorite = favorite.to_string();
        self
    }

    /// Mark the card as carrying a worksheet
    pub fn with_worksheet(mut self, has_worksheet: bool) -> Self {
        self.has_worksheet = has_worksheet;
        self
    }

    /// The local attributes checked during the synchronous match step
    pub fn local_fields(&self) -> [&str; 6] {
        [
            &self.title,
            &self.preview,
            &self.unit,
            &self.tags,
            &self.date,
            &self.favorite,
        ]
    }
}

/// Explicit card visibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// Where a card's match came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOrigin {
    /// Matched one of the local attributes
    Local,
    /// Matched the fetched full note body
    Content,
}

/// Per-card outcome of a filter pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardResult {
    pub visibility: Visibility,
    /// Present for matched cards only
    pub origin: Option<MatchOrigin>,
    /// Highlighted title markup; None means render the plain title
    pub title_markup: Option<String>,
    /// Highlighted preview, or a highlighted snippet for content matches
    pub content_markup: Option<String>,
}

impl CardResult {
    /// A visible card with no markup (empty-query fast path)
    pub fn plain() -> Self {
        Self {
            visibility: Visibility::Visible,
            origin: None,
            title_markup: None,
            content_markup: None,
        }
    }

    /// A hidden card
    pub fn hidden() -> Self {
        Self {
            visibility: Visibility::Hidden,
            origin: None,
            title_markup: None,
            content_markup: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }
}

/// Derived visibility state of a unit section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitState {
    /// True iff at least one member card is visible
    pub visible: bool,
    /// Number of visible member cards
    pub display_count: usize,
}

/// The committed outcome of one complete filter pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    /// Sequence stamp of the pass that produced this result
    pub pass: u64,
    /// Outcome per card id
    pub cards: HashMap<String, CardResult>,
    /// Derived state per unit id
    pub units: HashMap<String, UnitState>,
    /// True iff cards exist but none is visible
    pub no_results: bool,
}

impl FilterResult {
    /// The state before any query: every card and unit visible, no markup
    pub fn initial(cards: &[NoteCard]) -> Self {
        let card_results: HashMap<String, CardResult> = cards
            .iter()
            .map(|card| (card.id.clone(), CardResult::plain()))
            .collect();
        let units = crate::units::unit_states(cards, &card_results);
        Self {
            pass: 0,
            cards: card_results,
            units,
            no_results: false,
        }
    }

    /// Visibility of a card by id; unknown ids are hidden
    pub fn is_visible(&self, id: &str) -> bool {
        self.cards.get(id).map(CardResult::is_visible).unwrap_or(false)
    }

    /// True iff any card is visible
    pub fn has_visible_cards(&self) -> bool {
        self.cards.values().any(CardResult::is_visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_fields_order() {
        let card = NoteCard::new("1", "Vectors", "intro to vectors", "U1")
            .with_tags("math,linear")
            .with_date("2024-03-01")
            .with_favorite("true");

        let fields = card.local_fields();
        assert_eq!(fields[0], "Vectors");
        assert_eq!(fields[1], "intro to vectors");
        assert_eq!(fields[2], "U1");
        assert_eq!(fields[3], "math,linear");
        assert_eq!(fields[4], "2024-03-01");
        assert_eq!(fields[5], "true");
    }

    #[test]
    fn test_initial_result_everything_visible() {
        let cards = vec![
            NoteCard::new("1", "Vectors", "intro", "U1"),
            NoteCard::new("2", "Matrices", "basics", "U2"),
        ];

        let result = FilterResult::initial(&cards);
        assert!(result.is_visible("1"));
        assert!(result.is_visible("2"));
        assert!(!result.no_results);
        assert!(result.units["U1"].visible);
        assert_eq!(result.units["U1"].display_count, 1);
        assert!(result.units["U2"].visible);
    }

    #[test]
    fn test_initial_result_empty_collection() {
        let result = FilterResult::initial(&[]);
        assert!(!result.no_results);
        assert!(result.cards.is_empty());
        assert!(result.units.is_empty());
    }

    #[test]
    fn test_unknown_id_is_hidden() {
        let result = FilterResult::initial(&[]);
        assert!(!result.is_visible("missing"));
    }

    #[test]
    fn test_card_serde_round_trip() {
        let card = NoteCard::new("7", "Graphs", "adjacency lists", "U3").with_worksheet(true);
        let json = serde_json::to_string(&card).unwrap();
        let back: NoteCard = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
