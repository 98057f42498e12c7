//! Local attribute matching
//!
//! Case-insensitive substring containment over a card's local attributes.
//! Match/no-match only; relevance scoring is out of scope.

use crate::model::NoteCard;

/// Check a normalized query against a card's local attributes
///
/// `query` must already be normalized (trimmed, case-folded); an empty query
/// never matches here because the empty case bypasses matching entirely.
pub fn local_match(card: &NoteCard, query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    card.local_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> NoteCard {
        NoteCard::new("1", "Vectors", "intro to vectors", "U1")
            .with_tags("math,linear")
            .with_date("2024-03-01")
            .with_favorite("true")
    }

    #[test]
    fn test_matches_title_case_insensitive() {
        assert!(local_match(&sample_card(), "vectors"));
        assert!(local_match(&sample_card(), "vec"));
    }

    #[test]
    fn test_matches_each_attribute() {
        let card = sample_card();
        assert!(local_match(&card, "intro"));
        assert!(local_match(&card, "u1"));
        assert!(local_match(&card, "linear"));
        assert!(local_match(&card, "2024-03"));
        assert!(local_match(&card, "true"));
    }

    #[test]
    fn test_no_match() {
        assert!(!local_match(&sample_card(), "calculus"));
    }

    #[test]
    fn test_empty_query_never_matches() {
        assert!(!local_match(&sample_card(), ""));
    }

    #[test]
    fn test_substring_not_word_bounded() {
        // Containment is plain substring, not whole-word
        assert!(local_match(&sample_card(), "ectors"));
    }
}
