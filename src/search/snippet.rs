//! Snippet extraction around a content match
//!
//! Content matches replace the card's preview with an excerpt centered on
//! the first occurrence of the query, clipped to a character radius with
//! ellipsis markers on clipped edges.

/// Characters kept on each side of the matched substring
pub const SNIPPET_RADIUS: usize = 100;

const ELLIPSIS: &str = "...";

/// Extract a bounded excerpt around the first occurrence of `query`
///
/// The occurrence check is a plain case-insensitive substring match, not
/// word-bounded. Returns None when the query does not occur; callers are
/// expected to have established a match beforehand. The window is measured
/// in characters and never splits a code point.
pub fn extract_snippet(full_text: &str, query: &str, radius: usize) -> Option<String> {
    if query.is_empty() {
        return None;
    }

    let folded = full_text.to_lowercase();
    let needle = query.to_lowercase();
    let match_byte = folded.find(&needle)?;

    let match_char = folded[..match_byte].chars().count();
    let needle_chars = needle.chars().count();
    let total_chars = folded.chars().count();

    let start_char = match_char.saturating_sub(radius);
    let end_char = (match_char + needle_chars + radius).min(total_chars);

    let start_byte = char_to_byte(&folded, start_char);
    let end_byte = char_to_byte(&folded, end_char);

    let mut snippet = String::new();
    if start_char > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.push_str(&folded[start_byte..end_byte]);
    if end_char < total_chars {
        snippet.push_str(ELLIPSIS);
    }
    Some(snippet)
}

/// Byte offset of the char at `char_idx`, or the text length past the end
fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
