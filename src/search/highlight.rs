//! Query highlighting
//!
//! Wraps whole-word, case-insensitive occurrences of the query in markup
//! markers. The query is always treated as literal text: regex
//! metacharacters are escaped before the pattern is built, so arbitrary user
//! input cannot redefine the match.

use regex::RegexBuilder;

/// Wraps matched occurrences in configurable open/close markers
#[derive(Debug, Clone)]
pub struct Highlighter {
    open: String,
    close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new("<mark class=\"highlight\">", "</mark>")
    }
}

impl Highlighter {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: close.to_string(),
        }
    }

    /// Wrap every whole-word, case-insensitive occurrence of `query` in `text`
    ///
    /// An empty query returns the text unchanged. Interior spaces in a
    /// multi-word query are preserved verbatim, so the phrase matches as a
    /// whole.
    pub fn highlight(&self, text: &str, query: &str) -> String {
        if query.is_empty() {
            return text.to_string();
        }

        let pattern = format!(r"\b({})\b", regex::escape(query));
        let regex = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(_) => return text.to_string(),
        };

        regex
            .replace_all(text, |caps: &regex::Captures<'_>| {
                format!("{}{}{}", self.open, &caps[1], self.close)
            })
            .into_owned()
    }

    /// Remove highlight markers, restoring plain text
    pub fn strip(&self, text: &str) -> String {
        text.replace(&self.open, "").replace(&self.close, "")
    }
}
