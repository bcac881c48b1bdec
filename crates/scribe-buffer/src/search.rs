//! Full-text search over buffer content.
//!
//! Matching is a plain scan of the whole text on every call. That is a
//! deliberate tradeoff: the match set is always consistent with the current
//! content, and documents in this editor are assumed small enough that a
//! rescan per keystroke is cheap. No incremental index is kept.

use serde::{Deserialize, Serialize};

/// Options for a text search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// The text to search for
    pub pattern: String,
    /// Match letter case exactly
    pub case_sensitive: bool,
    /// Require non-word characters (or boundaries) on both sides
    pub whole_word: bool,
}

impl SearchQuery {
    /// Creates a case-insensitive, non-whole-word query.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Default::default()
        }
    }
}

/// A single match, as a half-open character-index range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Character index of the first matched character
    pub start: usize,
    /// Character index one past the last matched character
    pub end: usize,
}

impl SearchMatch {
    /// Length of the match in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-length match (never produced by `find_all`).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Returns true for characters that form words: alphanumerics and `_`.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn chars_eq(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a == b || a.to_lowercase().eq(b.to_lowercase())
    }
}

/// Finds all non-overlapping matches of `query` in `text`, in order.
///
/// An empty pattern matches nothing.
pub fn find_all(text: &str, query: &SearchQuery) -> Vec<SearchMatch> {
    let needle: Vec<char> = query.pattern.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let haystack: Vec<char> = text.chars().collect();
    let mut matches = Vec::new();
    let mut i = 0;

    while i + needle.len() <= haystack.len() {
        let hit = haystack[i..i + needle.len()]
            .iter()
            .zip(&needle)
            .all(|(&h, &n)| chars_eq(h, n, query.case_sensitive));

        if hit && (!query.whole_word || is_word_bounded(&haystack, i, i + needle.len())) {
            matches.push(SearchMatch {
                start: i,
                end: i + needle.len(),
            });
            i += needle.len();
        } else {
            i += 1;
        }
    }

    matches
}

fn is_word_bounded(haystack: &[char], start: usize, end: usize) -> bool {
    let before_ok = start == 0 || !is_word_char(haystack[start - 1]);
    let after_ok = end == haystack.len() || !is_word_char(haystack[end]);
    before_ok && after_ok
}

/// Finds the first match starting at or after `from`, wrapping to the
/// start of the text when none remains.
pub fn find_next_from(text: &str, query: &SearchQuery, from: usize) -> Option<SearchMatch> {
    let matches = find_all(text, query);
    matches
        .iter()
        .find(|m| m.start >= from)
        .or(matches.first())
        .copied()
}

/// Finds the last match ending at or before `from`, wrapping to the end of
/// the text when none precedes it.
pub fn find_previous_from(text: &str, query: &SearchQuery, from: usize) -> Option<SearchMatch> {
    let matches = find_all(text, query);
    matches
        .iter()
        .rev()
        .find(|m| m.end <= from)
        .or(matches.last())
        .copied()
}
