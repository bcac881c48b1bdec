//! Find and replace over the active document.
//!
//! The bar is a small state machine: closed until invoked, then open
//! across any number of find/replace operations until explicitly closed.
//! Matching always rescans the full document text, so the reported count
//! can never drift from the content (see `scribe_buffer::search`).

use scribe_buffer::search::{self, SearchQuery};
use scribe_buffer::SearchMatch;

use crate::document::Document;
use crate::CoreResult;

/// State of the find/replace bar.
#[derive(Debug, Clone, Default)]
pub struct FindState {
    /// Whether the bar is open
    pub open: bool,
    /// Current search text
    pub query: String,
    /// Current replacement text
    pub replacement: String,
    /// Match letter case exactly
    pub case_sensitive: bool,
    /// Match whole words only
    pub whole_word: bool,
}

impl FindState {
    /// Creates a closed find state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current options as a buffer search query.
    pub fn search_query(&self) -> SearchQuery {
        SearchQuery {
            pattern: self.query.clone(),
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
        }
    }

    /// Opens the bar, seeding the query from a single-line selection.
    pub fn open_for(&mut self, doc: &Document) {
        self.open = true;
        if let Some(selected) = doc.selected_text() {
            if !selected.is_empty() && !selected.contains('\n') {
                self.query = selected;
            }
        }
    }

    /// Closes the bar. Query and options are kept for the next invocation.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Number of matches in the document right now.
    pub fn match_count(&self, doc: &Document) -> usize {
        search::find_all(&doc.text(), &self.search_query()).len()
    }

    /// Selects the next match after the cursor (or current selection),
    /// wrapping at the end of the document. Returns false when there is no
    /// match at all.
    pub fn find_next(&self, doc: &mut Document) -> bool {
        if self.query.is_empty() {
            return false;
        }
        let from = match doc.cursor().selection_range() {
            Some((_, end)) => doc
                .buffer()
                .position_to_char_idx(end)
                .unwrap_or_else(|_| doc.buffer().len_chars()),
            None => doc.cursor_char_idx(),
        };
        let found = search::find_next_from(&doc.text(), &self.search_query(), from);
        self.select(doc, found)
    }

    /// Selects the previous match before the cursor (or current selection),
    /// wrapping at the start of the document.
    pub fn find_previous(&self, doc: &mut Document) -> bool {
        if self.query.is_empty() {
            return false;
        }
        let from = match doc.cursor().selection_range() {
            Some((start, _)) => doc.buffer().position_to_char_idx(start).unwrap_or(0),
            None => doc.cursor_char_idx(),
        };
        let found = search::find_previous_from(&doc.text(), &self.search_query(), from);
        self.select(doc, found)
    }

    fn select(&self, doc: &mut Document, m: Option<SearchMatch>) -> bool {
        match m {
            Some(m) => {
                let start = doc.buffer().char_idx_to_position(m.start);
                let end = doc.buffer().char_idx_to_position(m.end);
                if let (Ok(start), Ok(end)) = (start, end) {
                    doc.set_selection(start, end);
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Replaces the currently selected match and advances to the next one.
    ///
    /// Text that is not a match is never touched: when the selection does
    /// not equal the query under the current options, this only finds.
    pub fn replace_current(&self, doc: &mut Document) -> CoreResult<bool> {
        if self.query.is_empty() {
            return Ok(false);
        }

        if let Some(selected) = doc.selected_text() {
            if self.equals_query(&selected) {
                doc.insert_at_cursor(&self.replacement)?;
            }
        }

        Ok(self.find_next(doc))
    }

    fn equals_query(&self, selected: &str) -> bool {
        if self.case_sensitive {
            selected == self.query
        } else {
            selected.to_lowercase() == self.query.to_lowercase()
        }
    }

    /// Replaces every match in one undo step and returns the count.
    pub fn replace_all(&self, doc: &mut Document) -> CoreResult<usize> {
        let matches = search::find_all(&doc.text(), &self.search_query());
        if matches.is_empty() {
            return Ok(0);
        }

        doc.buffer_mut().begin_edit_group();
        // Replace from the last match backwards so earlier offsets stay valid
        for m in matches.iter().rev() {
            doc.buffer_mut().replace(m.start..m.end, &self.replacement)?;
        }
        doc.buffer_mut().end_edit_group();

        let pos = doc.cursor_position();
        doc.set_cursor(pos);
        Ok(matches.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_buffer::Position;

    fn doc(text: &str) -> Document {
        let mut d = Document::new();
        d.buffer_mut().insert(0, text).unwrap();
        d.buffer_mut().set_modified(false);
        d.set_cursor(Position::ZERO);
        d
    }

    fn finder(query: &str) -> FindState {
        FindState {
            open: true,
            query: query.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_find_next_selects_first_match() {
        let mut d = doc("Hello World Hello");
        let f = finder("Hello");

        assert!(f.find_next(&mut d));
        assert_eq!(d.selected_text().as_deref(), Some("Hello"));
        assert_eq!(d.cursor_position(), Position::new(0, 5));
    }

    #[test]
    fn test_find_next_advances_past_selection() {
        let mut d = doc("Hello World Hello");
        let f = finder("Hello");

        f.find_next(&mut d);
        f.find_next(&mut d);
        assert_eq!(d.cursor_position(), Position::new(0, 17));
    }

    #[test]
    fn test_find_next_wraps_to_start() {
        let mut d = doc("abcabc");
        let f = finder("abc");
        d.set_cursor(Position::new(0, 6));

        assert!(f.find_next(&mut d));
        let (start, _) = d.cursor().selection_range().unwrap();
        assert_eq!(start, Position::new(0, 0));
    }

    #[test]
    fn test_find_previous_wraps_to_end() {
        let mut d = doc("Hello World Hello");
        let f = finder("Hello");

        assert!(f.find_previous(&mut d));
        let (start, _) = d.cursor().selection_range().unwrap();
        assert_eq!(start, Position::new(0, 12));
    }

    #[test]
    fn test_find_case_insensitive_by_default() {
        let mut d = doc("hello HELLO");
        let f = finder("Hello");
        assert_eq!(f.match_count(&d), 2);
        assert!(f.find_next(&mut d));
    }

    #[test]
    fn test_find_case_sensitive() {
        let mut d = doc("Hello hello HELLO");
        let mut f = finder("hello");
        f.case_sensitive = true;

        assert_eq!(f.match_count(&d), 1);
        assert!(f.find_next(&mut d));
        assert_eq!(d.selected_text().as_deref(), Some("hello"));
        let (start, _) = d.cursor().selection_range().unwrap();
        assert_eq!(start, Position::new(0, 6));
    }

    #[test]
    fn test_find_whole_word() {
        let mut f = finder("low");
        f.whole_word = true;

        let d = doc("lower low below");
        assert_eq!(f.match_count(&d), 1);
    }

    #[test]
    fn test_find_empty_query() {
        let mut d = doc("Hello World");
        let f = finder("");
        assert!(!f.find_next(&mut d));
        assert_eq!(f.match_count(&d), 0);
    }

    #[test]
    fn test_find_no_match() {
        let mut d = doc("Hello World");
        let f = finder("xyz");
        assert!(!f.find_next(&mut d));
    }

    #[test]
    fn test_replace_current_replaces_and_advances() {
        let mut d = doc("Hello World Hello");
        let mut f = finder("Hello");
        f.replacement = "Hi".to_string();

        f.find_next(&mut d);
        f.replace_current(&mut d).unwrap();

        assert!(d.text().starts_with("Hi World"));
        // Advanced to the next occurrence
        assert_eq!(d.selected_text().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_replace_current_without_match_only_finds() {
        let mut d = doc("Hello World");
        let mut f = finder("Hello");
        f.replacement = "Hi".to_string();

        // No selection yet: nothing replaced, first match selected
        assert!(f.replace_current(&mut d).unwrap());
        assert_eq!(d.text(), "Hello World");
        assert_eq!(d.selected_text().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_replace_all_counts_and_is_single_undo_step() {
        let mut d = doc("foo foo foo");
        let mut f = finder("foo");
        f.replacement = "bar".to_string();

        let count = f.replace_all(&mut d).unwrap();
        assert_eq!(count, 3);
        assert_eq!(d.text(), "bar bar bar");

        d.undo().unwrap();
        assert_eq!(d.text(), "foo foo foo");
    }

    #[test]
    fn test_replace_all_case_sensitive() {
        let mut d = doc("Hello hello HELLO");
        let mut f = finder("hello");
        f.replacement = "hi".to_string();
        f.case_sensitive = true;

        assert_eq!(f.replace_all(&mut d).unwrap(), 1);
        assert_eq!(d.text(), "Hello hi HELLO");
    }

    #[test]
    fn test_replace_all_with_empty_replacement_deletes() {
        let mut d = doc("Hello World");
        let mut f = finder(" World");
        f.replacement = String::new();

        assert_eq!(f.replace_all(&mut d).unwrap(), 1);
        assert_eq!(d.text(), "Hello");
    }

    #[test]
    fn test_replace_all_no_match() {
        let mut d = doc("Hello World");
        let mut f = finder("xyz");
        f.replacement = "abc".to_string();

        assert_eq!(f.replace_all(&mut d).unwrap(), 0);
        assert_eq!(d.text(), "Hello World");
        assert!(!d.is_modified());
    }

    #[test]
    fn test_open_seeds_query_from_selection() {
        let mut d = doc("Hello World");
        d.set_selection(Position::new(0, 0), Position::new(0, 5));

        let mut f = FindState::new();
        f.open_for(&d);
        assert!(f.open);
        assert_eq!(f.query, "Hello");
    }

    #[test]
    fn test_close_keeps_query() {
        let mut f = finder("needle");
        f.close();
        assert!(!f.open);
        assert_eq!(f.query, "needle");
    }
}
