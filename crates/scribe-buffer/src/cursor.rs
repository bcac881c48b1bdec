//! Cursor and position types for text navigation.

use serde::{Deserialize, Serialize};

/// A position in the text buffer (line and column).
///
/// Both line and column are 0-indexed; columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position at the start of the document.
    pub const ZERO: Position = Position { line: 0, column: 0 };

    /// Returns true if this position is before another.
    pub fn is_before(&self, other: &Position) -> bool {
        self.line < other.line || (self.line == other.line && self.column < other.column)
    }

    /// Returns true if this position is after another.
    pub fn is_after(&self, other: &Position) -> bool {
        other.is_before(self)
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display as 1-indexed for user-facing output
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A cursor with a position and an optional selection anchor.
///
/// When `anchor` is set, the text between anchor and position is selected;
/// the anchor may lie on either side of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    /// Current cursor position
    pub position: Position,

    /// Selection anchor (if selecting text)
    pub anchor: Option<Position>,
}

impl Cursor {
    /// Creates a new cursor at a position.
    pub fn new(position: Position) -> Self {
        Self {
            position,
            anchor: None,
        }
    }

    /// Creates a cursor at line 0, column 0.
    pub fn at_start() -> Self {
        Self::new(Position::ZERO)
    }

    /// Moves the cursor to a new position, clearing selection.
    pub fn move_to(&mut self, position: Position) {
        self.position = position;
        self.anchor = None;
    }

    /// Moves the cursor, extending selection from the current position.
    pub fn select_to(&mut self, position: Position) {
        if self.anchor.is_none() {
            self.anchor = Some(self.position);
        }
        self.position = position;
    }

    /// Selects the range from `start` to `end`, leaving the cursor at `end`.
    pub fn select_range(&mut self, start: Position, end: Position) {
        self.anchor = Some(start);
        self.position = end;
    }

    /// Clears any selection, keeping cursor position.
    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Returns true if text is selected.
    pub fn has_selection(&self) -> bool {
        self.anchor.is_some() && self.anchor != Some(self.position)
    }

    /// Returns the selection range (start, end) if text is selected.
    /// Start is always before end, regardless of selection direction.
    pub fn selection_range(&self) -> Option<(Position, Position)> {
        self.anchor.map(|anchor| {
            if anchor.is_before(&self.position) {
                (anchor, self.position)
            } else {
                (self.position, anchor)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        let p1 = Position::new(1, 5);
        let p2 = Position::new(2, 3);
        let p3 = Position::new(1, 10);

        assert!(p1.is_before(&p2));
        assert!(p1.is_before(&p3));
        assert!(p2.is_after(&p1));
        assert!(p2.is_after(&p3));
    }

    #[test]
    fn test_cursor_selection() {
        let mut cursor = Cursor::new(Position::new(1, 5));
        assert!(!cursor.has_selection());

        cursor.select_to(Position::new(2, 3));
        assert!(cursor.has_selection());

        let (start, end) = cursor.selection_range().unwrap();
        assert_eq!(start, Position::new(1, 5));
        assert_eq!(end, Position::new(2, 3));
    }

    #[test]
    fn test_backward_selection_normalized() {
        let mut cursor = Cursor::new(Position::new(3, 0));
        cursor.select_to(Position::new(1, 2));

        let (start, end) = cursor.selection_range().unwrap();
        assert_eq!(start, Position::new(1, 2));
        assert_eq!(end, Position::new(3, 0));
    }

    #[test]
    fn test_display_is_one_indexed() {
        assert_eq!(Position::new(0, 0).to_string(), "1:1");
        assert_eq!(Position::new(9, 4).to_string(), "10:5");
    }
}
