//! Position types for buffer coordinates.
//!
//! Positions are what the host editor deals in; the search itself works on
//! flat [`Span`](crate::span::Span)s and converts at the edges.

use std::fmt;

/// A position in the buffer, represented as line and column.
///
/// Both `line` and `col` are 1-indexed and columns count bytes. A column
/// one past the end of a line addresses the line break.
///
/// Ordering is lexicographic: line first, then column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// The first byte of the buffer.
    pub fn start() -> Self {
        Self { line: 1, col: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// An inclusive range of buffer positions.
///
/// A region whose `left` comes after its `right` is empty; that is how an
/// "inside" textobject with nothing inside is reported. The `right` edge of
/// an empty region at column 1 sits at column 0, the only place a column
/// below 1 appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub left: Position,
    pub right: Position,
}

impl Region {
    pub fn new(left: Position, right: Position) -> Self {
        Self { left, right }
    }

    /// The one-byte region under a cursor.
    pub fn at(cursor: Position) -> Self {
        Self {
            left: cursor,
            right: cursor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left > self.right
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.left, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_order_by_line_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(2, 1) < Position::new(2, 3));
        assert_eq!(Position::start(), Position::new(1, 1));
    }

    #[test]
    fn region_emptiness() {
        assert!(!Region::at(Position::new(3, 4)).is_empty());
        assert!(Region::new(Position::new(1, 5), Position::new(1, 4)).is_empty());
        assert!(Region::new(Position::new(2, 1), Position::new(1, 8)).is_empty());
        assert!(!Region::new(Position::new(1, 8), Position::new(2, 1)).is_empty());
    }

    #[test]
    fn display() {
        let r = Region::new(Position::new(1, 2), Position::new(3, 4));
        assert_eq!(r.to_string(), "1:2-3:4");
    }
}
