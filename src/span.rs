//! Flat spans: inclusive 1-based offsets into a neighborhood string.

/// An inclusive interval of 1-based offsets.
///
/// `left == right + 1` is the empty span just before `left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub left: usize,
    pub right: usize,
}

impl Span {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    /// True if `other` lies inside `self` (inclusive on both ends).
    pub fn covers(&self, other: &Span) -> bool {
        self.left <= other.left && other.right <= self.right
    }

    /// `right - left`, the measure used to prefer narrower covering spans.
    pub fn width(&self) -> usize {
        self.right.saturating_sub(self.left)
    }

    pub fn is_empty(&self) -> bool {
        self.left > self.right
    }

    /// 0-based, end-exclusive byte range of the span.
    pub(crate) fn byte_range(&self) -> std::ops::Range<usize> {
        self.left.saturating_sub(1)..self.right
    }
}
