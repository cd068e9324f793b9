//! Flattened text windows around a reference region.
//!
//! A neighborhood joins a run of buffer lines into one string, each line
//! followed by a `\n` sentinel, so that multi-line matches are plain string
//! matches. Offsets into that string are 1-based, like [`Span`]s.

use crate::lines::LineSource;
use crate::position::{Position, Region};
use crate::span::Span;

/// A window of buffer lines flattened into one searchable string.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    text: String,
    /// Buffer line number of the first line in the window.
    first_line: usize,
    /// Byte length of every window line, without its sentinel.
    line_lens: Vec<usize>,
}

impl Neighborhood {
    /// Build the window covering `region` plus `n_neighbors` lines on each side.
    ///
    /// Region lines are clamped to the buffer.
    pub fn around<L: LineSource + ?Sized>(lines: &L, region: &Region, n_neighbors: usize) -> Self {
        let last = lines.line_count().max(1);
        let top = region.left.line.min(region.right.line).clamp(1, last);
        let bottom = region.left.line.max(region.right.line).clamp(1, last);
        let from = top.saturating_sub(n_neighbors).max(1);
        let to = bottom.saturating_add(n_neighbors).min(last);

        let mut text = String::new();
        let mut line_lens = Vec::with_capacity(to - from + 1);
        for line in from..=to {
            let content = lines.line(line);
            line_lens.push(content.len());
            text.push_str(&content);
            text.push('\n');
        }
        Self {
            text,
            first_line: from,
            line_lens,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    /// First and last buffer line inside the window.
    pub fn line_range(&self) -> std::ops::RangeInclusive<usize> {
        self.first_line..=self.first_line + self.line_lens.len() - 1
    }

    /// Offset of `pos` in the flattened text.
    ///
    /// Lines outside the window are clamped to its edges.
    pub fn pos_to_offset(&self, pos: Position) -> usize {
        let last = self.first_line + self.line_lens.len() - 1;
        let line = pos.line.clamp(self.first_line, last);
        let above: usize = self.line_lens[..line - self.first_line]
            .iter()
            .map(|len| len + 1)
            .sum();
        above + pos.col
    }

    /// Position of `offset` in buffer coordinates.
    ///
    /// The sentinel after a line maps to column `len + 1` of that line.
    /// Offset 0 maps to column 0 of the first line, the right edge of an empty
    /// region at the window start. Offsets past the end map to the last
    /// sentinel.
    pub fn offset_to_pos(&self, offset: usize) -> Position {
        if offset == 0 {
            return Position::new(self.first_line, 0);
        }
        let mut rest = offset;
        for (idx, len) in self.line_lens.iter().enumerate() {
            if rest <= len + 1 {
                return Position::new(self.first_line + idx, rest);
            }
            rest -= len + 1;
        }
        let last = self.line_lens.len() - 1;
        Position::new(self.first_line + last, self.line_lens[last] + 1)
    }

    pub fn region_to_span(&self, region: &Region) -> Span {
        Span::new(self.pos_to_offset(region.left), self.pos_to_offset(region.right))
    }

    pub fn span_to_region(&self, span: Span) -> Region {
        Region::new(self.offset_to_pos(span.left), self.offset_to_pos(span.right))
    }
}
