//! Pattern matcher: find matches of a [`Pattern`] in a byte string.
//!
//! All positions are 0-based **byte** indices; match ends are exclusive.

use super::ast::*;
use super::char_class::{class_matches, set_matches};

/// A successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub captures: Vec<Capture>,
}

/// The value recorded by one capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// `()`: a position in the subject.
    Position(usize),
    /// `(...)`: a substring `start..end` of the subject.
    Text { start: usize, end: usize },
}

impl Match {
    /// Capture positions, or `None` if any capture is a substring capture.
    pub fn positions(&self) -> Option<Vec<usize>> {
        self.captures
            .iter()
            .map(|c| match c {
                Capture::Position(p) => Some(*p),
                Capture::Text { .. } => None,
            })
            .collect()
    }
}

impl Pattern {
    /// Find the leftmost match starting at or after `init`.
    ///
    /// Anchored patterns only match at position 0 of `subject`, so any
    /// `init > 0` fails for them.
    pub fn find_at(&self, subject: &[u8], init: usize) -> Option<Match> {
        if init > subject.len() || (self.anchored && init > 0) {
            return None;
        }
        let last_start = if self.anchored { 0 } else { subject.len() };
        for start in init..=last_start {
            let mut state = MatchState {
                subject,
                items: &self.items,
                captures: Vec::with_capacity(self.capture_count),
            };
            if let Some(end) = state.match_from(start, 0) {
                return Some(Match {
                    start,
                    end,
                    captures: state.into_captures(),
                });
            }
        }
        None
    }

    /// Find the leftmost match anywhere in `subject`.
    pub fn find(&self, subject: &[u8]) -> Option<Match> {
        self.find_at(subject, 0)
    }
}

// ─── Core matching ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Slot {
    Open(usize),
    Position(usize),
    Closed(usize, usize),
}

struct MatchState<'a> {
    subject: &'a [u8],
    items: &'a [Item],
    captures: Vec<Slot>,
}

impl MatchState<'_> {
    fn into_captures(self) -> Vec<Capture> {
        self.captures
            .into_iter()
            .map(|slot| match slot {
                Slot::Position(p) => Capture::Position(p),
                Slot::Closed(start, end) => Capture::Text { start, end },
                // Parser guarantees every capture is closed on success
                Slot::Open(start) => Capture::Text { start, end: start },
            })
            .collect()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.subject.get(pos).copied()
    }

    fn single_matches(&self, class: &CharClass, pos: usize) -> bool {
        self.byte_at(pos).is_some_and(|b| class_matches(class, b))
    }

    /// Match `items[idx..]` at `pos`, returning the end of the match.
    ///
    /// Recursion depth is bounded by the number of items: every recursive
    /// call advances `idx`.
    fn match_from(&mut self, pos: usize, idx: usize) -> Option<usize> {
        let Some(item) = self.items.get(idx) else {
            return Some(pos);
        };
        match item {
            Item::CaptureOpen => {
                self.captures.push(Slot::Open(pos));
                let result = self.match_from(pos, idx + 1);
                if result.is_none() {
                    self.captures.pop();
                }
                result
            }
            Item::PositionCapture => {
                self.captures.push(Slot::Position(pos));
                let result = self.match_from(pos, idx + 1);
                if result.is_none() {
                    self.captures.pop();
                }
                result
            }
            Item::CaptureClose => {
                let level = self
                    .captures
                    .iter()
                    .rposition(|slot| matches!(slot, Slot::Open(_)))?;
                let Slot::Open(start) = self.captures[level] else {
                    return None;
                };
                self.captures[level] = Slot::Closed(start, pos);
                let result = self.match_from(pos, idx + 1);
                if result.is_none() {
                    self.captures[level] = Slot::Open(start);
                }
                result
            }
            Item::EndAnchor => (pos == self.subject.len()).then_some(pos),
            Item::Balanced { open, close } => {
                let end = self.match_balance(pos, *open, *close)?;
                self.match_from(end, idx + 1)
            }
            Item::Frontier(set) => {
                // Out-of-range neighbours count as NUL, as at string edges
                let prev = if pos == 0 { 0 } else { self.subject[pos - 1] };
                let cur = self.byte_at(pos).unwrap_or(0);
                if !set_matches(set, prev) && set_matches(set, cur) {
                    self.match_from(pos, idx + 1)
                } else {
                    None
                }
            }
            Item::BackRef(n) => {
                let Some(Slot::Closed(start, end)) = self.captures.get(*n).copied() else {
                    return None;
                };
                let len = end - start;
                let subject = self.subject;
                if subject.len() - pos >= len && subject[start..end] == subject[pos..pos + len] {
                    self.match_from(pos + len, idx + 1)
                } else {
                    None
                }
            }
            Item::Single { class, quantifier } => match quantifier {
                Quantifier::Once => {
                    if self.single_matches(class, pos) {
                        self.match_from(pos + 1, idx + 1)
                    } else {
                        None
                    }
                }
                Quantifier::Optional => {
                    if self.single_matches(class, pos)
                        && let Some(end) = self.match_from(pos + 1, idx + 1)
                    {
                        return Some(end);
                    }
                    self.match_from(pos, idx + 1)
                }
                Quantifier::ZeroOrMore => self.max_expand(class, pos, idx, 0),
                Quantifier::OneOrMore => self.max_expand(class, pos, idx, 1),
                Quantifier::Lazy => self.min_expand(class, pos, idx),
            },
        }
    }

    /// Greedy repetition: consume as many bytes as possible, then back off.
    fn max_expand(&mut self, class: &CharClass, pos: usize, idx: usize, min: usize) -> Option<usize> {
        let mut count = 0;
        while self.single_matches(class, pos + count) {
            count += 1;
        }
        loop {
            if count < min {
                return None;
            }
            if let Some(end) = self.match_from(pos + count, idx + 1) {
                return Some(end);
            }
            if count == 0 {
                return None;
            }
            count -= 1;
        }
    }

    /// Lazy repetition: try the rest first, consuming one more byte on failure.
    fn min_expand(&mut self, class: &CharClass, mut pos: usize, idx: usize) -> Option<usize> {
        loop {
            if let Some(end) = self.match_from(pos, idx + 1) {
                return Some(end);
            }
            if self.single_matches(class, pos) {
                pos += 1;
            } else {
                return None;
            }
        }
    }

    /// Scan a balanced `open ... close` run starting at `pos`.
    ///
    /// The close byte is tested first, so identical open/close bytes pair
    /// with the next occurrence.
    fn match_balance(&self, pos: usize, open: u8, close: u8) -> Option<usize> {
        if self.byte_at(pos)? != open {
            return None;
        }
        let mut depth = 1usize;
        for (offset, &b) in self.subject[pos + 1..].iter().enumerate() {
            if b == close {
                depth -= 1;
                if depth == 0 {
                    return Some(pos + 1 + offset + 1);
                }
            } else if b == open {
                depth += 1;
            }
        }
        None
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::pattern::parser::parse;

    use super::*;

    fn find(pattern: &str, subject: &str, init: usize) -> Option<(usize, usize)> {
        let p = parse(pattern).unwrap();
        p.find_at(subject.as_bytes(), init).map(|m| (m.start, m.end))
    }

    fn positions(pattern: &str, subject: &str) -> Option<Vec<usize>> {
        let p = parse(pattern).unwrap();
        p.find(subject.as_bytes()).and_then(|m| m.positions())
    }

    // --- Literals and classes ---

    #[test]
    fn literal_not_at_start() {
        assert_eq!(find("world", "hello world", 0), Some((6, 11)));
    }

    #[test]
    fn literal_no_match() {
        assert_eq!(find("xyz", "hello world", 0), None);
    }

    #[test]
    fn init_skips_earlier_matches() {
        assert_eq!(find("o", "hello world", 5), Some((7, 8)));
    }

    #[test]
    fn digit_class() {
        assert_eq!(find("%d+", "abc123def", 0), Some((3, 6)));
    }

    // --- Quantifiers ---

    #[test]
    fn greedy_backtracks() {
        assert_eq!(find("a.*b", "axbxb", 0), Some((0, 5)));
    }

    #[test]
    fn lazy_takes_shortest() {
        assert_eq!(find("a.-b", "axbxb", 0), Some((0, 3)));
    }

    #[test]
    fn optional_byte() {
        assert_eq!(find("colou?r", "color", 0), Some((0, 5)));
        assert_eq!(find("colou?r", "colour", 0), Some((0, 6)));
    }

    #[test]
    fn zero_or_more_zero_matches() {
        assert_eq!(find("%d*", "abc", 0), Some((0, 0)));
    }

    // --- Anchors ---

    #[test]
    fn anchored_only_at_subject_start() {
        assert_eq!(find("^b", "ab", 0), None);
        assert_eq!(find("^a", "ab", 0), Some((0, 1)));
        assert_eq!(find("^ b", "a b", 1), None);
    }

    #[test]
    fn end_anchor() {
        assert_eq!(find("b$", "abab", 0), Some((3, 4)));
        assert_eq!(find("^.*$", "", 0), Some((0, 0)));
    }

    // --- Balanced and frontier ---

    #[test]
    fn balanced_nested() {
        assert_eq!(find("%b()", "x(a(b)c)y", 0), Some((1, 8)));
        assert_eq!(find("%b()", "x(a(b)c)y", 2), Some((3, 6)));
    }

    #[test]
    fn balanced_unclosed() {
        assert_eq!(find("%b()", "((a)", 0), Some((1, 4)));
        assert_eq!(find("%b()", "(a", 0), None);
    }

    #[test]
    fn balanced_same_byte_pairs_with_next() {
        assert_eq!(find("%b''", "'a' 'b'", 0), Some((0, 3)));
        assert_eq!(find("%b''", "'a' 'b'", 1), Some((2, 5)));
    }

    #[test]
    fn frontier_word_start() {
        assert_eq!(find("%f[%w]%w+", "  foo bar", 0), Some((2, 5)));
        assert_eq!(find("%f[%w]%w+", "  foo bar", 3), Some((6, 9)));
    }

    #[test]
    fn frontier_at_subject_end() {
        assert_eq!(find("a+%f[^a]", "baa", 0), Some((1, 3)));
    }

    // --- Captures ---

    #[test]
    fn position_captures() {
        assert_eq!(positions("^.().*().$", "(abc)"), Some(vec![1, 4]));
        assert_eq!(positions("^.%s*().-()%s*.$", "(  ab )"), Some(vec![3, 5]));
    }

    #[test]
    fn text_capture_is_not_a_position() {
        assert_eq!(positions("(a)()", "a"), None);
    }

    #[test]
    fn back_reference_matches_same_text() {
        let tag = "<(%w-)%f[^<%w][^<>]->.-</%1>";
        assert_eq!(find(tag, "<a>x</a>", 0), Some((0, 8)));
        assert_eq!(find(tag, "<a>x</b>", 0), None);
        assert_eq!(find(tag, "<div class='x'>y</div>", 0), Some((0, 22)));
    }

    #[test]
    fn captures_reset_between_start_positions() {
        let p = parse("(%a)%1").unwrap();
        let m = p.find(b"abcc").unwrap();
        assert_eq!((m.start, m.end), (2, 4));
        assert_eq!(m.captures, vec![Capture::Text { start: 2, end: 3 }]);
    }
}
