//! Read-only access to buffer lines.

use std::borrow::Cow;

use ropey::Rope;

/// An ordered sequence of buffer lines, addressed from 1.
///
/// Lines are returned without their line break.
pub trait LineSource {
    fn line_count(&self) -> usize;

    /// Text of line `line` (1-based). Out-of-range lines are empty.
    fn line(&self, line: usize) -> Cow<'_, str>;
}

impl<S: AsRef<str>> LineSource for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, line: usize) -> Cow<'_, str> {
        line.checked_sub(1)
            .and_then(|idx| self.get(idx))
            .map_or(Cow::Borrowed(""), |s| Cow::Borrowed(s.as_ref()))
    }
}

impl<S: AsRef<str>> LineSource for Vec<S> {
    fn line_count(&self) -> usize {
        self.as_slice().line_count()
    }

    fn line(&self, line: usize) -> Cow<'_, str> {
        self.as_slice().line(line)
    }
}

impl<S: AsRef<str>, const N: usize> LineSource for [S; N] {
    fn line_count(&self) -> usize {
        self.as_slice().line_count()
    }

    fn line(&self, line: usize) -> Cow<'_, str> {
        self.as_slice().line(line)
    }
}

/// A rope's trailing line break does not start another buffer line.
impl LineSource for Rope {
    fn line_count(&self) -> usize {
        let lines = self.len_lines();
        if lines > 1 && rope_ends_with_newline(self) {
            lines - 1
        } else {
            lines
        }
    }

    fn line(&self, line: usize) -> Cow<'_, str> {
        if line == 0 || line > self.line_count() {
            return Cow::Borrowed("");
        }
        let text: Cow<'_, str> = Rope::line(self, line - 1).into();
        match text {
            Cow::Borrowed(s) => Cow::Borrowed(s.trim_end_matches(['\n', '\r'])),
            Cow::Owned(s) => Cow::Owned(s.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

fn rope_ends_with_newline(rope: &Rope) -> bool {
    let len = rope.len_chars();
    len > 0 && matches!(rope.char(len - 1), '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_lines_are_one_based() {
        let lines = ["alpha", "beta"];
        assert_eq!(lines.line_count(), 2);
        assert_eq!(lines.line(1), "alpha");
        assert_eq!(lines.line(2), "beta");
        assert_eq!(lines.line(0), "");
        assert_eq!(lines.line(3), "");
    }

    #[test]
    fn vec_of_strings() {
        let lines = vec!["a".to_string(), "b".to_string()];
        assert_eq!(lines.line_count(), 2);
        assert_eq!(lines.line(2), "b");
    }

    #[test]
    fn rope_strips_line_breaks() {
        let rope = Rope::from_str("one\r\ntwo\nthree");
        assert_eq!(LineSource::line_count(&rope), 3);
        assert_eq!(LineSource::line(&rope, 1), "one");
        assert_eq!(LineSource::line(&rope, 2), "two");
        assert_eq!(LineSource::line(&rope, 3), "three");
    }

    #[test]
    fn rope_trailing_newline_is_not_a_line() {
        let rope = Rope::from_str("one\ntwo\n");
        assert_eq!(LineSource::line_count(&rope), 2);
        assert_eq!(LineSource::line(&rope, 3), "");
    }

    #[test]
    fn empty_rope_has_one_empty_line() {
        let rope = Rope::new();
        assert_eq!(LineSource::line_count(&rope), 1);
        assert_eq!(LineSource::line(&rope, 1), "");
    }
}
