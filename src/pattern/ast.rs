//! AST types for textobject patterns.

/// A parsed pattern.
///
/// A pattern like `^%b()` is anchored and holds a single balanced item.
/// A pattern like `_().-()_` holds five items, two of them position captures.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Source text, kept for diagnostics.
    pub(crate) source: String,
    /// `^` prefix: only match at the very start of the subject.
    pub(crate) anchored: bool,
    pub(crate) items: Vec<Item>,
    /// Number of captures (substring and position) the pattern opens.
    pub(crate) capture_count: usize,
}

/// One matching step.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A single-byte class with a quantifier.
    Single {
        class: CharClass,
        quantifier: Quantifier,
    },
    /// `%bxy`: a balanced run starting with `open` and ending with `close`.
    Balanced { open: u8, close: u8 },
    /// `%f[set]`: transition from a byte outside `set` to a byte inside it.
    Frontier(Set),
    /// `%1`..`%9`: repeat the text of an earlier capture (zero based here).
    BackRef(usize),
    /// `(`: start of a substring capture.
    CaptureOpen,
    /// `)`: end of the innermost open substring capture.
    CaptureClose,
    /// `()`: record the current position.
    PositionCapture,
    /// Trailing `$`.
    EndAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Once,
    /// `*`, greedy.
    ZeroOrMore,
    /// `+`, greedy.
    OneOrMore,
    /// `-`, shortest first.
    Lazy,
    /// `?`
    Optional,
}

/// Something that matches exactly one byte.
#[derive(Debug, Clone, PartialEq)]
pub enum CharClass {
    /// `.`
    Any,
    Literal(u8),
    /// `%a`, `%D`, ... (`negated` for the upper-case forms).
    Named { kind: ClassKind, negated: bool },
    Set(Set),
}

/// A bracketed set `[...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub negated: bool,
    pub members: Vec<SetMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetMember {
    Byte(u8),
    Range(u8, u8),
    Named { kind: ClassKind, negated: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Alpha,    // %a
    Control,  // %c
    Digit,    // %d
    Graph,    // %g
    Lower,    // %l
    Punct,    // %p
    Space,    // %s
    Upper,    // %u
    AlNum,    // %w
    HexDigit, // %x
}

impl ClassKind {
    /// Map a class letter (either case) to its kind.
    pub fn from_letter(letter: u8) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            b'a' => Some(Self::Alpha),
            b'c' => Some(Self::Control),
            b'd' => Some(Self::Digit),
            b'g' => Some(Self::Graph),
            b'l' => Some(Self::Lower),
            b'p' => Some(Self::Punct),
            b's' => Some(Self::Space),
            b'u' => Some(Self::Upper),
            b'w' => Some(Self::AlNum),
            b'x' => Some(Self::HexDigit),
            _ => None,
        }
    }
}

impl Pattern {
    /// The text this pattern was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    /// True for `%bXX` patterns whose open and close bytes are identical.
    ///
    /// Scanning for these resumes after the end of each match, so that
    /// `'a' 'b'` yields two pairs instead of also yielding `' '`.
    pub fn is_same_balanced(&self) -> bool {
        !self.anchored
            && matches!(self.items.as_slice(), [Item::Balanced { open, close }] if open == close)
    }

    /// True when a `.-` item follows some other item (`x.-y`).
    pub fn has_lazy_any(&self) -> bool {
        self.items.iter().skip(1).any(|item| {
            matches!(
                item,
                Item::Single {
                    class: CharClass::Any,
                    quantifier: Quantifier::Lazy,
                }
            )
        })
    }
}
