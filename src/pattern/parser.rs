//! Single-pass parser for textobject pattern strings.

use std::iter::Peekable;
use std::str::Bytes;

use thiserror::Error;

use super::ast::*;

/// Errors that can occur while parsing a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern ends with a bare '%'")]
    TrailingEscape,
    #[error("missing ']' to close a set")]
    UnclosedSet,
    #[error("missing arguments to '%b'")]
    MalformedBalance,
    #[error("missing '[' after '%f'")]
    MalformedFrontier,
    #[error("unfinished capture")]
    UnclosedCapture,
    #[error("invalid pattern capture: ')' without '('")]
    UnopenedCapture,
    #[error("invalid capture index %{0}")]
    InvalidCaptureIndex(u8),
}

/// Parse a pattern string into a [`Pattern`].
pub fn parse(input: &str) -> Result<Pattern, PatternError> {
    let mut parser = Parser {
        bytes: input.bytes().peekable(),
        items: Vec::new(),
        open: Vec::new(),
        closed: Vec::new(),
        capture_count: 0,
    };
    let anchored = parser.bytes.peek() == Some(&b'^');
    if anchored {
        parser.bytes.next();
    }
    parser.parse_items()?;
    if !parser.open.is_empty() {
        return Err(PatternError::UnclosedCapture);
    }
    Ok(Pattern {
        source: input.to_string(),
        anchored,
        items: parser.items,
        capture_count: parser.capture_count,
    })
}

struct Parser<'a> {
    bytes: Peekable<Bytes<'a>>,
    items: Vec<Item>,
    /// Indices of substring captures not yet closed.
    open: Vec<usize>,
    /// Whether each capture (by index) is complete.
    closed: Vec<bool>,
    capture_count: usize,
}

impl Parser<'_> {
    fn parse_items(&mut self) -> Result<(), PatternError> {
        while let Some(b) = self.bytes.next() {
            match b {
                b'(' => {
                    if self.bytes.peek() == Some(&b')') {
                        self.bytes.next();
                        self.items.push(Item::PositionCapture);
                        self.closed.push(true);
                    } else {
                        self.items.push(Item::CaptureOpen);
                        self.open.push(self.capture_count);
                        self.closed.push(false);
                    }
                    self.capture_count += 1;
                }
                b')' => {
                    let idx = self.open.pop().ok_or(PatternError::UnopenedCapture)?;
                    self.closed[idx] = true;
                    self.items.push(Item::CaptureClose);
                }
                b'$' if self.bytes.peek().is_none() => self.items.push(Item::EndAnchor),
                b'%' => self.parse_escape()?,
                _ => {
                    let class = self.parse_class_after(b)?;
                    let quantifier = self.parse_quantifier();
                    self.items.push(Item::Single { class, quantifier });
                }
            }
        }
        Ok(())
    }

    /// Handle everything that can follow a `%` outside a set.
    fn parse_escape(&mut self) -> Result<(), PatternError> {
        match self.bytes.peek().copied() {
            None => Err(PatternError::TrailingEscape),
            Some(b'b') => {
                self.bytes.next();
                let open = self.bytes.next().ok_or(PatternError::MalformedBalance)?;
                let close = self.bytes.next().ok_or(PatternError::MalformedBalance)?;
                self.items.push(Item::Balanced { open, close });
                Ok(())
            }
            Some(b'f') => {
                self.bytes.next();
                if self.bytes.next() != Some(b'[') {
                    return Err(PatternError::MalformedFrontier);
                }
                let set = self.parse_set()?;
                self.items.push(Item::Frontier(set));
                Ok(())
            }
            Some(d @ b'0'..=b'9') => {
                self.bytes.next();
                let idx = usize::from(d - b'0');
                if idx == 0 || !self.closed.get(idx - 1).copied().unwrap_or(false) {
                    return Err(PatternError::InvalidCaptureIndex(d - b'0'));
                }
                self.items.push(Item::BackRef(idx - 1));
                Ok(())
            }
            Some(_) => {
                let class = self.parse_class_after(b'%')?;
                let quantifier = self.parse_quantifier();
                self.items.push(Item::Single { class, quantifier });
                Ok(())
            }
        }
    }

    /// Parse a single-byte class whose first byte `b` was already consumed.
    fn parse_class_after(&mut self, b: u8) -> Result<CharClass, PatternError> {
        match b {
            b'.' => Ok(CharClass::Any),
            b'[' => Ok(CharClass::Set(self.parse_set()?)),
            b'%' => {
                let c = self.bytes.next().ok_or(PatternError::TrailingEscape)?;
                Ok(match ClassKind::from_letter(c) {
                    Some(kind) => CharClass::Named {
                        kind,
                        negated: c.is_ascii_uppercase(),
                    },
                    None => CharClass::Literal(c),
                })
            }
            other => Ok(CharClass::Literal(other)),
        }
    }

    fn parse_quantifier(&mut self) -> Quantifier {
        let quantifier = match self.bytes.peek() {
            Some(b'*') => Quantifier::ZeroOrMore,
            Some(b'+') => Quantifier::OneOrMore,
            Some(b'-') => Quantifier::Lazy,
            Some(b'?') => Quantifier::Optional,
            _ => return Quantifier::Once,
        };
        self.bytes.next();
        quantifier
    }

    /// Parse a set body (the opening `[` has already been consumed).
    ///
    /// A `]` right after the opening bracket (or after `^`) is a member.
    fn parse_set(&mut self) -> Result<Set, PatternError> {
        let negated = self.bytes.peek() == Some(&b'^');
        if negated {
            self.bytes.next();
        }
        let mut members = Vec::new();
        let mut first = true;
        loop {
            let b = self.bytes.next().ok_or(PatternError::UnclosedSet)?;
            match b {
                b']' if !first => break,
                b'%' => {
                    let c = self.bytes.next().ok_or(PatternError::UnclosedSet)?;
                    members.push(match ClassKind::from_letter(c) {
                        Some(kind) => SetMember::Named {
                            kind,
                            negated: c.is_ascii_uppercase(),
                        },
                        None => SetMember::Byte(c),
                    });
                }
                lo => {
                    // `a-z` range; a trailing `-` before `]` is a plain member
                    let mut ahead = self.bytes.clone();
                    if ahead.next() == Some(b'-')
                        && let Some(hi) = ahead.next()
                        && hi != b']'
                    {
                        self.bytes = ahead;
                        members.push(SetMember::Range(lo, hi));
                    } else {
                        members.push(SetMember::Byte(lo));
                    }
                }
            }
            first = false;
        }
        Ok(Set { negated, members })
    }
}
