//! Composed patterns: per-slot alternatives plus an extraction template.
//!
//! A composed pattern is an ordered list of slots. Each slot narrows the
//! search inside the match of the previous one; the last slot is also the
//! template whose position captures carve out the "around" and "inside"
//! parts. A slot holds either one matcher or a list of alternatives, and
//! [`ComposedPattern::nested_patterns`] expands the alternatives into every
//! concrete combination.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

use crate::error::DefinitionError;
use crate::pattern::{self, Pattern};

/// Finds the next match at or after a 0-based start offset.
///
/// Returns the 0-based start and exclusive end of the match.
pub type FindFn = dyn Fn(&[u8], usize) -> Option<(usize, usize)> + Send + Sync;

/// A named, hand-written matcher for what patterns cannot express.
#[derive(Clone)]
pub struct SpanFinder {
    name: &'static str,
    find: Arc<FindFn>,
}

impl SpanFinder {
    pub fn new<F>(name: &'static str, find: F) -> Self
    where
        F: Fn(&[u8], usize) -> Option<(usize, usize)> + Send + Sync + 'static,
    {
        Self {
            name,
            find: Arc::new(find),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn find_at(&self, subject: &[u8], init: usize) -> Option<(usize, usize)> {
        (self.find)(subject, init)
    }
}

impl fmt::Debug for SpanFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SpanFinder").field(&self.name).finish()
    }
}

/// One alternative of a slot.
#[derive(Debug, Clone)]
pub enum Matcher {
    Pattern(Pattern),
    Finder(SpanFinder),
}

impl Matcher {
    /// Parse `source` as a pattern matcher.
    pub fn pattern(source: &str) -> Result<Self, DefinitionError> {
        pattern::parse(source)
            .map(Self::Pattern)
            .map_err(|err| DefinitionError::Pattern {
                pattern: source.to_string(),
                source: err,
            })
    }

    /// Human readable description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Pattern(p) => p.source().to_string(),
            Self::Finder(f) => format!("<{}>", f.name()),
        }
    }
}

/// A position in a composed pattern.
#[derive(Debug, Clone)]
pub enum Slot {
    Single(Matcher),
    Alternatives(Vec<Matcher>),
}

impl Slot {
    pub fn single(source: &str) -> Result<Self, DefinitionError> {
        Matcher::pattern(source).map(Self::Single)
    }

    pub fn alternatives<'a, I>(sources: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let matchers = sources
            .into_iter()
            .map(Matcher::pattern)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Alternatives(matchers))
    }

    pub fn finder(finder: SpanFinder) -> Self {
        Self::Single(Matcher::Finder(finder))
    }

    pub fn matchers(&self) -> &[Matcher] {
        match self {
            Self::Single(m) => std::slice::from_ref(m),
            Self::Alternatives(ms) => ms,
        }
    }
}

/// An ordered list of slots; the last slot is the extraction template.
#[derive(Debug, Clone)]
pub struct ComposedPattern {
    slots: Vec<Slot>,
}

impl ComposedPattern {
    /// Build a composed pattern; returns `None` for an empty slot list,
    /// which marks a disabled textobject.
    pub fn new(slots: Vec<Slot>) -> Option<Self> {
        (!slots.is_empty()).then_some(Self { slots })
    }

    /// Parse a composed pattern where every slot is a list of alternatives.
    ///
    /// A slot with exactly one entry becomes [`Slot::Single`].
    pub fn parse<A, S>(slots: &[A]) -> Result<Option<Self>, DefinitionError>
    where
        A: AsRef<[S]>,
        S: AsRef<str>,
    {
        let slots = slots
            .iter()
            .map(|alts| match alts.as_ref() {
                [one] => Slot::single(one.as_ref()),
                many => Slot::alternatives(many.iter().map(AsRef::as_ref)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(slots))
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Every concrete nested pattern, one matcher per slot.
    ///
    /// Order is that of nested loops over the slots: the last slot's
    /// alternatives vary fastest. This order fixes which nested pattern wins
    /// when several produce equally good spans.
    pub fn nested_patterns(&self) -> Vec<Vec<&Matcher>> {
        self.slots
            .iter()
            .map(|slot| slot.matchers().iter())
            .multi_cartesian_product()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(nested: &[&Matcher]) -> Vec<String> {
        nested.iter().map(|m| m.describe()).collect()
    }

    #[test]
    fn cartesian_product_order() {
        let composed = ComposedPattern::parse(&[
            vec!["%b()", "%b[]"],
            vec!["x"],
            vec!["^a", "^b"],
        ])
        .unwrap()
        .unwrap();
        let nested = composed.nested_patterns();
        let all: Vec<Vec<String>> = nested.iter().map(|n| sources(n)).collect();
        assert_eq!(
            all,
            vec![
                vec!["%b()", "x", "^a"],
                vec!["%b()", "x", "^b"],
                vec!["%b[]", "x", "^a"],
                vec!["%b[]", "x", "^b"],
            ]
        );
    }

    #[test]
    fn single_slot_yields_one_nested_pattern() {
        let composed = ComposedPattern::parse(&[vec!["_().-()_"]]).unwrap().unwrap();
        assert_eq!(composed.nested_patterns().len(), 1);
    }

    #[test]
    fn empty_composed_pattern_is_disabled() {
        let empty: [Vec<&str>; 0] = [];
        assert!(ComposedPattern::parse(&empty).unwrap().is_none());
    }

    #[test]
    fn invalid_pattern_is_a_definition_error() {
        let err = ComposedPattern::parse(&[vec!["%b("]]).unwrap_err();
        assert!(matches!(err, DefinitionError::Pattern { .. }));
    }

    #[test]
    fn finder_description() {
        let finder = SpanFinder::new("segments", |_, _| None);
        let slot = Slot::finder(finder);
        assert_eq!(slot.matchers()[0].describe(), "<segments>");
    }
}
