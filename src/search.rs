//! Span search: enumerate candidate spans and pick the best one.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use tracing::trace;

use crate::composed::{ComposedPattern, Matcher};
use crate::error::ConfigError;
use crate::pattern::Pattern;
use crate::span::Span;

/// Which candidates are acceptable relative to the reference span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SearchMethod {
    /// Only spans covering the reference.
    Cover,
    /// Covering spans, else the closest span to the right.
    #[default]
    CoverOrNext,
    /// Covering spans, else the closest span to the left.
    CoverOrPrev,
    /// Covering spans, else the closest span on either side.
    CoverOrNearest,
    /// The closest span starting after the reference.
    Next,
    /// The closest span ending before the reference.
    Prev,
    /// The closest span on either side, never covering.
    Nearest,
}

impl SearchMethod {
    pub const ALL: [SearchMethod; 7] = [
        Self::Cover,
        Self::CoverOrNext,
        Self::CoverOrPrev,
        Self::CoverOrNearest,
        Self::Next,
        Self::Prev,
        Self::Nearest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Cover => "cover",
            Self::CoverOrNext => "cover_or_next",
            Self::CoverOrPrev => "cover_or_prev",
            Self::CoverOrNearest => "cover_or_nearest",
            Self::Next => "next",
            Self::Prev => "prev",
            Self::Nearest => "nearest",
        }
    }

    /// Whether covering candidates are accepted at all.
    fn accepts_covering(self) -> bool {
        matches!(
            self,
            Self::Cover | Self::CoverOrNext | Self::CoverOrPrev | Self::CoverOrNearest
        )
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ConfigError::InvalidSearchMethod(s.to_string()))
    }
}

impl TryFrom<String> for SearchMethod {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ─── Best-span selection ─────────────────────────────────────────────────────

/// Decide whether `candidate` should replace `current` as the best span.
///
/// A candidate equal to the reference is never accepted, so repeated
/// searches always move.
pub fn is_better_span(
    candidate: Span,
    current: Option<Span>,
    reference: Span,
    method: SearchMethod,
) -> bool {
    if candidate == reference {
        return false;
    }
    let candidate_covers = candidate.covers(&reference);
    let current_covers = current.is_some_and(|c| c.covers(&reference));

    if method.accepts_covering() {
        if candidate_covers {
            return match current {
                Some(cur) if current_covers => candidate.width() < cur.width(),
                _ => true,
            };
        }
        if method == SearchMethod::Cover || current_covers {
            return false;
        }
    } else if candidate_covers {
        return false;
    }

    // Never descend into something nested inside the reference
    if reference.covers(&candidate) {
        return false;
    }
    if !is_in_direction(candidate, reference, method) {
        return false;
    }
    match current {
        None => true,
        Some(cur) => distance(candidate, reference, method) < distance(cur, reference, method),
    }
}

fn is_in_direction(candidate: Span, reference: Span, method: SearchMethod) -> bool {
    let right_of = candidate.left >= reference.left && candidate.right >= reference.right;
    let left_of = candidate.left <= reference.left && candidate.right <= reference.right;
    match method {
        SearchMethod::Cover => false,
        SearchMethod::CoverOrNext => right_of,
        SearchMethod::CoverOrPrev => left_of,
        SearchMethod::CoverOrNearest => true,
        SearchMethod::Next => candidate.left > reference.right,
        SearchMethod::Prev => candidate.right < reference.left,
        SearchMethod::Nearest => candidate.left > reference.right || candidate.right < reference.left,
    }
}

fn distance(span: Span, reference: Span, method: SearchMethod) -> usize {
    let left = span.left.abs_diff(reference.left);
    let right = span.right.abs_diff(reference.right);
    match method {
        SearchMethod::CoverOrNext | SearchMethod::Next => left,
        SearchMethod::CoverOrPrev | SearchMethod::Prev => right,
        SearchMethod::Cover | SearchMethod::CoverOrNearest | SearchMethod::Nearest => left.min(right),
    }
}

// ─── Candidate enumeration ───────────────────────────────────────────────────

/// Find the next match of `matcher` in `subject` at or after `init`.
///
/// Returns the 0-based start and exclusive end.
fn find_match(matcher: &Matcher, subject: &[u8], init: usize) -> Option<(usize, usize)> {
    match matcher {
        Matcher::Finder(finder) => finder.find_at(subject, init),
        Matcher::Pattern(pattern) => find_pattern(pattern, subject, init),
    }
}

/// Pattern search with the `x.-y` narrowing rule: a match is shrunk from
/// the left while a later start still ends at the same place.
fn find_pattern(pattern: &Pattern, subject: &[u8], init: usize) -> Option<(usize, usize)> {
    let m = pattern.find_at(subject, init)?;
    let (mut from, to) = (m.start, m.end);
    if pattern.has_lazy_any() {
        while let Some(next) = pattern.find_at(subject, from + 1)
            && next.end == to
        {
            from = next.start;
        }
    }
    Some((from, to))
}

/// Where the scan at one level resumes after a match at `from..to`.
fn next_init(matcher: &Matcher, from: usize, to: usize) -> usize {
    match matcher {
        Matcher::Pattern(p) if p.is_same_balanced() => to,
        _ => from + 1,
    }
}

/// Call `visit` with every span matched by `nested` in `text`.
///
/// Level one scans the whole text; every further level scans inside each
/// match of the level above. The deepest matches are the candidates.
/// Zero-length matches are skipped.
pub fn iterate_matched_spans<F>(text: &[u8], nested: &[&Matcher], visit: &mut F)
where
    F: FnMut(Span),
{
    if !nested.is_empty() {
        process_level(text, 0, nested, visit);
    }
}

fn process_level<F>(subject: &[u8], offset: usize, nested: &[&Matcher], visit: &mut F)
where
    F: FnMut(Span),
{
    let (matcher, deeper) = (nested[0], &nested[1..]);
    let mut init = 0;
    while init <= subject.len() {
        let Some((from, to)) = find_match(matcher, subject, init) else {
            break;
        };
        init = next_init(matcher, from, to);
        if from >= to {
            continue;
        }
        if deeper.is_empty() {
            visit(Span::new(offset + from + 1, offset + to));
        } else {
            process_level(&subject[from..to], offset + from, deeper, visit);
        }
    }
}

/// The winning span and the extraction template that produced it.
#[derive(Debug, Clone)]
pub struct BestMatch<'p> {
    pub span: Span,
    pub template: &'p Matcher,
}

/// Search `text` for the best span matching `composed` relative to `reference`.
///
/// Candidates are visited in nested-pattern order, then scan order; a span
/// is only considered the first time it is produced.
pub fn find_best_match<'p>(
    text: &[u8],
    composed: &'p ComposedPattern,
    reference: Span,
    method: SearchMethod,
) -> Option<BestMatch<'p>> {
    let mut best: Option<BestMatch<'p>> = None;
    let mut visited = HashSet::new();
    for nested in composed.nested_patterns() {
        let Some(template) = nested.last().copied() else {
            continue;
        };
        iterate_matched_spans(text, &nested, &mut |span| {
            if !visited.insert(span) {
                return;
            }
            if is_better_span(span, best.as_ref().map(|b| b.span), reference, method) {
                trace!(left = span.left, right = span.right, "better span");
                best = Some(BestMatch { span, template });
            }
        });
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composed::{Slot, SpanFinder};

    fn composed(slots: &[&[&str]]) -> ComposedPattern {
        let slots: Vec<Vec<&str>> = slots.iter().map(|s| s.to_vec()).collect();
        ComposedPattern::parse(&slots).unwrap().unwrap()
    }

    fn spans(text: &str, slots: &[&[&str]]) -> Vec<(usize, usize)> {
        let composed = composed(slots);
        let mut out = Vec::new();
        for nested in composed.nested_patterns() {
            iterate_matched_spans(text.as_bytes(), &nested, &mut |s| out.push((s.left, s.right)));
        }
        out
    }

    fn best(text: &str, slots: &[&[&str]], reference: (usize, usize), method: SearchMethod) -> Option<(usize, usize)> {
        let composed = composed(slots);
        find_best_match(text.as_bytes(), &composed, Span::new(reference.0, reference.1), method)
            .map(|m| (m.span.left, m.span.right))
    }

    // --- Enumeration ---

    #[test]
    fn nested_brackets_are_all_enumerated() {
        assert_eq!(
            spans("( ( () ( ) ) )", &[&["%b()"]]),
            vec![(1, 14), (3, 12), (5, 6), (8, 10)]
        );
    }

    #[test]
    fn second_level_filters_candidates() {
        assert_eq!(
            spans("( ( () ( ) ) )", &[&["%b()"], &["^. .* .$"]]),
            vec![(1, 14), (3, 12)]
        );
    }

    #[test]
    fn same_balanced_resumes_after_match_end() {
        assert_eq!(spans("' ' ' '", &[&["%b''"]]), vec![(1, 3), (5, 7)]);
    }

    #[test]
    fn lazy_any_is_narrowed_from_the_left() {
        // Without narrowing the match would start at the first `a`
        assert_eq!(spans("aab", &[&["a.-b"]]), vec![(2, 3)]);
    }

    #[test]
    fn anchored_level_matches_only_at_level_start() {
        assert_eq!(spans("(a) (b)", &[&["%b()"], &["^%(b"]]), vec![(5, 6)]);
    }

    #[test]
    fn finder_levels_resume_after_match_start() {
        let finder = SpanFinder::new("pairs", |s: &[u8], init: usize| {
            (init..s.len().saturating_sub(1)).find(|&i| s[i] == s[i + 1]).map(|i| (i, i + 2))
        });
        let composed = ComposedPattern::new(vec![Slot::finder(finder)]).unwrap();
        let mut out = Vec::new();
        for nested in composed.nested_patterns() {
            iterate_matched_spans(b"aaab", &nested, &mut |s| out.push((s.left, s.right)));
        }
        assert_eq!(out, vec![(1, 2), (2, 3)]);
    }

    // --- Selection ---

    #[test]
    fn cover_prefers_narrowest_covering() {
        let slots: &[&[&str]] = &[&["%b()"], &["^. .* .$"]];
        let text = "( ( () ( ) ) )";
        assert_eq!(best(text, slots, (5, 6), SearchMethod::Cover), Some((3, 12)));
        assert_eq!(best(text, slots, (3, 12), SearchMethod::Cover), Some((1, 14)));
        assert_eq!(best(text, slots, (1, 14), SearchMethod::Cover), None);
    }

    #[test]
    fn reference_is_never_returned() {
        let slots: &[&[&str]] = &[&["%b''"], &["^.().-().$"]];
        assert_eq!(best("' ' ' '", slots, (1, 3), SearchMethod::CoverOrNext), Some((5, 7)));
    }

    #[test]
    fn cover_or_next_falls_back_to_right() {
        let slots: &[&[&str]] = &[&["%b()"]];
        assert_eq!(best("a (b) (c)", slots, (1, 1), SearchMethod::CoverOrNext), Some((3, 5)));
        assert_eq!(best("a (b) (c)", slots, (1, 1), SearchMethod::Cover), None);
    }

    #[test]
    fn cover_or_prev_falls_back_to_left() {
        let slots: &[&[&str]] = &[&["%b()"]];
        assert_eq!(best("(a) (b) c", slots, (9, 9), SearchMethod::CoverOrPrev), Some((5, 7)));
        assert_eq!(best("(a) (b) c", slots, (9, 9), SearchMethod::CoverOrNext), None);
    }

    #[test]
    fn covering_beats_closer_non_covering() {
        let slots: &[&[&str]] = &[&["%b()"]];
        assert_eq!(
            best("(a (b) c)", slots, (2, 2), SearchMethod::CoverOrNearest),
            Some((1, 9))
        );
    }

    #[test]
    fn nearest_ties_keep_first_candidate() {
        // Both spans are two bytes away from the reference
        let slots: &[&[&str]] = &[&["%b()"]];
        let text = "(a) x (b)";
        for _ in 0..3 {
            assert_eq!(best(text, slots, (5, 5), SearchMethod::CoverOrNearest), Some((1, 3)));
        }
    }

    #[test]
    fn pure_methods_skip_covering_spans() {
        let slots: &[&[&str]] = &[&["%b()"]];
        let text = "(a) (b) (c)";
        assert_eq!(best(text, slots, (6, 6), SearchMethod::Next), Some((9, 11)));
        assert_eq!(best(text, slots, (6, 6), SearchMethod::Prev), Some((1, 3)));
        assert_eq!(best(text, slots, (6, 6), SearchMethod::Nearest), Some((1, 3)));
    }

    #[test]
    fn candidates_inside_reference_are_rejected() {
        let slots: &[&[&str]] = &[&["%b()"]];
        assert_eq!(best("((a) b)", slots, (1, 7), SearchMethod::CoverOrNext), None);
    }

    #[test]
    fn duplicate_spans_keep_first_template() {
        let composed = composed(&[&["%b()"], &["^.().*().$", "^.%s*().-()%s*.$"]]);
        let found = find_best_match(b"( a )", &composed, Span::new(3, 3), SearchMethod::Cover).unwrap();
        assert_eq!(found.span, Span::new(1, 5));
        assert_eq!(found.template.describe(), "^.().*().$");
    }

    // --- Method names ---

    #[test]
    fn search_method_names_round_trip() {
        for method in SearchMethod::ALL {
            assert_eq!(method.name().parse::<SearchMethod>().unwrap(), method);
        }
    }

    #[test]
    fn unknown_search_method_is_rejected() {
        assert!(matches!(
            "closest".parse::<SearchMethod>(),
            Err(ConfigError::InvalidSearchMethod(name)) if name == "closest"
        ));
    }
}
