//! Resolving textobject requests against a buffer.

use tracing::debug;

use crate::composed::{ComposedPattern, Matcher};
use crate::config::Config;
use crate::error::DefinitionError;
use crate::extract::extract;
use crate::lines::LineSource;
use crate::neighborhood::Neighborhood;
use crate::options::{AiType, Options, Query, Side};
use crate::outcome::{Failure, NoMatch, Outcome};
use crate::position::{Position, Region};
use crate::prompt::{Prompt, PromptCache};
use crate::search::{SearchMethod, find_best_match};
use crate::span::Span;
use crate::table::{Lookup, PairKind, Textobjects, pair};

/// Find the `ai_type` region of `composed` around `cursor`.
///
/// Each of the `n_times` evolutions searches the lines of the current region
/// first. The first evolution that finds nothing there widens the window to
/// `n_lines` lines on each side, and the window stays wide from then on.
/// Returns `Ok(None)` when some evolution finds nothing even in the wide
/// window.
pub fn find_region<L: LineSource + ?Sized>(
    lines: &L,
    composed: &ComposedPattern,
    ai_type: AiType,
    options: &Options,
    cursor: Position,
) -> Result<Option<Region>, DefinitionError> {
    let reference = options.reference_region.unwrap_or(Region::at(cursor));
    let method = options.search_method;
    let mut current = reference;
    let mut widened = false;
    let mut last = None;

    for iteration in 0..options.n_times.max(1) {
        let n_neighbors = if widened { options.n_lines } else { 0 };
        let mut neighborhood = Neighborhood::around(lines, &current, n_neighbors);
        let mut found = best_in(&neighborhood, composed, &current, method);
        if found.is_none() && !widened {
            debug!(iteration, n_lines = options.n_lines, "widening search");
            widened = true;
            neighborhood = Neighborhood::around(lines, &current, options.n_lines);
            found = best_in(&neighborhood, composed, &current, method);
        }
        let Some((span, template)) = found else {
            debug!(iteration, %current, "no textobject found");
            return Ok(None);
        };
        current = neighborhood.span_to_region(span);
        last = Some((neighborhood, span, template));
    }

    let Some((neighborhood, span, template)) = last else {
        return Ok(None);
    };
    let spans = extract(neighborhood.as_bytes(), span, template)?;
    Ok(Some(neighborhood.span_to_region(spans.get(ai_type))))
}

fn best_in<'p>(
    neighborhood: &Neighborhood,
    composed: &'p ComposedPattern,
    reference: &Region,
    method: SearchMethod,
) -> Option<(Span, &'p Matcher)> {
    let reference = neighborhood.region_to_span(reference);
    find_best_match(neighborhood.as_bytes(), composed, reference, method)
        .map(|best| (best.span, best.template))
}

/// Looks up textobjects by id and resolves them.
///
/// Holds the prompt cache of the `?` textobject, which lives for one
/// gesture: call [`Resolver::begin_gesture`] when a fresh one starts and
/// leave it alone when repeating one.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    textobjects: Textobjects,
    prompt_cache: PromptCache,
}

impl Resolver {
    pub fn new(textobjects: Textobjects) -> Self {
        Self {
            textobjects,
            prompt_cache: PromptCache::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.textobjects.clone())
    }

    pub fn textobjects(&self) -> &Textobjects {
        &self.textobjects
    }

    pub fn textobjects_mut(&mut self) -> &mut Textobjects {
        &mut self.textobjects
    }

    /// Start a new interactive gesture, forgetting prompted edges.
    pub fn begin_gesture(&mut self) {
        self.prompt_cache.clear();
    }

    /// Find the region of textobject `query.id` around `cursor`.
    pub fn find_textobject<L: LineSource + ?Sized>(
        &mut self,
        lines: &L,
        cursor: Position,
        query: &Query,
        prompt: &mut dyn Prompt,
    ) -> Result<Outcome<Region>, DefinitionError> {
        let composed = match self.textobjects.lookup(query.id)? {
            Lookup::Pattern(composed) => composed,
            Lookup::Prompted => match self.prompt_cache.get_or_ask(prompt) {
                Some(edges) => pair(&edges.left, &edges.right, PairKind::NonBalanced)?,
                None => return Ok(Failure::Cancelled.into()),
            },
            Lookup::Disabled => return Ok(Failure::Disabled(query.id).into()),
            Lookup::Unknown => return Ok(Failure::UnknownId(query.id).into()),
        };

        let options = &query.options;
        Ok(
            match find_region(lines, &composed, query.ai_type, options, cursor)? {
                Some(region) => Outcome::Found(region),
                None => Failure::NoMatch(NoMatch {
                    id: query.id,
                    ai_type: query.ai_type,
                    search_method: options.search_method,
                    n_lines: options.n_lines,
                    n_times: options.n_times,
                })
                .into(),
            },
        )
    }

    /// Where the cursor goes to reach the `side` edge of the textobject.
    ///
    /// When the cursor already sits on that edge the next textobject out is
    /// used instead, so repeating the motion keeps moving.
    pub fn move_cursor<L: LineSource + ?Sized>(
        &mut self,
        lines: &L,
        cursor: Position,
        query: &Query,
        side: Side,
        prompt: &mut dyn Prompt,
    ) -> Result<Outcome<Position>, DefinitionError> {
        let edge = |region: Region| match side {
            Side::Right if !region.is_empty() => region.right,
            _ => region.left,
        };
        let target = match self.find_textobject(lines, cursor, query, prompt)? {
            Outcome::Found(region) => edge(region),
            Outcome::Failed(failure) => return Ok(Outcome::Failed(failure)),
        };
        if target != cursor {
            return Ok(Outcome::Found(target));
        }

        let mut next = query.clone();
        next.options.n_times += 1;
        debug!(n_times = next.options.n_times, "cursor already on edge");
        Ok(self.find_textobject(lines, cursor, &next, prompt)?.map(edge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::NoPrompt;

    fn region(l1: usize, c1: usize, l2: usize, c2: usize) -> Region {
        Region::new(Position::new(l1, c1), Position::new(l2, c2))
    }

    fn find(lines: &[&str], cursor: (usize, usize), query: Query) -> Outcome<Region> {
        Resolver::default()
            .find_textobject(lines, Position::new(cursor.0, cursor.1), &query, &mut NoPrompt)
            .unwrap()
    }

    #[test]
    fn single_line_brackets() {
        let lines = ["x = (a + b)"];
        assert_eq!(find(&lines, (1, 7), Query::around(')')), Outcome::Found(region(1, 5, 1, 11)));
        assert_eq!(find(&lines, (1, 7), Query::inside(')')), Outcome::Found(region(1, 6, 1, 10)));
    }

    #[test]
    fn multi_line_match_needs_widening() {
        let lines = ["f(", "  a,", "  b", ")"];
        assert_eq!(find(&lines, (2, 3), Query::around(')')), Outcome::Found(region(1, 2, 4, 1)));
        assert_eq!(find(&lines, (2, 3), Query::inside(')')), Outcome::Found(region(1, 3, 3, 4)));
    }

    #[test]
    fn widening_is_bounded_by_n_lines() {
        let lines = ["(", "a", "b", "c", ")"];
        let narrow = find(&lines, (3, 1), Query::around(')').n_lines(1));
        assert!(matches!(narrow, Outcome::Failed(Failure::NoMatch(_))));
        let wide = find(&lines, (3, 1), Query::around(')').n_lines(2));
        assert_eq!(wide, Outcome::Found(region(1, 1, 5, 1)));
    }

    #[test]
    fn n_times_selects_enclosing_objects() {
        let lines = ["((a) b)"];
        assert_eq!(find(&lines, (1, 3), Query::around(')')), Outcome::Found(region(1, 2, 1, 4)));
        assert_eq!(
            find(&lines, (1, 3), Query::around(')').n_times(2)),
            Outcome::Found(region(1, 1, 1, 7))
        );
        assert!(matches!(
            find(&lines, (1, 3), Query::around(')').n_times(3)),
            Outcome::Failed(Failure::NoMatch(NoMatch { n_times: 3, .. }))
        ));
    }

    #[test]
    fn explicit_reference_region() {
        let lines = ["((a) b)"];
        let query = Query::around(')')
            .reference_region(region(1, 2, 1, 4))
            .search_method(SearchMethod::Cover);
        assert_eq!(find(&lines, (1, 3), query), Outcome::Found(region(1, 1, 1, 7)));
    }

    #[test]
    fn empty_inside_is_an_empty_region() {
        let found = find(&["f()"], (1, 2), Query::inside(')'));
        let Outcome::Found(r) = found else {
            panic!("expected a region, got {found:?}");
        };
        assert_eq!(r, region(1, 3, 1, 2));
        assert!(r.is_empty());
    }

    #[test]
    fn unknown_and_disabled_ids() {
        assert_eq!(find(&["abc"], (1, 1), Query::around('z')), Outcome::Failed(Failure::UnknownId('z')));
        let mut resolver = Resolver::default();
        resolver.textobjects_mut().disable('b');
        let outcome = resolver
            .find_textobject(&["(a)"], Position::new(1, 2), &Query::around('b'), &mut NoPrompt)
            .unwrap();
        assert_eq!(outcome, Outcome::Failed(Failure::Disabled('b')));
    }

    #[test]
    fn greedy_pair_takes_whole_edge_runs() {
        let mut textobjects = Textobjects::new();
        textobjects.insert('*', pair("*", "*", PairKind::Greedy).unwrap());
        let mut resolver = Resolver::new(textobjects);
        let mut find = |line: &str, col: usize, query: Query| {
            resolver
                .find_textobject(&[line], Position::new(1, col), &query, &mut NoPrompt)
                .unwrap()
        };
        assert_eq!(find("**bold**", 4, Query::inside('*')), Outcome::Found(region(1, 3, 1, 6)));
        assert_eq!(find("**bold**", 4, Query::around('*')), Outcome::Found(region(1, 1, 1, 8)));
        assert_eq!(find("x **bold** y", 6, Query::inside('*')), Outcome::Found(region(1, 5, 1, 8)));
    }

    #[test]
    fn prompted_pair_is_cached_for_the_gesture() {
        let lines = ["a <<b>> c <<d>>"];
        let mut resolver = Resolver::default();
        let mut asked = 0;
        let mut prompt = |label: &str| {
            asked += 1;
            let edge = if label.starts_with("Left") { "<<" } else { ">>" };
            Some(edge.to_string())
        };
        let first = resolver
            .find_textobject(&lines, Position::new(1, 5), &Query::inside('?'), &mut prompt)
            .unwrap();
        assert_eq!(first, Outcome::Found(region(1, 5, 1, 5)));
        let again = resolver
            .find_textobject(&lines, Position::new(1, 1), &Query::inside('?'), &mut prompt)
            .unwrap();
        assert_eq!(again, Outcome::Found(region(1, 5, 1, 5)));
        resolver.begin_gesture();
        resolver
            .find_textobject(&lines, Position::new(1, 1), &Query::inside('?'), &mut prompt)
            .unwrap();
        assert_eq!(asked, 4);
    }

    #[test]
    fn cancelled_prompt() {
        let outcome = find(&["<a>"], (1, 2), Query::around('?'));
        assert_eq!(outcome, Outcome::Failed(Failure::Cancelled));
    }

    #[test]
    fn move_cursor_to_edges() {
        let lines = ["((a) b)"];
        let mut resolver = Resolver::default();
        let right = resolver
            .move_cursor(&lines, Position::new(1, 3), &Query::around(')'), Side::Right, &mut NoPrompt)
            .unwrap();
        assert_eq!(right, Outcome::Found(Position::new(1, 4)));
        let left = resolver
            .move_cursor(&lines, Position::new(1, 3), &Query::around(')'), Side::Left, &mut NoPrompt)
            .unwrap();
        assert_eq!(left, Outcome::Found(Position::new(1, 2)));
    }

    #[test]
    fn move_cursor_on_edge_goes_to_next_object() {
        let lines = ["((a) b)"];
        let mut resolver = Resolver::default();
        let moved = resolver
            .move_cursor(&lines, Position::new(1, 4), &Query::around(')'), Side::Right, &mut NoPrompt)
            .unwrap();
        assert_eq!(moved, Outcome::Found(Position::new(1, 7)));
    }
}
