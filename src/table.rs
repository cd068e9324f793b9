//! Textobject definitions: built-in table, generators and custom overrides.

use std::collections::HashMap;

use phf::{Map, phf_map};
use serde::Deserialize;
use tracing::debug;

use crate::composed::{ComposedPattern, Slot, SpanFinder};
use crate::error::DefinitionError;
use crate::pattern::escape;

const BALANCED_INSIDE: &str = "^.().*().$";

/// Separator of the `a` textobject unless configured otherwise.
pub const DEFAULT_ARGUMENT_SEPARATOR: &str = ",";
/// Bytes allowed in a function name for the `f` textobject.
pub const DEFAULT_FUNCTION_NAME_SET: &str = "[%w_%.]";

#[derive(Debug, Clone, Copy)]
enum Builtin {
    Slots(&'static [&'static [&'static str]]),
    Argument,
    FunctionCall,
    Prompted,
}

const BUILTIN_TABLE: Map<&'static str, Builtin> = phf_map! {
    "(" => Builtin::Slots(&[&["%b()"], &["^.%s*().-()%s*.$"]]),
    "[" => Builtin::Slots(&[&["%b[]"], &["^.%s*().-()%s*.$"]]),
    "{" => Builtin::Slots(&[&["%b{}"], &["^.%s*().-()%s*.$"]]),
    "<" => Builtin::Slots(&[&["%b<>"], &["^.%s*().-()%s*.$"]]),
    ")" => Builtin::Slots(&[&["%b()"], &[BALANCED_INSIDE]]),
    "]" => Builtin::Slots(&[&["%b[]"], &[BALANCED_INSIDE]]),
    "}" => Builtin::Slots(&[&["%b{}"], &[BALANCED_INSIDE]]),
    ">" => Builtin::Slots(&[&["%b<>"], &[BALANCED_INSIDE]]),
    "b" => Builtin::Slots(&[&["%b()", "%b[]", "%b{}"], &[BALANCED_INSIDE]]),
    "q" => Builtin::Slots(&[&["%b''", "%b\"\"", "%b``"], &[BALANCED_INSIDE]]),
    "'" => Builtin::Slots(&[&["%b''"], &[BALANCED_INSIDE]]),
    "\"" => Builtin::Slots(&[&["%b\"\""], &[BALANCED_INSIDE]]),
    "`" => Builtin::Slots(&[&["%b``"], &[BALANCED_INSIDE]]),
    "t" => Builtin::Slots(&[&["<(%w-)%f[^<%w][^<>]->.-</%1>"], &["^<.->().*()</[^/]->$"]]),
    "a" => Builtin::Argument,
    "f" => Builtin::FunctionCall,
    "?" => Builtin::Prompted,
};

// ─── Generators ──────────────────────────────────────────────────────────────

/// How the edges of a pair relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    /// Nested pairs are matched up, like brackets. Single-byte edges only.
    Balanced,
    /// The nearest right edge closes the pair.
    #[default]
    NonBalanced,
    /// Runs of repeated edges count as one edge, like `**bold**`.
    /// Single-byte edges only.
    Greedy,
}

impl PairKind {
    fn name(self) -> &'static str {
        match self {
            PairKind::Balanced => "balanced",
            PairKind::NonBalanced => "non_balanced",
            PairKind::Greedy => "greedy",
        }
    }
}

/// A textobject delimited by `left` and `right`.
pub fn pair(left: &str, right: &str, kind: PairKind) -> Result<ComposedPattern, DefinitionError> {
    if left.is_empty() || right.is_empty() {
        return Err(DefinitionError::EmptyEdge { what: "pair edge" });
    }
    let single_byte = |edge: &str| {
        if edge.len() == 1 {
            Ok(())
        } else {
            Err(DefinitionError::InvalidPairEdge {
                kind: kind.name(),
                edge: edge.to_string(),
            })
        }
    };
    let (l, r) = (escape(left), escape(right));
    let slots = match kind {
        PairKind::Balanced => {
            single_byte(left)?;
            single_byte(right)?;
            vec![
                Slot::single(&format!("%b{left}{right}"))?,
                Slot::single(BALANCED_INSIDE)?,
            ]
        }
        PairKind::NonBalanced => vec![Slot::single(&format!("{l}().-(){r}"))?],
        PairKind::Greedy => {
            single_byte(left)?;
            single_byte(right)?;
            // The inside must start with a byte other than `left`, so the
            // closing run never matches as a pair of its own.
            vec![
                Slot::single(&format!("%f[{l}]{l}+[^{l}].-{r}+%f[^{r}]"))?,
                Slot::single(&format!("^{l}+().-(){r}+$"))?,
            ]
        }
    };
    ComposedPattern::new(slots).ok_or(DefinitionError::EmptyEdge { what: "pair" })
}

/// Function call such as `foo.bar(x, y)`: around is the whole call, inside
/// is the argument list.
pub fn function_call(name_set: &str) -> Result<ComposedPattern, DefinitionError> {
    if name_set.is_empty() {
        return Err(DefinitionError::EmptyEdge {
            what: "function name set",
        });
    }
    let slots = vec![
        Slot::single(&format!("%f{name_set}{name_set}+%b()"))?,
        Slot::single("^.-%(().*()%)$")?,
    ];
    ComposedPattern::new(slots).ok_or(DefinitionError::EmptyEdge { what: "function call" })
}

/// One argument inside `()`, `[]` or `{}`, split on `separator`.
///
/// Separators inside nested brackets and quotes do not split.
pub fn argument(separator: &str) -> Result<ComposedPattern, DefinitionError> {
    if separator.is_empty() {
        return Err(DefinitionError::EmptyEdge {
            what: "argument separator",
        });
    }
    let s = escape(separator);
    let sep = separator.as_bytes().to_vec();
    let segments = SpanFinder::new("argument", move |subject, init| {
        argument_segments(subject, &sep)
            .into_iter()
            .find(|&(from, _)| from >= init)
    });
    let slots = vec![
        Slot::alternatives(["%b()", "%b[]", "%b{}"])?,
        Slot::finder(segments),
        Slot::alternatives([
            format!("^[%(%[{{]()%s*().-()%s*{s}%s*()$").as_str(),
            format!("^(){s}%s*().-()%s*(){s}$").as_str(),
            format!("^(){s}%s*().-()%s*()[%)%]}}]$").as_str(),
            "^[%(%[{]()%s*().-()%s*()[%)%]}]$",
        ])?,
    ];
    ComposedPattern::new(slots).ok_or(DefinitionError::EmptyEdge { what: "argument" })
}

/// Split a bracketed run into argument segments.
///
/// The first segment runs from the open bracket through the first separator
/// and the whitespace after it; the others run from a separator through the
/// next separator, or the close bracket for the last one.
fn argument_segments(subject: &[u8], sep: &[u8]) -> Vec<(usize, usize)> {
    let n = subject.len();
    if n < 2 {
        return Vec::new();
    }
    let inner_end = n - 1;
    let mut seps = Vec::new();
    let mut depth = 0usize;
    let mut i = 1;
    while i < inner_end {
        let b = subject[i];
        if depth == 0 && subject[i..inner_end].starts_with(sep) {
            seps.push(i);
            i += sep.len();
            continue;
        }
        match b {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'"' | b'\'' | b'`' => {
                // Unterminated quotes are ordinary bytes
                if let Some(close) = subject[i + 1..inner_end].iter().position(|&c| c == b) {
                    i += close + 2;
                    continue;
                }
            }
            _ => {}
        }
        i += 1;
    }

    let Some((&first, _)) = seps.split_first() else {
        return vec![(0, n)];
    };
    let mut first_end = first + sep.len();
    while first_end < inner_end && is_space(subject[first_end]) {
        first_end += 1;
    }
    let mut segments = vec![(0, first_end)];
    segments.extend(seps.windows(2).map(|w| (w[0], w[1] + sep.len())));
    if let Some(&last) = seps.last() {
        segments.push((last, n));
    }
    segments
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

/// What an id resolves to.
#[derive(Debug, Clone)]
pub enum Lookup {
    Pattern(ComposedPattern),
    /// Edges have to be asked for.
    Prompted,
    Disabled,
    Unknown,
}

/// The textobjects available to a resolver.
#[derive(Debug, Clone)]
pub struct Textobjects {
    /// `None` disables an id.
    custom: HashMap<char, Option<ComposedPattern>>,
    argument_separator: String,
    function_name_set: String,
}

impl Default for Textobjects {
    fn default() -> Self {
        Self {
            custom: HashMap::new(),
            argument_separator: DEFAULT_ARGUMENT_SEPARATOR.to_string(),
            function_name_set: DEFAULT_FUNCTION_NAME_SET.to_string(),
        }
    }
}

impl Textobjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `separator` for the `a` textobject.
    pub fn set_argument_separator(&mut self, separator: &str) -> Result<(), DefinitionError> {
        argument(separator)?;
        self.argument_separator = separator.to_string();
        Ok(())
    }

    /// Use `name_set` (a `[...]` set) for function names of the `f` textobject.
    pub fn set_function_name_set(&mut self, name_set: &str) -> Result<(), DefinitionError> {
        function_call(name_set)?;
        self.function_name_set = name_set.to_string();
        Ok(())
    }

    /// Add or replace textobject `id`.
    pub fn insert(&mut self, id: char, pattern: ComposedPattern) {
        debug!(%id, "custom textobject");
        self.custom.insert(id, Some(pattern));
    }

    /// Switch textobject `id` off, built-in or not.
    pub fn disable(&mut self, id: char) {
        debug!(%id, "textobject disabled");
        self.custom.insert(id, None);
    }

    pub fn lookup(&self, id: char) -> Result<Lookup, DefinitionError> {
        if let Some(entry) = self.custom.get(&id) {
            return Ok(match entry {
                Some(pattern) => Lookup::Pattern(pattern.clone()),
                None => Lookup::Disabled,
            });
        }
        let mut buf = [0u8; 4];
        let key: &str = id.encode_utf8(&mut buf);
        match BUILTIN_TABLE.get(key).copied() {
            Some(Builtin::Slots(slots)) => Ok(ComposedPattern::parse(slots)?
                .map_or(Lookup::Disabled, Lookup::Pattern)),
            Some(Builtin::Argument) => argument(&self.argument_separator).map(Lookup::Pattern),
            Some(Builtin::FunctionCall) => {
                function_call(&self.function_name_set).map(Lookup::Pattern)
            }
            Some(Builtin::Prompted) => Ok(Lookup::Prompted),
            None if is_fallback_id(id) => {
                let x = escape(id.encode_utf8(&mut buf));
                let slot = Slot::single(&format!("{x}().-(){x}"))?;
                Ok(ComposedPattern::new(vec![slot]).map_or(Lookup::Disabled, Lookup::Pattern))
            }
            None => Ok(Lookup::Unknown),
        }
    }
}

/// Ids without a table entry that still make a textobject of their own.
fn is_fallback_id(id: char) -> bool {
    id.is_ascii_punctuation() || id.is_ascii_digit() || id.is_ascii_whitespace()
}
