//! Request parameters.

use std::fmt;
use std::str::FromStr;

use crate::position::Region;
use crate::search::SearchMethod;

/// Default number of lines searched around the reference when widening.
pub const DEFAULT_N_LINES: usize = 20;

/// Which part of a textobject is wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiType {
    /// The whole textobject, edges included.
    Around,
    /// The contents between the edges.
    Inside,
}

impl fmt::Display for AiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AiType::Around => "a",
            AiType::Inside => "i",
        })
    }
}

impl FromStr for AiType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "a" => Ok(AiType::Around),
            "i" => Ok(AiType::Inside),
            other => Err(format!("expected \"a\" or \"i\", got {other:?}")),
        }
    }
}

/// Edge of a region a cursor motion goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Per-request search options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Lines around the reference searched when the reference lines alone
    /// hold no match.
    pub n_lines: usize,
    /// Number of evolutions; 2 selects the textobject around the first one.
    pub n_times: usize,
    /// Region the search starts from. Defaults to the cursor byte.
    pub reference_region: Option<Region>,
    pub search_method: SearchMethod,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            n_lines: DEFAULT_N_LINES,
            n_times: 1,
            reference_region: None,
            search_method: SearchMethod::default(),
        }
    }
}

/// A single textobject request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub id: char,
    pub ai_type: AiType,
    pub options: Options,
}

impl Query {
    pub fn new(id: char, ai_type: AiType) -> Self {
        Self {
            id,
            ai_type,
            options: Options::default(),
        }
    }

    pub fn around(id: char) -> Self {
        Self::new(id, AiType::Around)
    }

    pub fn inside(id: char) -> Self {
        Self::new(id, AiType::Inside)
    }

    pub fn n_times(mut self, n_times: usize) -> Self {
        self.options.n_times = n_times;
        self
    }

    pub fn n_lines(mut self, n_lines: usize) -> Self {
        self.options.n_lines = n_lines;
        self
    }

    pub fn search_method(mut self, method: SearchMethod) -> Self {
        self.options.search_method = method;
        self
    }

    pub fn reference_region(mut self, region: Region) -> Self {
        self.options.reference_region = Some(region);
        self
    }
}
