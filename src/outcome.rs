//! Results of textobject requests that can fail without an error.

use std::fmt;

use crate::options::AiType;
use crate::search::SearchMethod;

/// The result of a textobject request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Found(T),
    Failed(Failure),
}

/// Why a request produced nothing.
///
/// None of these are errors; the host decides whether to show them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// No built-in or custom textobject has this id.
    UnknownId(char),
    /// A custom entry switched the textobject off.
    Disabled(char),
    /// The user gave no input at a prompt.
    Cancelled,
    /// Nothing acceptable was found.
    NoMatch(NoMatch),
}

/// Details of an unsuccessful search, for the "not found" message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMatch {
    pub id: char,
    pub ai_type: AiType,
    pub search_method: SearchMethod,
    pub n_lines: usize,
    pub n_times: usize,
}

impl<T> Outcome<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Outcome::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Outcome::Found(value) => Some(value),
            Outcome::Failed(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Found(value) => Outcome::Found(f(value)),
            Outcome::Failed(failure) => Outcome::Failed(failure),
        }
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Outcome::Failed(failure)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::UnknownId(id) => write!(f, "{id:?} is not a textobject identifier"),
            Failure::Disabled(id) => write!(f, "textobject {id:?} is disabled"),
            Failure::Cancelled => f.write_str("cancelled"),
            Failure::NoMatch(no_match) => no_match.fmt(f),
        }
    }
}

impl fmt::Display for NoMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nth = if self.n_times > 1 {
            format!("{} ", self.n_times)
        } else {
            String::new()
        };
        write!(
            f,
            "no {nth}textobject \"{}{}\" found covering region within {} lines and search_method = \"{}\"",
            self.ai_type, self.id, self.n_lines, self.search_method
        )
    }
}
