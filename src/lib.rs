//! Textobject span resolver: find brackets, quotes, tags, arguments and
//! function calls around a cursor.
//!
//! Textobjects are composed patterns written in a small Lua-style pattern
//! dialect (see [`pattern`]). Each slot narrows the search inside the match
//! of the slot before it, and the last slot marks which part of the match is
//! "around" and which is "inside".
//!
//! # Example
//!
//! ```rust
//! use ai_textobjects::{NoPrompt, Outcome, Position, Query, Region, Resolver};
//!
//! let lines = ["let x = f(a, (b + c));"];
//! let mut resolver = Resolver::default();
//!
//! // Inside the nearest brackets around the `b`
//! let inside = resolver
//!     .find_textobject(&lines, Position::new(1, 15), &Query::inside(')'), &mut NoPrompt)
//!     .unwrap();
//! assert_eq!(inside, Outcome::Found(Region::new(Position::new(1, 15), Position::new(1, 19))));
//!
//! // Count 2 goes one level further out
//! let outer = resolver
//!     .find_textobject(&lines, Position::new(1, 15), &Query::around(')').n_times(2), &mut NoPrompt)
//!     .unwrap();
//! assert_eq!(outer, Outcome::Found(Region::new(Position::new(1, 10), Position::new(1, 21))));
//! ```

pub mod composed;
pub mod config;
pub mod error;
pub mod extract;
pub mod lines;
pub mod neighborhood;
pub mod options;
pub mod outcome;
pub mod pattern;
mod position;
pub mod prompt;
pub mod resolver;
pub mod search;
mod span;
pub mod table;

pub use composed::{ComposedPattern, Matcher, Slot, SpanFinder};
pub use config::Config;
pub use error::{ConfigError, DefinitionError};
pub use lines::LineSource;
pub use options::{AiType, Options, Query, Side};
pub use outcome::{Failure, NoMatch, Outcome};
pub use pattern::PatternError;
pub use position::{Position, Region};
pub use prompt::{NoPrompt, Prompt, PromptCache};
pub use resolver::{Resolver, find_region};
pub use search::SearchMethod;
pub use span::Span;
pub use table::{PairKind, Textobjects};
