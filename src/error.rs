//! Error types.
//!
//! Only misconfiguration is an error. Ordinary misses (unknown id, no
//! match) are reported through [`Outcome`](crate::outcome::Outcome).

use std::path::PathBuf;

use thiserror::Error;

use crate::pattern::PatternError;

/// A textobject definition that can never produce a region.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        source: PatternError,
    },
    #[error("extraction pattern {template:?} should return 2 or 4 empty captures, got {found}")]
    ExtractionArity { template: String, found: usize },
    #[error("extraction pattern {template:?} should only use empty captures `()`")]
    NonPositionCapture { template: String },
    #[error("span finder {finder} cannot be used as an extraction pattern")]
    FinderTemplate { finder: String },
    #[error("{kind} pair edges should be single bytes, got {edge:?}")]
    InvalidPairEdge { kind: &'static str, edge: String },
    #[error("{what} should not be empty")]
    EmptyEdge { what: &'static str },
}

/// Problems found while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(
        "unknown search method {0:?}; expected one of cover, cover_or_next, cover_or_prev, \
         cover_or_nearest, next, prev, nearest"
    )]
    InvalidSearchMethod(String),
    #[error("textobject id should be a single character, got {0:?}")]
    InvalidId(String),
    #[error("textobject {id:?}: {source}")]
    Definition {
        id: char,
        source: DefinitionError,
    },
}
