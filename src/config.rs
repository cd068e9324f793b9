//! Configuration loading.
//!
//! Reads an optional TOML file with search defaults, generator settings and
//! custom textobjects. Every key may be left out. Definitions are checked
//! here, so a loaded [`Config`] never fails later because of a bad pattern.
//! Unknown keys are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::composed::ComposedPattern;
use crate::error::{ConfigError, DefinitionError};
use crate::options::{DEFAULT_N_LINES, Options};
use crate::search::SearchMethod;
use crate::table::{
    DEFAULT_ARGUMENT_SEPARATOR, DEFAULT_FUNCTION_NAME_SET, PairKind, Textobjects, pair,
};

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigFile {
    #[serde(default = "ConfigFile::default_n_lines")]
    pub n_lines: usize,
    #[serde(default)]
    pub search_method: SearchMethod,
    #[serde(default)]
    pub argument: ArgumentConfig,
    #[serde(default)]
    pub function_call: FunctionCallConfig,
    #[serde(default)]
    pub custom_textobjects: BTreeMap<String, CustomTextobject>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            n_lines: Self::default_n_lines(),
            search_method: SearchMethod::default(),
            argument: ArgumentConfig::default(),
            function_call: FunctionCallConfig::default(),
            custom_textobjects: BTreeMap::new(),
        }
    }
}

impl ConfigFile {
    fn default_n_lines() -> usize {
        DEFAULT_N_LINES
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArgumentConfig {
    #[serde(default = "ArgumentConfig::default_separator")]
    pub separator: String,
}

impl Default for ArgumentConfig {
    fn default() -> Self {
        Self {
            separator: Self::default_separator(),
        }
    }
}

impl ArgumentConfig {
    fn default_separator() -> String {
        DEFAULT_ARGUMENT_SEPARATOR.to_string()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FunctionCallConfig {
    #[serde(default = "FunctionCallConfig::default_name_set")]
    pub name_set: String,
}

impl Default for FunctionCallConfig {
    fn default() -> Self {
        Self {
            name_set: Self::default_name_set(),
        }
    }
}

impl FunctionCallConfig {
    fn default_name_set() -> String {
        DEFAULT_FUNCTION_NAME_SET.to_string()
    }
}

/// A `[custom_textobjects]` entry.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum CustomTextobject {
    /// `{ pair = ["*", "*"], kind = "greedy" }`
    Pair {
        pair: [String; 2],
        #[serde(default)]
        kind: PairKind,
    },
    /// `["%b()", "^.().*().$"]`; an empty list disables the id.
    Slots(Vec<SlotSpec>),
}

/// One slot: a pattern or a list of alternative patterns.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SlotSpec {
    One(String),
    Alternatives(Vec<String>),
}

impl SlotSpec {
    fn alternatives(&self) -> &[String] {
        match self {
            SlotSpec::One(pattern) => std::slice::from_ref(pattern),
            SlotSpec::Alternatives(patterns) => patterns,
        }
    }
}

impl CustomTextobject {
    /// The composed pattern of this entry; `None` when it disables the id.
    fn build(&self) -> Result<Option<ComposedPattern>, DefinitionError> {
        match self {
            CustomTextobject::Pair {
                pair: [left, right],
                kind,
            } => pair(left, right, *kind).map(Some),
            CustomTextobject::Slots(slots) => {
                let slots: Vec<&[String]> = slots.iter().map(SlotSpec::alternatives).collect();
                ComposedPattern::parse(&slots)
            }
        }
    }
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub n_lines: usize,
    pub search_method: SearchMethod,
    pub textobjects: Textobjects,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            n_lines: DEFAULT_N_LINES,
            search_method: SearchMethod::default(),
            textobjects: Textobjects::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        Self::from_file(&file)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_file(file: &ConfigFile) -> Result<Self, ConfigError> {
        let mut textobjects = Textobjects::new();
        textobjects
            .set_argument_separator(&file.argument.separator)
            .map_err(|source| ConfigError::Definition { id: 'a', source })?;
        textobjects
            .set_function_name_set(&file.function_call.name_set)
            .map_err(|source| ConfigError::Definition { id: 'f', source })?;

        for (key, entry) in &file.custom_textobjects {
            let id = single_char(key)?;
            match entry
                .build()
                .map_err(|source| ConfigError::Definition { id, source })?
            {
                Some(pattern) => textobjects.insert(id, pattern),
                None => textobjects.disable(id),
            }
        }

        Ok(Self {
            n_lines: file.n_lines,
            search_method: file.search_method,
            textobjects,
        })
    }

    /// Request options seeded from this configuration.
    pub fn options(&self) -> Options {
        Options {
            n_lines: self.n_lines,
            search_method: self.search_method,
            ..Options::default()
        }
    }
}

fn single_char(key: &str) -> Result<char, ConfigError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(id), None) => Ok(id),
        _ => Err(ConfigError::InvalidId(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Lookup;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.n_lines, 20);
        assert_eq!(config.search_method, SearchMethod::CoverOrNext);
        assert_eq!(config.options(), Options::default());
    }

    #[test]
    fn top_level_keys() {
        let config = Config::from_toml_str(
            r#"
            n_lines = 5
            search_method = "cover_or_nearest"
            "#,
        )
        .unwrap();
        assert_eq!(config.n_lines, 5);
        assert_eq!(config.search_method, SearchMethod::CoverOrNearest);
    }

    #[test]
    fn invalid_search_method_fails_at_load() {
        let err = Config::from_toml_str(r#"search_method = "closest""#).unwrap_err();
        assert!(err.to_string().contains("unknown search method"), "{err}");
    }

    #[test]
    fn custom_textobjects() {
        let config = Config::from_toml_str(
            r#"
            [custom_textobjects]
            x = ["%b()", "^.().*().$"]
            y = [["%b()", "%b[]"], "^.().*().$"]
            "*" = { pair = ["*", "*"], kind = "greedy" }
            "(" = []
            "#,
        )
        .unwrap();
        let t = &config.textobjects;
        assert!(matches!(t.lookup('x').unwrap(), Lookup::Pattern(p) if p.slots().len() == 2));
        assert!(matches!(t.lookup('y').unwrap(), Lookup::Pattern(p) if p.nested_patterns().len() == 2));
        assert!(matches!(t.lookup('*').unwrap(), Lookup::Pattern(p) if p.slots().len() == 1));
        assert!(matches!(t.lookup('(').unwrap(), Lookup::Disabled));
    }

    #[test]
    fn pair_kind_defaults_to_non_balanced() {
        let file: ConfigFile = toml::from_str(
            r#"
            [custom_textobjects]
            m = { pair = ["<<", ">>"] }
            "#,
        )
        .unwrap();
        assert_eq!(
            file.custom_textobjects["m"],
            CustomTextobject::Pair {
                pair: ["<<".to_string(), ">>".to_string()],
                kind: PairKind::NonBalanced,
            }
        );
    }

    #[test]
    fn bad_pattern_names_the_id() {
        let err = Config::from_toml_str(
            r#"
            [custom_textobjects]
            z = ["%b("]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Definition { id: 'z', .. }));
    }

    #[test]
    fn multi_char_id_is_rejected() {
        let err = Config::from_toml_str(
            r#"
            [custom_textobjects]
            xy = ["a().-()b"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidId(id) if id == "xy"));
    }

    #[test]
    fn empty_separator_is_rejected() {
        let err = Config::from_toml_str(
            r#"
            [argument]
            separator = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Definition { id: 'a', .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load_from(Path::new("/nonexistent/ai-textobjects.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
