//! Construction-time error types
//!
//! Tokenizing never fails. Everything that can go wrong happens while a rule
//! table is being normalized or a keyword mapper is being built, and is
//! reported through [`ConfigError`].

use thiserror::Error;

/// Authoring defects detected while building grammars, classifiers and modes
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A rule pattern failed to compile
    #[error("invalid pattern in state '{state}' (rule {index}): {source}")]
    InvalidPattern {
        state: String,
        index: usize,
        #[source]
        source: regex::Error,
    },

    /// A rule pattern matches the empty string and would stall the tokenizer
    #[error("pattern '{pattern}' in state '{state}' can match the empty string")]
    EmptyMatch { state: String, pattern: String },

    /// A transition or start state names a state that does not exist
    #[error("state '{from}' refers to unknown state '{target}'")]
    UnknownState { from: String, target: String },

    /// An include directive names a state that does not exist
    #[error("state '{state}' includes unknown state '{include}'")]
    UnknownInclude { state: String, include: String },

    /// Include directives form a cycle
    #[error("include cycle through state '{state}'")]
    IncludeCycle { state: String },

    /// A per-group token list does not line up with the pattern's capture groups
    #[error(
        "pattern '{pattern}' in state '{state}' has {groups} capture groups but {tokens} token labels"
    )]
    GroupMismatch {
        state: String,
        pattern: String,
        groups: usize,
        tokens: usize,
    },

    /// The same state name was defined twice
    #[error("state '{0}' is defined more than once")]
    DuplicateState(String),

    /// The same keyword appears in two families
    #[error("keyword '{keyword}' is listed under both '{first}' and '{second}'")]
    DuplicateKeyword {
        keyword: String,
        first: String,
        second: String,
    },

    /// A mode with this name is already registered
    #[error("mode already registered: {0}")]
    DuplicateMode(String),
}

/// Result type for grammar and mode construction
pub type ConfigResult<T> = Result<T, ConfigError>;
