//! Keyword classification for template identifiers
//!
//! A [`KeywordMapper`] is built once from family → word-list mappings and
//! then answers `classify(word)` lookups: exact matches through a hash map,
//! prefix entries (words ending in `.` or `_`) through a short ordered list.

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::placeholders::{self, is_prefix_entry};
use crate::token::TokenType;

/// Immutable word → label lookup with a default label
#[derive(Debug, Clone)]
pub struct KeywordMapper {
    exact: AHashMap<String, TokenType>,
    /// Prefix entries in insertion order
    prefixes: Vec<(String, TokenType)>,
    default: TokenType,
}

impl KeywordMapper {
    /// Build a mapper where the first family listing a word wins.
    ///
    /// Later duplicates are dropped with a warning.
    pub fn new<I, W, S>(families: I, default: TokenType) -> Self
    where
        I: IntoIterator<Item = (TokenType, W)>,
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mapper = Self::empty(default);
        for (label, words) in families {
            for word in words {
                let word = word.into();
                if let Some(first) = mapper.get(&word) {
                    if first == label {
                        continue;
                    }
                    warn!(
                        keyword = %word,
                        kept = %first,
                        dropped = %label,
                        "Duplicate keyword across families, keeping first"
                    );
                    continue;
                }
                mapper.insert(word, label);
            }
        }
        debug!(
            exact = mapper.exact.len(),
            prefixes = mapper.prefixes.len(),
            "Built keyword mapper"
        );
        mapper
    }

    /// Build a mapper, rejecting any word listed under two families
    pub fn try_new<I, W, S>(families: I, default: TokenType) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (TokenType, W)>,
        W: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mapper = Self::empty(default);
        for (label, words) in families {
            for word in words {
                let word = word.into();
                if let Some(first) = mapper.get(&word) {
                    // Repeats inside one family are harmless
                    if first == label {
                        continue;
                    }
                    return Err(ConfigError::DuplicateKeyword {
                        keyword: word,
                        first: first.to_string(),
                        second: label.to_string(),
                    });
                }
                mapper.insert(word, label);
            }
        }
        debug!(
            exact = mapper.exact.len(),
            prefixes = mapper.prefixes.len(),
            "Built keyword mapper"
        );
        Ok(mapper)
    }

    /// Mapper over the five placeholder tables, defaulting to `Identifier`
    pub fn placeholders() -> ConfigResult<Self> {
        Self::try_new(
            placeholders::tables().map(|(family, table)| {
                (TokenType::Placeholder(family), table.iter().copied())
            }),
            TokenType::Identifier,
        )
    }

    fn empty(default: TokenType) -> Self {
        Self {
            exact: AHashMap::new(),
            prefixes: Vec::new(),
            default,
        }
    }

    fn insert(&mut self, word: String, label: TokenType) {
        if is_prefix_entry(&word) {
            self.prefixes.push((word.clone(), label));
        }
        self.exact.insert(word, label);
    }

    /// Label registered for exactly this word
    #[inline]
    pub fn get(&self, word: &str) -> Option<TokenType> {
        self.exact.get(word).copied()
    }

    /// Classify a word.
    ///
    /// Exact entries win; otherwise the longest prefix entry whose remainder
    /// is a single non-empty segment; otherwise the default label.
    pub fn classify(&self, word: &str) -> TokenType {
        if let Some(label) = self.get(word) {
            return label;
        }

        let mut best: Option<(usize, TokenType)> = None;
        for (prefix, label) in &self.prefixes {
            let Some(rest) = word.strip_prefix(prefix.as_str()) else {
                continue;
            };
            if rest.is_empty() || rest.contains('.') {
                continue;
            }
            if best.is_none_or(|(len, _)| prefix.len() > len) {
                best = Some((prefix.len(), *label));
            }
        }

        best.map(|(_, label)| label).unwrap_or(self.default)
    }

    /// Label returned for unknown words
    pub fn default_label(&self) -> TokenType {
        self.default
    }

    /// Number of registered words
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    /// Check if no word is registered
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}
