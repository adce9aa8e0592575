//! Named highlighting modes

use std::sync::Arc;

use ahash::AHashMap;
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::rules::Grammar;
use crate::tokenizer::Tokenizer;
use crate::{xml, zendesk};

/// A compiled grammar registered under a name
#[derive(Debug, Clone)]
pub struct Mode {
    name: String,
    grammar: Arc<Grammar>,
}

impl Mode {
    pub fn new(name: impl Into<String>, grammar: impl Into<Arc<Grammar>>) -> Self {
        Self {
            name: name.into(),
            grammar: grammar.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(Arc::clone(&self.grammar))
    }
}

/// Registry for looking up modes by name (case-insensitive)
#[derive(Debug, Default)]
pub struct ModeRegistry {
    modes: Vec<Mode>,
    by_name: AHashMap<String, usize>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the `xml` and `zendesk_xml` modes
    pub fn with_builtin() -> ConfigResult<Self> {
        let mut registry = Self::new();
        registry.register(xml::mode()?)?;
        registry.register(zendesk::mode()?)?;
        Ok(registry)
    }

    /// Register a mode; names must be unique
    pub fn register(&mut self, mode: Mode) -> ConfigResult<()> {
        let key = mode.name().to_ascii_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(ConfigError::DuplicateMode(mode.name().to_string()));
        }
        debug!(mode = %mode.name(), states = mode.grammar().len(), "Registered mode");
        self.by_name.insert(key, self.modes.len());
        self.modes.push(mode);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Mode> {
        let index = self.by_name.get(&name.to_ascii_lowercase())?;
        self.modes.get(*index)
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.modes.iter().map(Mode::name).collect()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}
