//! Rule normalization: RuleSet → Grammar

use ahash::AHashMap;
use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::{Entry, Next, Rule, RuleSet, TokenSpec};
use crate::error::{ConfigError, ConfigResult};
use crate::token::TokenType;

/// Index of a state inside a [`Grammar`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Resolved state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Goto(StateId),
    Push(StateId),
    Pop,
}

/// A rule with its pattern compiled and anchored at the scan position
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pattern: String,
    pub(crate) regex: Regex,
    pub(crate) token: TokenSpec,
    pub(crate) transition: Transition,
}

impl CompiledRule {
    /// The pattern as written in the rule set
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn token(&self) -> &TokenSpec {
        &self.token
    }

    pub fn transition(&self) -> Transition {
        self.transition
    }
}

/// A state with includes flattened
#[derive(Debug, Clone)]
pub struct CompiledState {
    name: String,
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) default_token: TokenType,
}

impl CompiledState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn default_token(&self) -> TokenType {
        self.default_token
    }
}

/// Compiled, validated and immutable rule table
#[derive(Debug, Clone)]
pub struct Grammar {
    states: Vec<CompiledState>,
    index: AHashMap<String, StateId>,
    start: StateId,
}

impl Grammar {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(name).copied()
    }

    /// Compiled state for `id`; `None` for ids from another grammar
    pub fn state(&self, id: StateId) -> Option<&CompiledState> {
        self.states.get(id.0)
    }

    /// Indexed lookup for ids already checked against this grammar
    pub(crate) fn compiled(&self, id: StateId) -> &CompiledState {
        &self.states[id.0]
    }

    /// Whether `id` names a state of this grammar
    pub fn contains(&self, id: StateId) -> bool {
        id.0 < self.states.len()
    }

    /// Look up a compiled state by name
    pub fn state_named(&self, name: &str) -> Option<&CompiledState> {
        self.state_id(name).and_then(|id| self.state(id))
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|state| state.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl RuleSet {
    /// Compile this rule set into a [`Grammar`] starting in `start`
    pub fn normalize(&self, start: &str) -> ConfigResult<Grammar> {
        let mut index = AHashMap::with_capacity(self.len());
        for (i, name) in self.state_names().enumerate() {
            if index.insert(name.to_string(), StateId(i)).is_some() {
                return Err(ConfigError::DuplicateState(name.to_string()));
            }
        }

        let start_id = index
            .get(start)
            .copied()
            .ok_or_else(|| ConfigError::UnknownState {
                from: "<start>".to_string(),
                target: start.to_string(),
            })?;

        let mut states = Vec::with_capacity(self.len());
        for (name, state) in self.states() {
            let mut visiting = Vec::new();
            let flat = flatten(self, name, &mut visiting)?;

            let mut rules = Vec::with_capacity(flat.len());
            for (i, rule) in flat.into_iter().enumerate() {
                rules.push(compile_rule(name, i, rule, &index)?);
            }

            states.push(CompiledState {
                name: name.to_string(),
                rules,
                default_token: state.default_token.unwrap_or(TokenType::Text),
            });
        }

        debug!(
            states = states.len(),
            rules = states.iter().map(|s| s.rules.len()).sum::<usize>(),
            start = start,
            "Compiled grammar"
        );

        Ok(Grammar {
            states,
            index,
            start: start_id,
        })
    }
}

/// Expand include directives of `name` into a flat rule list
fn flatten<'r>(
    rules: &'r RuleSet,
    name: &str,
    visiting: &mut Vec<String>,
) -> ConfigResult<Vec<&'r Rule>> {
    if visiting.iter().any(|v| v == name) {
        return Err(ConfigError::IncludeCycle {
            state: name.to_string(),
        });
    }

    let Some(state) = rules.state(name) else {
        let from = visiting.last().cloned().unwrap_or_default();
        return Err(ConfigError::UnknownInclude {
            state: from,
            include: name.to_string(),
        });
    };

    visiting.push(name.to_string());
    let mut flat = Vec::with_capacity(state.entries.len());
    for entry in &state.entries {
        match entry {
            Entry::Rule(rule) => flat.push(rule),
            Entry::Include(other) => flat.extend(flatten(rules, other, visiting)?),
        }
    }
    visiting.pop();

    Ok(flat)
}

fn compile_rule(
    state: &str,
    index_in_state: usize,
    rule: &Rule,
    states: &AHashMap<String, StateId>,
) -> ConfigResult<CompiledRule> {
    let regex = RegexBuilder::new(&format!("^(?:{})", rule.pattern))
        .case_insensitive(rule.case_insensitive)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            state: state.to_string(),
            index: index_in_state,
            source,
        })?;

    if regex.is_match("") {
        return Err(ConfigError::EmptyMatch {
            state: state.to_string(),
            pattern: rule.pattern.clone(),
        });
    }

    if let TokenSpec::Groups(labels) = &rule.token {
        let groups = regex.captures_len() - 1;
        if groups != labels.len() {
            return Err(ConfigError::GroupMismatch {
                state: state.to_string(),
                pattern: rule.pattern.clone(),
                groups,
                tokens: labels.len(),
            });
        }
    }

    let resolve = |target: &String| {
        states
            .get(target)
            .copied()
            .ok_or_else(|| ConfigError::UnknownState {
                from: state.to_string(),
                target: target.clone(),
            })
    };

    let transition = match &rule.next {
        Next::Stay => Transition::Stay,
        Next::Goto(target) => Transition::Goto(resolve(target)?),
        Next::Push(target) => Transition::Push(resolve(target)?),
        Next::Pop => Transition::Pop,
    };

    Ok(CompiledRule {
        pattern: rule.pattern.clone(),
        regex,
        token: rule.token.clone(),
        transition,
    })
}
