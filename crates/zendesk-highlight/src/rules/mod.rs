//! Rule tables
//!
//! A [`RuleSet`] is the authoring form of a grammar: named states, each an
//! ordered list of rules and `include` directives. It is plain data and can
//! be transformed freely (see [`RuleSet::prepend_to_all`]). Calling
//! [`RuleSet::normalize`] resolves includes and state names, compiles the
//! patterns, and produces an immutable [`Grammar`] for the tokenizer.

mod normalize;

use std::sync::Arc;

use crate::keywords::KeywordMapper;
use crate::token::TokenType;

pub use normalize::{CompiledRule, CompiledState, Grammar, StateId, Transition};

/// How a matched span is labelled
#[derive(Debug, Clone)]
pub enum TokenSpec {
    /// One token with a fixed label
    Fixed(TokenType),
    /// One token per capture group, labelled positionally
    Groups(Vec<TokenType>),
    /// One token labelled by classifying the matched text
    Keywords(Arc<KeywordMapper>),
}

impl TokenSpec {
    /// Label for a whole matched span; `None` for per-group specs, which
    /// label their groups individually
    pub fn label_for(&self, text: &str) -> Option<TokenType> {
        match self {
            TokenSpec::Fixed(label) => Some(*label),
            TokenSpec::Groups(_) => None,
            TokenSpec::Keywords(mapper) => Some(mapper.classify(text)),
        }
    }
}

impl From<TokenType> for TokenSpec {
    fn from(label: TokenType) -> Self {
        TokenSpec::Fixed(label)
    }
}

/// State change after a rule matches, by state name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Next {
    /// Stay in the current state
    #[default]
    Stay,
    /// Replace the current state
    Goto(String),
    /// Enter a state, remembering the current one
    Push(String),
    /// Return to the remembered state (the start state if none)
    Pop,
}

/// A single pattern → label rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: String,
    pub token: TokenSpec,
    pub next: Next,
    pub case_insensitive: bool,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, token: impl Into<TokenSpec>) -> Self {
        Self {
            pattern: pattern.into(),
            token: token.into(),
            next: Next::Stay,
            case_insensitive: false,
        }
    }

    /// Rule labelling each capture group
    pub fn groups(pattern: impl Into<String>, labels: impl IntoIterator<Item = TokenType>) -> Self {
        Self::new(pattern, TokenSpec::Groups(labels.into_iter().collect()))
    }

    /// Rule labelling its match through a keyword mapper
    pub fn keywords(pattern: impl Into<String>, mapper: Arc<KeywordMapper>) -> Self {
        Self::new(pattern, TokenSpec::Keywords(mapper))
    }

    pub fn goto(mut self, state: impl Into<String>) -> Self {
        self.next = Next::Goto(state.into());
        self
    }

    pub fn push(mut self, state: impl Into<String>) -> Self {
        self.next = Next::Push(state.into());
        self
    }

    pub fn pop(mut self) -> Self {
        self.next = Next::Pop;
        self
    }

    pub fn ignore_case(mut self) -> Self {
        self.case_insensitive = true;
        self
    }
}

/// An entry of a state's rule list
#[derive(Debug, Clone)]
pub enum Entry {
    Rule(Rule),
    /// Splice in the rules of another state at this position
    Include(String),
}

impl Entry {
    pub fn as_rule(&self) -> Option<&Rule> {
        match self {
            Entry::Rule(rule) => Some(rule),
            Entry::Include(_) => None,
        }
    }
}

impl From<Rule> for Entry {
    fn from(rule: Rule) -> Self {
        Entry::Rule(rule)
    }
}

/// Shorthand for an include entry
pub fn include(state: impl Into<String>) -> Entry {
    Entry::Include(state.into())
}

/// A named lexical context
#[derive(Debug, Clone, Default)]
pub struct State {
    pub entries: Vec<Entry>,
    /// Label for characters no rule matches (plain text if unset)
    pub default_token: Option<TokenType>,
}

impl State {
    pub fn new(entries: impl IntoIterator<Item = Entry>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
            default_token: None,
        }
    }

    pub fn with_default(mut self, label: TokenType) -> Self {
        self.default_token = Some(label);
        self
    }
}

/// Ordered collection of named states
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    states: Vec<(String, State)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a state. Duplicate names are reported by [`RuleSet::normalize`].
    pub fn with_state(mut self, name: impl Into<String>, state: State) -> Self {
        self.states.push((name.into(), state));
        self
    }

    /// Look up a state by name
    pub fn state(&self, name: &str) -> Option<&State> {
        self.states
            .iter()
            .find(|(state_name, _)| state_name == name)
            .map(|(_, state)| state)
    }

    /// State names in definition order
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|(name, _)| name.as_str())
    }

    /// Iterate over states in definition order
    pub fn states(&self) -> impl Iterator<Item = (&str, &State)> {
        self.states.iter().map(|(name, state)| (name.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Return a rule set in which every existing state starts with `rules`
    pub fn prepend_to_all(mut self, rules: &[Rule]) -> Self {
        for (_, state) in &mut self.states {
            let mut entries: Vec<Entry> = rules.iter().cloned().map(Entry::Rule).collect();
            entries.append(&mut state.entries);
            state.entries = entries;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RuleSet {
        RuleSet::new()
            .with_state(
                "start",
                State::new([
                    Rule::new("<", TokenType::Text).push("tag").into(),
                    include("shared"),
                ]),
            )
            .with_state(
                "tag",
                State::new([Rule::new(">", TokenType::Text).pop().into()]),
            )
            .with_state("shared", State::new([Rule::new(r"\s+", TokenType::Text).into()]))
    }

    #[test]
    fn test_rule_builders() {
        let rule = Rule::new("a", TokenType::Text).push("x");
        assert_eq!(rule.next, Next::Push("x".into()));
        let rule = Rule::new("a", TokenType::Text).goto("y").ignore_case();
        assert_eq!(rule.next, Next::Goto("y".into()));
        assert!(rule.case_insensitive);
        assert_eq!(Rule::new("a", TokenType::Text).pop().next, Next::Pop);
    }

    #[test]
    fn test_state_lookup() {
        let rules = sample();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules.state_names().collect::<Vec<_>>(), vec!["start", "tag", "shared"]);
        assert!(rules.state("tag").is_some());
        assert!(rules.state("missing").is_none());
    }

    #[test]
    fn test_prepend_to_all() {
        let rules = sample().prepend_to_all(&[
            Rule::new("a", TokenType::Variable),
            Rule::new("b", TokenType::Variable),
        ]);
        for (name, state) in rules.states() {
            let patterns: Vec<_> = state
                .entries
                .iter()
                .take(2)
                .filter_map(Entry::as_rule)
                .map(|rule| rule.pattern.as_str())
                .collect();
            assert_eq!(patterns, vec!["a", "b"], "state {name}");
        }
        assert_eq!(rules.state("start").unwrap().entries.len(), 4);
    }

    #[test]
    fn test_keyword_spec_labels_by_text() {
        let mapper = Arc::new(KeywordMapper::new(
            vec![(TokenType::Boolean, vec!["yes"])],
            TokenType::Identifier,
        ));
        let spec = TokenSpec::Keywords(mapper);
        assert_eq!(spec.label_for("yes"), Some(TokenType::Boolean));
        assert_eq!(spec.label_for("no"), Some(TokenType::Identifier));
    }

    #[test]
    fn test_group_spec_has_no_span_label() {
        let spec = TokenSpec::Groups(vec![TokenType::ParenOpen, TokenType::Identifier]);
        assert_eq!(spec.label_for("(a"), None);
        assert_eq!(TokenSpec::from(TokenType::Text).label_for("x"), Some(TokenType::Text));
    }
}
