//! Rule-table tokenizer
//!
//! Walks a [`Grammar`] over input text and produces a stream of [`Token`]s.
//!
//! # Matching
//!
//! - At each position the current state's rules are tried in order; the
//!   first rule that matches a non-empty prefix wins.
//! - Characters no rule matches are labelled with the state's default label;
//!   a run of them becomes a single token.
//! - Push/pop transitions maintain a [`StateStack`]; popping an empty stack
//!   returns to the start state.
//! - Zero-copy: token text borrows from the input, and concatenating every
//!   token's text reproduces the input exactly.
//!
//! # Example
//!
//! ```rust
//! use zendesk_highlight::{zendesk, Tokenizer};
//!
//! let tokenizer = Tokenizer::new(zendesk::grammar().unwrap());
//! let tokens = tokenizer.tokenize("<p>{{ ticket.id }}</p>");
//! assert!(tokens.iter().any(|t| t.text == "ticket.id" && t.kind.is_placeholder()));
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::rules::{CompiledRule, Grammar, StateId, TokenSpec, Transition};
use crate::token::{Token, TokenType};

/// Current state plus the states to return to on pop
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateStack {
    current: StateId,
    stack: Vec<StateId>,
}

impl StateStack {
    pub(crate) fn new(current: StateId) -> Self {
        Self {
            current,
            stack: Vec::new(),
        }
    }

    pub fn current(&self) -> StateId {
        self.current
    }

    /// Number of remembered return states
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether every state on the stack belongs to `grammar`
    pub fn belongs_to(&self, grammar: &Grammar) -> bool {
        grammar.contains(self.current) && self.stack.iter().all(|&id| grammar.contains(id))
    }

    fn apply(&mut self, transition: Transition, start: StateId) {
        match transition {
            Transition::Stay => {}
            Transition::Goto(next) => self.current = next,
            Transition::Push(next) => {
                self.stack.push(self.current);
                self.current = next;
            }
            Transition::Pop => self.current = self.stack.pop().unwrap_or(start),
        }
    }
}

/// Tokens of one line and the state to resume the next line from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens<'a> {
    pub tokens: Vec<Token<'a>>,
    pub state: StateStack,
}

/// A tokenizer over a compiled grammar
#[derive(Debug, Clone)]
pub struct Tokenizer {
    grammar: Arc<Grammar>,
}

impl Tokenizer {
    pub fn new(grammar: impl Into<Arc<Grammar>>) -> Self {
        Self {
            grammar: grammar.into(),
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// State a fresh document starts in
    pub fn initial_state(&self) -> StateStack {
        StateStack::new(self.grammar.start())
    }

    /// Tokenize a whole text from the start state
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Token<'a>> {
        self.tokens(text, self.initial_state()).collect()
    }

    /// Tokenize one line, resuming from the state the previous line ended in
    pub fn tokenize_line<'a>(&self, line: &'a str, state: &StateStack) -> LineTokens<'a> {
        let mut iter = self.tokens(line, state.clone());
        let tokens = iter.by_ref().collect();
        LineTokens {
            tokens,
            state: iter.into_state(),
        }
    }

    /// Lazy token stream starting in `state`.
    ///
    /// A stack produced by a different grammar is replaced by the initial
    /// state.
    pub fn tokens<'g, 'a>(&'g self, input: &'a str, state: StateStack) -> Tokens<'g, 'a> {
        let state = if state.belongs_to(&self.grammar) {
            state
        } else {
            warn!(
                depth = state.depth(),
                states = self.grammar.len(),
                "State stack does not belong to this grammar, restarting"
            );
            self.initial_state()
        };
        Tokens {
            grammar: &self.grammar,
            input,
            position: 0,
            state,
            pending: VecDeque::new(),
        }
    }
}

/// Iterator over the tokens of an input
#[derive(Debug)]
pub struct Tokens<'g, 'a> {
    grammar: &'g Grammar,
    input: &'a str,
    position: usize,
    state: StateStack,
    pending: VecDeque<Token<'a>>,
}

impl<'g, 'a> Tokens<'g, 'a> {
    /// Current byte position in the input
    pub fn position(&self) -> usize {
        self.position
    }

    /// State the tokenizer is in after the tokens produced so far
    pub fn state(&self) -> &StateStack {
        &self.state
    }

    pub fn into_state(self) -> StateStack {
        self.state
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// First rule of `rules` matching a non-empty prefix of the remaining input
    fn match_rule(
        rules: &'g [CompiledRule],
        rest: &'a str,
    ) -> Option<(&'g CompiledRule, usize)> {
        rules.iter().find_map(|rule| {
            rule.regex
                .find(rest)
                .map(|m| m.end())
                .filter(|&len| len > 0)
                .map(|len| (rule, len))
        })
    }

    /// Scan until the next rule match (or end of input), queueing tokens
    fn step(&mut self) {
        let grammar = self.grammar;
        let state = grammar.compiled(self.state.current());
        let unmatched_start = self.position;

        while self.position < self.input.len() {
            let rest = self.remaining();
            if let Some((rule, len)) = Self::match_rule(state.rules(), rest) {
                self.flush_unmatched(unmatched_start, state.default_token());
                self.emit(rule, rest, len);
                self.position += len;
                self.state.apply(rule.transition, grammar.start());
                return;
            }
            match rest.chars().next() {
                Some(c) => self.position += c.len_utf8(),
                None => break,
            }
        }

        self.flush_unmatched(unmatched_start, state.default_token());
    }

    fn flush_unmatched(&mut self, start: usize, label: TokenType) {
        if start < self.position {
            trace!(
                offset = start,
                len = self.position - start,
                label = %label,
                "No rule matched, using default label"
            );
            self.pending
                .push_back(Token::new(label, &self.input[start..self.position], start));
        }
    }

    fn emit(&mut self, rule: &CompiledRule, rest: &'a str, len: usize) {
        let offset = self.position;
        let matched = &rest[..len];
        match &rule.token {
            TokenSpec::Groups(labels) => self.emit_groups(rule, labels, rest, len, offset),
            spec => {
                if let Some(label) = spec.label_for(matched) {
                    self.pending.push_back(Token::new(label, matched, offset));
                }
            }
        }
    }

    /// One token per non-empty group; text outside groups gets the default label
    fn emit_groups(
        &mut self,
        rule: &CompiledRule,
        labels: &[TokenType],
        rest: &'a str,
        len: usize,
        offset: usize,
    ) {
        let default = self.grammar.compiled(self.state.current()).default_token();
        let matched = &rest[..len];
        let Some(caps) = rule.regex.captures(rest) else {
            self.pending.push_back(Token::new(default, matched, offset));
            return;
        };

        let mut cursor = 0;
        for (group, label) in caps.iter().skip(1).zip(labels) {
            let Some(m) = group else { continue };
            if m.is_empty() || m.start() < cursor || m.end() > len {
                continue;
            }
            if m.start() > cursor {
                self.pending
                    .push_back(Token::new(default, &matched[cursor..m.start()], offset + cursor));
            }
            self.pending
                .push_back(Token::new(*label, m.as_str(), offset + m.start()));
            cursor = m.end();
        }
        if cursor < matched.len() {
            self.pending
                .push_back(Token::new(default, &matched[cursor..], offset + cursor));
        }
    }
}

impl<'g, 'a> Iterator for Tokens<'g, 'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() && self.position < self.input.len() {
            self.step();
        }
        self.pending.pop_front()
    }
}
