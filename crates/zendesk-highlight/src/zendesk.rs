//! Zendesk XML mode
//!
//! XML with Liquid template tags. Every state of the XML grammar is prefixed
//! with two rules that detect `{%` and `{{` and push the expression state;
//! inside an expression, placeholder names are classified by family.
//!
//! # Example
//!
//! ```rust
//! use zendesk_highlight::{zendesk, Family, TokenType, Tokenizer};
//!
//! let tokenizer = Tokenizer::new(zendesk::grammar().unwrap());
//! let tokens = tokenizer.tokenize("{{ ticket.id }}");
//! assert_eq!(tokens[2].kind, TokenType::Placeholder(Family::Ticket));
//! ```

use std::sync::Arc;

use crate::error::ConfigResult;
use crate::keywords::KeywordMapper;
use crate::registry::Mode;
use crate::rules::{Grammar, Rule, RuleSet, State};
use crate::token::TokenType;
use crate::xml;

/// Name under which this mode is registered
pub const MODE_NAME: &str = "zendesk_xml";

/// State entered on an opening template delimiter
pub const EXPRESSION_STATE: &str = "liquid-start";

/// Opening delimiter patterns, in the order they are prepended
pub const OPEN_DELIMITERS: [&str; 2] = [r"\{%", r"\{\{"];

/// Classifier over the placeholder tables, rejecting cross-family duplicates
pub fn keyword_mapper() -> ConfigResult<KeywordMapper> {
    KeywordMapper::placeholders()
}

/// The two rules that enter `target` on `{%` or `{{`
pub fn delimiter_rules(target: &str) -> [Rule; 2] {
    OPEN_DELIMITERS.map(|pattern| Rule::new(pattern, TokenType::Variable).push(target))
}

/// Prefix every state of `base` with the opening delimiter rules.
///
/// Only states present in `base` are touched, so a state added afterwards
/// (the expression state itself) never receives them.
pub fn inject_delimiters(base: RuleSet, target: &str) -> RuleSet {
    base.prepend_to_all(&delimiter_rules(target))
}

/// Rules inside `{{ … }}` / `{% … %}`.
///
/// Hex must precede decimal so `0x1A` stays one token, and booleans must
/// precede identifiers. String literals end at the line end, so whole-text
/// and line-by-line tokenizing agree. Digits and word boundaries are ASCII.
pub fn expression_state(mapper: Arc<KeywordMapper>) -> State {
    State::new([
        Rule::new(r"\}\}", TokenType::Variable).pop().into(),
        Rule::new(r"%\}", TokenType::Variable).pop().into(),
        Rule::new(r#""(?:\\.|[^"\\\n])*?""#, TokenType::String).into(),
        Rule::new(r"'(?:\\.|[^'\\\n])*?'", TokenType::String).into(),
        Rule::new(r"0[xX][0-9a-fA-F]+(?-u:\b)", TokenType::Numeric).into(),
        Rule::new(
            r"[+-]?[0-9]+(?:(?:\.[0-9]*)?(?:[eE][+-]?[0-9]+)?)?(?-u:\b)",
            TokenType::Numeric,
        )
        .into(),
        Rule::new(r"(?:true|false)(?-u:\b)", TokenType::Boolean).into(),
        Rule::keywords(r"[a-zA-Z_$][a-zA-Z0-9_$]*(?:\.[a-zA-Z0-9_$]+)*", mapper).into(),
        Rule::new(r"==|!=|\?:|[/*\-+=]", TokenType::Operator).into(),
        Rule::new(r"[\[({]", TokenType::ParenOpen).into(),
        Rule::new(r"[\])}]", TokenType::ParenClose).into(),
        Rule::new(r"\s+", TokenType::Text).into(),
    ])
}

/// The full rule set: XML with delimiter injection plus the expression state
pub fn rules() -> ConfigResult<RuleSet> {
    let mapper = Arc::new(keyword_mapper()?);
    Ok(inject_delimiters(xml::rules(), EXPRESSION_STATE)
        .with_state(EXPRESSION_STATE, expression_state(mapper)))
}

/// Compiled grammar for the mode
pub fn grammar() -> ConfigResult<Grammar> {
    rules()?.normalize(xml::START)
}

/// The `zendesk_xml` mode
pub fn mode() -> ConfigResult<Mode> {
    Ok(Mode::new(MODE_NAME, grammar()?))
}
