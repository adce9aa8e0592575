//! Zendesk placeholder highlighting
//!
//! Tokenizer rules for Zendesk's XML templates: Liquid tags (`{{ … }}`,
//! `{% … %}`) layered over an XML grammar, with dotted placeholder names
//! classified by family (ticket, comment, user, organization, satisfaction).
//!
//! # Layers
//!
//! - [`rules`] - rule tables and their compilation into a [`Grammar`]
//! - [`tokenizer`] - first-match, state-stack tokenizer over a [`Grammar`]
//! - [`xml`] - the base XML grammar
//! - [`zendesk`] - delimiter injection, the expression state, the mode
//! - [`keywords`] / [`placeholders`] - placeholder tables and their classifier
//!
//! # Example
//!
//! ```rust
//! use zendesk_highlight::{Family, ModeRegistry, TokenType};
//!
//! let registry = ModeRegistry::with_builtin().unwrap();
//! let tokenizer = registry.get("zendesk_xml").unwrap().tokenizer();
//!
//! let tokens = tokenizer.tokenize("<b>{{ current_user.name }}</b>");
//! let names: Vec<_> = tokens.iter().filter(|t| t.kind.is_placeholder()).collect();
//! assert_eq!(names[0].text, "current_user.name");
//! assert_eq!(names[0].kind, TokenType::Placeholder(Family::User));
//! ```

pub mod error;
pub mod keywords;
pub mod placeholders;
pub mod registry;
pub mod rules;
pub mod token;
pub mod tokenizer;
pub mod xml;
pub mod zendesk;

// Re-export main types at crate root
pub use error::{ConfigError, ConfigResult};
pub use keywords::KeywordMapper;
pub use registry::{Mode, ModeRegistry};
pub use rules::{Grammar, Rule, RuleSet, State, StateId, TokenSpec};
pub use token::{Family, Markup, Token, TokenType};
pub use tokenizer::{LineTokens, StateStack, Tokenizer, Tokens};
