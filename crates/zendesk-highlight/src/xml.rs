//! XML base grammar
//!
//! The host grammar that template tags are layered onto. States are named
//! (including the ones for quoted values) so that grammar extensions can
//! reach every lexical context by name.

use crate::error::ConfigResult;
use crate::registry::Mode;
use crate::rules::{include, Grammar, Rule, RuleSet, State};
use crate::token::{Markup, TokenType};

/// Name under which the plain XML mode is registered
pub const MODE_NAME: &str = "xml";

/// Start state of the XML grammar
pub const START: &str = "start";

/// Tag and attribute names, with optional namespace prefix allowed by ':'
const TAG_NAME: &str = r"[_:a-zA-Z\x{C0}-\x{FFFF}][-_:.a-zA-Z0-9\x{C0}-\x{FFFF}]*";

const REFERENCE: &str = r"&#[0-9]+;|&#x[0-9a-fA-F]+;|&[a-zA-Z0-9_:.\-]+;";

fn m(markup: Markup) -> TokenType {
    TokenType::Markup(markup)
}

/// Quoted value state: closing quote pops, everything else is `label`
fn quoted(quote: &str, label: Markup, reference: Option<&str>) -> State {
    let mut entries = vec![Rule::new(quote, m(label)).pop().into()];
    if let Some(reference) = reference {
        entries.push(include(reference));
    }
    State::new(entries).with_default(m(label))
}

/// The XML rule set, uncompiled
pub fn rules() -> RuleSet {
    RuleSet::new()
        .with_state(
            "start",
            State::new([
                Rule::new(r"<!\[CDATA\[", m(Markup::CdataDelimiter))
                    .goto("cdata")
                    .into(),
                Rule::groups(
                    format!(r"(<\?)({TAG_NAME})"),
                    [m(Markup::InstructionOpen), m(Markup::InstructionName)],
                )
                .goto("processing_instruction")
                .into(),
                Rule::new("<!--", m(Markup::CommentStart)).goto("comment").into(),
                Rule::groups(r"(<!)(DOCTYPE)(?-u:\b)", [m(Markup::Doctype), m(Markup::Doctype)])
                    .ignore_case()
                    .goto("doctype")
                    .into(),
                include("tag"),
                Rule::new("</", m(Markup::EndTagOpenText)).into(),
                Rule::new("<", m(Markup::TagOpenText)).into(),
                include("reference"),
            ])
            .with_default(m(Markup::Text)),
        )
        .with_state(
            "processing_instruction",
            State::new([
                Rule::new(TAG_NAME, m(Markup::DeclAttributeName)).into(),
                Rule::new("=", m(Markup::DeclAttributeEquals)).into(),
                include("whitespace"),
                include("string"),
                Rule::new(r"\?>", m(Markup::DeclClose)).goto("start").into(),
            ]),
        )
        .with_state(
            "doctype",
            State::new([
                include("whitespace"),
                include("string"),
                Rule::new(">", m(Markup::Doctype)).goto("start").into(),
                Rule::new("[-_a-zA-Z0-9:]+", m(Markup::DoctypeWord)).into(),
                Rule::new(r"\[", m(Markup::IntSubset)).push("int_subset").into(),
            ]),
        )
        .with_state(
            "int_subset",
            State::new([
                Rule::new(r"\s+", m(Markup::Text)).into(),
                Rule::new(r"\]", m(Markup::IntSubset)).pop().into(),
                Rule::groups(
                    format!(r"(<!)({TAG_NAME})"),
                    [m(Markup::MarkupDeclPunctuation), m(Markup::MarkupDeclKeyword)],
                )
                .push("markup_decl")
                .into(),
            ]),
        )
        .with_state(
            "markup_decl",
            State::new([
                Rule::new(r"\s+", m(Markup::Text)).into(),
                Rule::new(">", m(Markup::MarkupDeclPunctuation)).pop().into(),
                include("string"),
            ]),
        )
        .with_state(
            "cdata",
            State::new([Rule::new(r"\]\]>", m(Markup::CdataDelimiter)).goto("start").into()])
                .with_default(m(Markup::Text)),
        )
        .with_state(
            "comment",
            State::new([Rule::new("-->", m(Markup::CommentEnd)).goto("start").into()])
                .with_default(m(Markup::Comment)),
        )
        .with_state(
            "reference",
            State::new([Rule::new(REFERENCE, m(Markup::Reference)).into()]),
        )
        .with_state(
            "attr_reference",
            State::new([Rule::new(REFERENCE, m(Markup::AttributeReference)).into()]),
        )
        .with_state(
            "tag",
            State::new([Rule::groups(
                format!(r"(?:(<)|(</))((?:{TAG_NAME}:)?{TAG_NAME})"),
                [
                    m(Markup::TagOpen),
                    m(Markup::EndTagOpen),
                    m(Markup::TagName),
                ],
            )
            .goto("tag_stuff")
            .into()]),
        )
        .with_state(
            "tag_stuff",
            State::new([
                include("attributes"),
                Rule::new("/?>", m(Markup::TagClose)).goto("start").into(),
            ]),
        )
        .with_state(
            "tag_whitespace",
            State::new([Rule::new(r"\s+", m(Markup::TagWhitespace)).into()]),
        )
        .with_state(
            "whitespace",
            State::new([Rule::new(r"\s+", m(Markup::Whitespace)).into()]),
        )
        .with_state(
            "string",
            State::new([
                Rule::new("'", m(Markup::String)).push("string_single").into(),
                Rule::new("\"", m(Markup::String)).push("string_double").into(),
            ]),
        )
        .with_state("string_single", quoted("'", Markup::String, None))
        .with_state("string_double", quoted("\"", Markup::String, None))
        .with_state(
            "attributes",
            State::new([
                Rule::new(TAG_NAME, m(Markup::AttributeName)).into(),
                Rule::new("=", m(Markup::AttributeEquals)).into(),
                include("tag_whitespace"),
                include("attribute_value"),
            ]),
        )
        .with_state(
            "attribute_value",
            State::new([
                Rule::new("'", m(Markup::AttributeValue))
                    .push("attribute_value_single")
                    .into(),
                Rule::new("\"", m(Markup::AttributeValue))
                    .push("attribute_value_double")
                    .into(),
            ]),
        )
        .with_state(
            "attribute_value_single",
            quoted("'", Markup::AttributeValue, Some("attr_reference")),
        )
        .with_state(
            "attribute_value_double",
            quoted("\"", Markup::AttributeValue, Some("attr_reference")),
        )
}

/// Compiled XML grammar
pub fn grammar() -> ConfigResult<Grammar> {
    rules().normalize(START)
}

/// The plain XML mode
pub fn mode() -> ConfigResult<Mode> {
    Ok(Mode::new(MODE_NAME, grammar()?))
}
