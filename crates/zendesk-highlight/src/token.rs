//! Token labels and tokens produced by the tokenizer

use std::fmt;

use serde::{Serialize, Serializer};

/// Placeholder family a recognized dotted name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Ticket fields (`ticket.id`, `ticket.status`, ...)
    Ticket,
    /// Latest comment fields (`ticket.latest_comment.author`, ...)
    Comment,
    /// Current user, requester and assignee fields
    User,
    /// Organization fields of the current user, requester, assignee and ticket
    Organization,
    /// Satisfaction survey fields
    Satisfaction,
}

impl Family {
    /// All families in declaration order
    pub const ALL: [Family; 5] = [
        Family::Ticket,
        Family::Comment,
        Family::User,
        Family::Organization,
        Family::Satisfaction,
    ];

    /// Scope name used when rendering this family
    pub fn scope(&self) -> &'static str {
        match self {
            Family::Ticket => "ticket",
            Family::Comment => "comment",
            Family::User => "user",
            Family::Organization => "organization",
            Family::Satisfaction => "satisfaction",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope())
    }
}

/// Labels produced by the XML base grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Markup {
    /// Character data between tags
    Text,
    /// `<![CDATA[` and `]]>`
    CdataDelimiter,
    /// `<?` of a processing instruction
    InstructionOpen,
    /// Target name of a processing instruction
    InstructionName,
    /// Pseudo-attribute name inside a declaration
    DeclAttributeName,
    /// `=` inside a declaration
    DeclAttributeEquals,
    /// `?>`
    DeclClose,
    /// `<!DOCTYPE` and its closing `>`
    Doctype,
    /// Words inside a DOCTYPE
    DoctypeWord,
    /// `[` and `]` around a DOCTYPE internal subset
    IntSubset,
    /// `<!` and `>` of a markup declaration
    MarkupDeclPunctuation,
    /// Keyword of a markup declaration (`ELEMENT`, `ATTLIST`, ...)
    MarkupDeclKeyword,
    /// `<!--`
    CommentStart,
    /// Comment body
    Comment,
    /// `-->`
    CommentEnd,
    /// Stray `</` that does not start a tag
    EndTagOpenText,
    /// Stray `<` that does not start a tag
    TagOpenText,
    /// Entity or character reference in text
    Reference,
    /// Entity or character reference inside an attribute value
    AttributeReference,
    /// `<` opening a start tag
    TagOpen,
    /// `</` opening an end tag
    EndTagOpen,
    /// Tag name
    TagName,
    /// `>` or `/>`
    TagClose,
    /// Whitespace inside a tag
    TagWhitespace,
    /// Whitespace inside declarations
    Whitespace,
    /// Quoted string inside declarations
    String,
    /// Attribute name
    AttributeName,
    /// `=` between attribute name and value
    AttributeEquals,
    /// Quoted attribute value
    AttributeValue,
}

impl Markup {
    /// Ace-style scope name
    pub fn scope(&self) -> &'static str {
        match self {
            Markup::Text => "text.xml",
            Markup::CdataDelimiter => "string.cdata.xml",
            Markup::InstructionOpen => "punctuation.instruction.xml",
            Markup::InstructionName => "keyword.instruction.xml",
            Markup::DeclAttributeName => "entity.other.attribute-name.decl-attribute-name.xml",
            Markup::DeclAttributeEquals => "keyword.operator.decl-attribute-equals.xml",
            Markup::DeclClose => "punctuation.xml-decl.xml",
            Markup::Doctype => "xml-pe.doctype.xml",
            Markup::DoctypeWord => "xml-pe.xml",
            Markup::IntSubset => "punctuation.int-subset.xml",
            Markup::MarkupDeclPunctuation => "punctuation.markup-decl.xml",
            Markup::MarkupDeclKeyword => "keyword.markup-decl.xml",
            Markup::CommentStart => "comment.start.xml",
            Markup::Comment => "comment.xml",
            Markup::CommentEnd => "comment.end.xml",
            Markup::EndTagOpenText => "text.end-tag-open.xml",
            Markup::TagOpenText => "text.tag-open.xml",
            Markup::Reference => "constant.language.escape.reference.xml",
            Markup::AttributeReference => {
                "constant.language.escape.reference.attribute-value.xml"
            }
            Markup::TagOpen => "meta.tag.punctuation.tag-open.xml",
            Markup::EndTagOpen => "meta.tag.punctuation.end-tag-open.xml",
            Markup::TagName => "meta.tag.tag-name.xml",
            Markup::TagClose => "meta.tag.punctuation.tag-close.xml",
            Markup::TagWhitespace => "text.tag-whitespace.xml",
            Markup::Whitespace => "text.whitespace.xml",
            Markup::String => "string.xml",
            Markup::AttributeName => "entity.other.attribute-name.xml",
            Markup::AttributeEquals => "keyword.operator.attribute-equals.xml",
            Markup::AttributeValue => "string.attribute-value.xml",
        }
    }
}

/// The display category assigned to a span of input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // === Template expressions ===
    /// Plain text, including whitespace inside expressions
    Text,
    /// Template delimiters (`{{`, `}}`, `{%`, `%}`)
    Variable,
    /// Quoted string literal
    String,
    /// Hexadecimal or decimal numeral
    Numeric,
    /// `true` / `false`
    Boolean,
    /// Identifier that is not a known placeholder
    Identifier,
    /// Recognized placeholder name
    Placeholder(Family),
    /// Operator
    Operator,
    /// `(`, `[`, `{`
    ParenOpen,
    /// `)`, `]`, `}`
    ParenClose,

    // === Host grammar ===
    /// Label produced by the XML base grammar
    Markup(Markup),
}

impl TokenType {
    /// Ace-style dotted scope name, used by themes and serialized output
    pub fn scope(&self) -> &'static str {
        match self {
            TokenType::Text => "text",
            TokenType::Variable => "variable",
            TokenType::String => "string",
            TokenType::Numeric => "constant.numeric",
            TokenType::Boolean => "constant.language.boolean",
            TokenType::Identifier => "identifier",
            TokenType::Placeholder(family) => family.scope(),
            TokenType::Operator => "keyword.operator",
            TokenType::ParenOpen => "paren.lparen",
            TokenType::ParenClose => "paren.rparen",
            TokenType::Markup(markup) => markup.scope(),
        }
    }

    /// Check if this label belongs to the XML base grammar
    pub fn is_markup(&self) -> bool {
        matches!(self, TokenType::Markup(_))
    }

    /// Check if this is a recognized placeholder
    pub fn is_placeholder(&self) -> bool {
        matches!(self, TokenType::Placeholder(_))
    }

    /// Placeholder family, if any
    pub fn family(&self) -> Option<Family> {
        match self {
            TokenType::Placeholder(family) => Some(*family),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope())
    }
}

impl From<Markup> for TokenType {
    fn from(markup: Markup) -> Self {
        TokenType::Markup(markup)
    }
}

impl From<Family> for TokenType {
    fn from(family: Family) -> Self {
        TokenType::Placeholder(family)
    }
}

impl Serialize for TokenType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.scope())
    }
}

/// A labelled span of input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    /// Display category
    #[serde(rename = "type")]
    pub kind: TokenType,
    /// The raw text of the token (slice into original input)
    #[serde(rename = "value")]
    pub text: &'a str,
    /// Byte offset in the input passed to the tokenizer
    pub offset: usize,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenType, text: &'a str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    /// Byte offset one past the end of this token
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Get the length of this token in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if token is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes() {
        assert_eq!(TokenType::Numeric.scope(), "constant.numeric");
        assert_eq!(TokenType::Boolean.scope(), "constant.language.boolean");
        assert_eq!(TokenType::ParenOpen.scope(), "paren.lparen");
        assert_eq!(TokenType::Placeholder(Family::User).scope(), "user");
        assert_eq!(
            TokenType::Markup(Markup::TagName).scope(),
            "meta.tag.tag-name.xml"
        );
    }

    #[test]
    fn test_categories() {
        assert!(TokenType::Markup(Markup::Comment).is_markup());
        assert!(!TokenType::Variable.is_markup());
        assert!(TokenType::Placeholder(Family::Ticket).is_placeholder());
        assert_eq!(
            TokenType::Placeholder(Family::Satisfaction).family(),
            Some(Family::Satisfaction)
        );
        assert_eq!(TokenType::Identifier.family(), None);
    }

    #[test]
    fn test_token_display() {
        let token = Token::new(TokenType::Placeholder(Family::Ticket), "ticket.id", 3);
        assert_eq!(token.to_string(), "ticket(\"ticket.id\")");
        assert_eq!(token.end(), 12);
        assert_eq!(token.len(), 9);
    }

    #[test]
    fn test_token_serializes_scope() {
        let token = Token::new(TokenType::Operator, "==", 7);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r#"{"type":"keyword.operator","value":"==","offset":7}"#);
    }
}
