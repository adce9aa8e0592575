//! End-to-end tests for the zendesk_xml mode

use pretty_assertions::assert_eq;
use zendesk_highlight::{
    placeholders, zendesk, Family, Markup, ModeRegistry, StateStack, Token, TokenType, Tokenizer,
};

const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<notification>
  <!-- sent to {{ticket.assignee.name}} -->
  <subject>[{{ticket.id}}] {{ ticket.title }}</subject>
  {% if ticket.priority == "urgent" %}
  <body lang="{{current_user.locale}}">
    Rating: {{satisfaction.current_rating}} &amp; {{ticket.organization.name}}
  </body>
  {% endif %}
</notification>
"#;

fn tokenizer() -> Tokenizer {
    Tokenizer::new(zendesk::grammar().unwrap())
}

fn placeholders_in<'a>(tokens: &[Token<'a>]) -> Vec<(Family, &'a str)> {
    tokens
        .iter()
        .filter_map(|t| t.kind.family().map(|family| (family, t.text)))
        .collect()
}

#[test]
fn test_template_round_trips() {
    let tokens = tokenizer().tokenize(TEMPLATE);
    let joined: String = tokens.iter().map(|t| t.text).collect();
    assert_eq!(joined, TEMPLATE);

    let mut offset = 0;
    for token in &tokens {
        assert_eq!(token.offset, offset, "{token}");
        assert!(!token.is_empty());
        offset = token.end();
    }
}

#[test]
fn test_template_placeholders() {
    let tokens = tokenizer().tokenize(TEMPLATE);
    assert_eq!(
        placeholders_in(&tokens),
        vec![
            (Family::User, "ticket.assignee.name"),
            (Family::Ticket, "ticket.id"),
            (Family::Ticket, "ticket.title"),
            (Family::Ticket, "ticket.priority"),
            (Family::User, "current_user.locale"),
            (Family::Satisfaction, "satisfaction.current_rating"),
            (Family::Organization, "ticket.organization.name"),
        ]
    );
}

/// Whole-text tokens cut at line ends, with absolute offsets
fn cut_at_lines<'a>(tokens: &[Token<'a>]) -> Vec<(TokenType, &'a str, usize)> {
    let mut out = Vec::new();
    for token in tokens {
        let mut offset = token.offset;
        for piece in token.text.split_inclusive('\n') {
            out.push((token.kind, piece, offset));
            offset += piece.len();
        }
    }
    out
}

/// Tokens from feeding `text` one line at a time, with absolute offsets
fn line_by_line<'a>(
    tokenizer: &Tokenizer,
    text: &'a str,
) -> (Vec<(TokenType, &'a str, usize)>, StateStack) {
    let mut state = tokenizer.initial_state();
    let mut line_start = 0;
    let mut out = Vec::new();
    for line in text.split_inclusive('\n') {
        let result = tokenizer.tokenize_line(line, &state);
        out.extend(
            result
                .tokens
                .iter()
                .map(|t| (t.kind, t.text, line_start + t.offset)),
        );
        state = result.state;
        line_start += line.len();
    }
    (out, state)
}

#[test]
fn test_line_by_line_matches_whole_text() {
    let tokenizer = tokenizer();
    let cases = [
        TEMPLATE,
        // unterminated string literal
        "{{ \"oops }}\n<p>\"hi\"</p>\n{{ ticket.id }}\n",
        "<a title='{{ 'x }}'>\n{{ \"a\\\n}}</a>",
        // stray closing delimiters in markup
        "<p>a }} b %}</p>\n}}\n{{ ticket.id }}",
        // non-ASCII next to literals and in markup
        "{{ 0x1Aé ٣ truè }}\n<b>ünïcode {{ current_user.name }}</b>\n",
        // expression spanning lines
        "{% if\n  ticket.status == 1\n%}\n<!-- {{\nticket.id }} -->",
    ];

    for text in cases {
        let whole = tokenizer.tokenize(text);
        let (by_line, state) = line_by_line(&tokenizer, text);
        assert_eq!(by_line, cut_at_lines(&whole), "{text:?}");

        let mut rest = tokenizer.tokens(text, tokenizer.initial_state());
        rest.by_ref().for_each(drop);
        assert_eq!(state, rest.into_state(), "{text:?}");
    }

    let (_, state) = line_by_line(&tokenizer, TEMPLATE);
    assert_eq!(state, tokenizer.initial_state());
}

#[test]
fn test_string_literals_stay_on_one_line() {
    let tokens = tokenizer().tokenize("{{ \"oops }}\n<p>\"hi\"</p>\n{{ ticket.id }}");
    assert!(tokens
        .iter()
        .filter(|t| t.kind == TokenType::String)
        .all(|t| !t.text.contains('\n')));
    assert_eq!(
        placeholders_in(&tokens),
        vec![(Family::Ticket, "ticket.id")]
    );
    let closers = tokens
        .iter()
        .filter(|t| t.kind == TokenType::Variable && t.text == "}}")
        .count();
    assert_eq!(closers, 2);
}

#[test]
fn test_every_table_entry_highlights_inside_expression() {
    let tokenizer = tokenizer();
    for (family, table) in placeholders::tables() {
        for entry in table.iter() {
            // Prefix entries end with a separator that is not part of an identifier
            let name = entry.trim_end_matches('.');
            if name.len() != entry.len() {
                continue;
            }
            let input = format!("{{{{ {name} }}}}");
            let tokens = tokenizer.tokenize(&input);
            assert_eq!(tokens[2].kind, TokenType::Placeholder(family), "{input}");
            assert_eq!(tokens[2].text, name);
        }
    }
}

#[test]
fn test_dynamic_custom_fields() {
    let tokens = tokenizer().tokenize(
        "{{ticket.submitter.custom_fields.vip}} {{ticket.ticket_field_option_title_42}}",
    );
    assert_eq!(
        placeholders_in(&tokens),
        vec![
            (Family::User, "ticket.submitter.custom_fields.vip"),
            (Family::Ticket, "ticket.ticket_field_option_title_42"),
        ]
    );
}

#[test]
fn test_unknown_names_are_identifiers() {
    let tokens = tokenizer().tokenize("{% for comment in ticket.comments %}");
    let identifiers: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenType::Identifier)
        .map(|t| t.text)
        .collect();
    assert_eq!(identifiers, vec!["for", "comment", "in", "ticket.comments"]);
}

#[test]
fn test_braces_outside_expressions_are_text() {
    let tokens = tokenizer().tokenize("a { b } c");
    assert!(tokens
        .iter()
        .all(|t| t.kind == TokenType::Markup(Markup::Text)));
}

#[test]
fn test_unterminated_expression_stays_open() {
    let tokenizer = tokenizer();
    let line = tokenizer.tokenize_line("<p>{{ ticket.id", &tokenizer.initial_state());
    assert_eq!(
        line.state.current(),
        tokenizer
            .grammar()
            .state_id(zendesk::EXPRESSION_STATE)
            .unwrap()
    );
    let next = tokenizer.tokenize_line("}}</p>", &line.state);
    assert_eq!(next.tokens[0].kind, TokenType::Variable);
    assert_eq!(next.state, tokenizer.initial_state());
}

#[test]
fn test_registry_mode_tokenizes_like_direct_grammar() {
    let registry = ModeRegistry::with_builtin().unwrap();
    let from_registry = registry.get(zendesk::MODE_NAME).unwrap().tokenizer();
    assert_eq!(from_registry.tokenize(TEMPLATE), tokenizer().tokenize(TEMPLATE));

    // The plain XML mode does not know about template tags
    let xml = registry.get("xml").unwrap().tokenizer();
    assert!(xml
        .tokenize("{{ticket.id}}")
        .iter()
        .all(|t| t.kind == TokenType::Markup(Markup::Text)));
}

#[test]
fn test_tokens_serialize_as_scopes() {
    let tokens = tokenizer().tokenize("{{0x1A}}");
    let json = serde_json::to_value(&tokens).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"type": "variable", "value": "{{", "offset": 0},
            {"type": "constant.numeric", "value": "0x1A", "offset": 2},
            {"type": "variable", "value": "}}", "offset": 6},
        ])
    );
}
