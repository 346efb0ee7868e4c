//! TokenStream classification tests

use super::tokenize::{Token, TokenKind, TokenStream};

fn tokens(text: &str) -> Vec<Token> {
    TokenStream::new(text).collect()
}

#[test]
fn test_tokenize_escaped_and_raw() {
    let found = tokens("a {{title}} b {{&url}}");
    assert_eq!(found.len(), 2);
    assert_eq!(
        found[0].kind,
        TokenKind::Escaped {
            key: "title".to_string()
        }
    );
    assert_eq!(found[0].start, 2);
    assert_eq!(found[0].length, 9);
    assert_eq!(
        found[1].kind,
        TokenKind::Raw {
            key: "url".to_string()
        }
    );
}

#[test]
fn test_tokenize_trims_whitespace() {
    let found = tokens("{{  meta.description\t}}");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind.key(), "meta.description");
}

#[test]
fn test_tokenize_adjacent_tokens() {
    let found = tokens("{{a}}{{b}}");
    assert_eq!(found.len(), 2);
    assert_eq!(found[1].start, 5);
}

#[test]
fn test_tokenize_skips_invalid() {
    assert!(tokens("{{a b}}").is_empty());
    assert!(tokens("{{a").is_empty());
    assert!(tokens("{{\n}}").is_empty());
}

#[test]
fn test_tokenize_restarts_after_abort() {
    let found = tokens("{{x {{y}}");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind.key(), "y");
    assert_eq!(found[0].start, 4);
}
