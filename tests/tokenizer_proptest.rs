//! Property-based tests for the constraint tokenizer
//!
//! Any spacing or casing of vocabulary-only input must lex to the same
//! tokens, and text outside the vocabulary must always be rejected.

use conftype::{parse_type, tokenize, LexicalError, Token};
use proptest::prelude::*;

fn any_token() -> impl Strategy<Value = Token> {
    prop_oneof![
        Just(Token::Optional),
        Just(Token::ListOpen),
        Just(Token::ListClose),
        Just(Token::DictOpen),
        Just(Token::DictClose),
        Just(Token::Float),
        Just(Token::Int),
        Just(Token::Str),
        Just(Token::Or),
    ]
}

/// Randomly upper-case characters of `text` according to `mask`
fn scramble_case(text: &str, mask: &[bool]) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask.get(i % mask.len().max(1)).copied().unwrap_or(false) {
                c.to_ascii_uppercase()
            } else {
                c
            }
        })
        .collect()
}

/// Random well-formed expressions
fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("int".to_string()),
        Just("float".to_string()),
        Just("str".to_string()),
    ];
    let base = leaf.prop_recursive(4, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| format!("[ {} ]", e)),
            (inner.clone(), inner).prop_map(|(a, b)| format!("{} or {}", a, b)),
        ]
    });
    (any::<bool>(), base).prop_map(|(opt, e)| if opt { format!("? {}", e) } else { e })
}

proptest! {
    #[test]
    fn spacing_and_case_do_not_change_tokens(
        tokens in prop::collection::vec(any_token(), 0..12),
        gaps in prop::collection::vec(0usize..3, 12),
        mask in prop::collection::vec(any::<bool>(), 1..8),
    ) {
        let mut text = String::new();
        for (i, token) in tokens.iter().enumerate() {
            // Words need a separator so `or` + `str` doesn't read as `orstr`.
            let gap = match (i, token) {
                (0, _) => gaps[i],
                (_, Token::Float | Token::Int | Token::Str | Token::Or) => gaps[i].max(1),
                _ => gaps[i],
            };
            text.push_str(&" ".repeat(gap));
            text.push_str(token.as_str());
        }
        text.push_str("  ");

        let lexed = tokenize(&scramble_case(&text, &mask)).unwrap();
        prop_assert_eq!(lexed, tokens);
    }

    #[test]
    fn foreign_characters_are_rejected(
        prefix in prop::collection::vec(any_token(), 0..4),
        bad in "[a-eg-hj-np-rt-z0-9_,.:;=!]",
    ) {
        let mut text: String = prefix.iter().map(|t| format!("{} ", t)).collect();
        text.push_str(&bad);

        let err = tokenize(&text).unwrap_err();
        let LexicalError::UnknownToken { remainder } = err;
        prop_assert!(remainder.ends_with(bad.as_str()));
    }

    #[test]
    fn rendered_validators_reparse(expr in expression()) {
        let validator = parse_type(&expr).unwrap();
        prop_assert_eq!(validator.to_string(), expr.clone());
        prop_assert_eq!(parse_type(&validator.to_string()).unwrap(), validator);
    }
}
