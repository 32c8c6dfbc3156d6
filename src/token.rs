//! Tokenizer for constraint expressions
//!
//! The vocabulary is fixed and matched longest-string-first against the
//! lower-cased input. Whitespace between tokens is skipped but never required,
//! so `intorstr` lexes the same as `int or str`.

use std::fmt;

use tracing::trace;

use crate::error::LexicalError;

/// A lexical unit of the constraint language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `?`
    Optional,
    /// `[`
    ListOpen,
    /// `]`
    ListClose,
    /// `{` (reserved, no grammar production)
    DictOpen,
    /// `}` (reserved, no grammar production)
    DictClose,
    Float,
    Int,
    Str,
    Or,
}

/// Match order: longest text first, declaration order among equal lengths.
pub const VOCABULARY: [Token; 9] = [
    Token::Float,
    Token::Int,
    Token::Str,
    Token::Or,
    Token::Optional,
    Token::ListOpen,
    Token::ListClose,
    Token::DictOpen,
    Token::DictClose,
];

impl Token {
    /// Source text of this token
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Optional => "?",
            Token::ListOpen => "[",
            Token::ListClose => "]",
            Token::DictOpen => "{",
            Token::DictClose => "}",
            Token::Float => "float",
            Token::Int => "int",
            Token::Str => "str",
            Token::Or => "or",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Split a constraint expression into tokens.
///
/// Fails with [`LexicalError::UnknownToken`] carrying the lower-cased
/// remainder at the first position no vocabulary entry matches.
pub fn tokenize(expr: &str) -> Result<Vec<Token>, LexicalError> {
    let lowered = expr.to_lowercase();
    let mut rest = lowered.trim_start();
    let mut tokens = Vec::new();

    while !rest.is_empty() {
        let matched = VOCABULARY
            .iter()
            .find(|token| rest.starts_with(token.as_str()))
            .copied();

        match matched {
            Some(token) => {
                tokens.push(token);
                rest = rest[token.as_str().len()..].trim_start();
            }
            None => {
                return Err(LexicalError::UnknownToken {
                    remainder: rest.to_string(),
                });
            }
        }
    }

    trace!(expr, ?tokens, "tokenized constraint");
    Ok(tokens)
}
