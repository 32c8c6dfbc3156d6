//! Error types for constraint compilation and config loading

use std::path::PathBuf;

use thiserror::Error;

use crate::token::Token;

/// Result type for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Raised when a constraint expression contains text outside the vocabulary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexicalError {
    #[error("unknown token: {remainder}")]
    UnknownToken { remainder: String },
}

/// Raised when the token sequence matches no grammar production
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("cannot parse type: {}", describe(found))]
    CannotParseType { found: Option<Token> },

    #[error("no expression after `or`: {}", describe(found))]
    NoExpressionAfterOr { found: Option<Token> },

    #[error("list is missing its closing `]`: {}", describe(found))]
    UnclosedList { found: Option<Token> },

    #[error("unexpected trailing tokens: {}", join_tokens(tokens))]
    TrailingTokens { tokens: Vec<Token> },

    #[error("lists nested deeper than {limit}")]
    TooDeep { limit: usize },
}

/// Authoring error for a single constraint expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError),

    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),
}

/// Failure to read text as a literal value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LiteralError {
    #[error("empty literal")]
    Empty,

    #[error("unterminated {what}")]
    Unterminated { what: &'static str },

    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },

    #[error("lists nested deeper than {limit}")]
    TooDeep { limit: usize },
}

/// Failure to build a key mapping out of a config file
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: config_crate::ConfigError,
    },

    #[error("value of `{key}` is not text")]
    NotText { key: String },
}

/// Top-level error for the checker and CLI
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Settings error: {0}")]
    Settings(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn describe(found: &Option<Token>) -> String {
    match found {
        Some(token) => format!("found `{token}`"),
        None => "unexpected end of expression".to_string(),
    }
}

fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_error_messages() {
        let err = GrammarError::CannotParseType { found: None };
        assert_eq!(err.to_string(), "cannot parse type: unexpected end of expression");

        let err = GrammarError::NoExpressionAfterOr { found: Some(Token::ListClose) };
        assert_eq!(err.to_string(), "no expression after `or`: found `]`");

        let err = GrammarError::TrailingTokens { tokens: vec![Token::Int, Token::DictOpen] };
        assert_eq!(err.to_string(), "unexpected trailing tokens: int {");
    }

    #[test]
    fn test_constraint_error_wraps_kinds() {
        let err: ConstraintError = LexicalError::UnknownToken { remainder: "x".into() }.into();
        assert_eq!(err.to_string(), "lexical error: unknown token: x");
    }
}
