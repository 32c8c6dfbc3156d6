//! Recursive-descent parser for constraint expressions
//!
//! ```text
//! type_expr   := OPT? base_expr
//! base_expr   := simple_expr ( OR simple_expr )*
//! simple_expr := STR | INT | FLOAT | OSB base_expr CSB
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConstraintError, GrammarError};
use crate::token::{tokenize, Token};
use crate::validator::Validator;

/// Deepest list nesting accepted in a constraint expression
pub const MAX_NESTING: usize = 64;

/// Parser behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Ignore tokens left over after a complete expression instead of failing
    #[serde(default)]
    pub allow_trailing_tokens: bool,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self { allow_trailing_tokens: false }
    }

    pub fn lenient() -> Self {
        Self { allow_trailing_tokens: true }
    }
}

/// Compile a constraint expression, rejecting trailing tokens
pub fn parse_type(expr: &str) -> Result<Validator, ConstraintError> {
    parse_type_with(expr, ParseOptions::strict())
}

/// Compile a constraint expression with explicit options
pub fn parse_type_with(expr: &str, options: ParseOptions) -> Result<Validator, ConstraintError> {
    let tokens = tokenize(expr)?;
    let validator = Parser::new(&tokens, options).parse_type_expr()?;
    debug!(expr, %validator, "parsed constraint");
    Ok(validator)
}

/// Cursor over an immutable token slice
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], options: ParseOptions) -> Self {
        Parser { tokens, pos: 0, depth: 0, options }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn accept(&mut self, token: Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Tokens not consumed so far
    pub fn remaining(&self) -> &'a [Token] {
        &self.tokens[self.pos..]
    }

    /// Parse a full `type_expr`
    pub fn parse_type_expr(&mut self) -> Result<Validator, GrammarError> {
        let optional = self.accept(Token::Optional);
        let mut validator = self.parse_base_expr()?;
        if optional {
            validator = Validator::optional(validator);
        }

        let rest = self.remaining();
        if !rest.is_empty() {
            if !self.options.allow_trailing_tokens {
                return Err(GrammarError::TrailingTokens { tokens: rest.to_vec() });
            }
            warn!(trailing = ?rest, "ignoring trailing tokens");
        }
        Ok(validator)
    }

    fn parse_base_expr(&mut self) -> Result<Validator, GrammarError> {
        let mut left = match self.parse_simple_expr()? {
            Some(v) => v,
            None => return Err(GrammarError::CannotParseType { found: self.peek() }),
        };
        while self.accept(Token::Or) {
            let right = match self.parse_simple_expr()? {
                Some(v) => v,
                None => return Err(GrammarError::NoExpressionAfterOr { found: self.peek() }),
            };
            left = Validator::or(left, right);
        }
        Ok(left)
    }

    fn parse_simple_expr(&mut self) -> Result<Option<Validator>, GrammarError> {
        if self.accept(Token::Str) {
            return Ok(Some(Validator::Str));
        }
        if self.accept(Token::Int) {
            return Ok(Some(Validator::Int));
        }
        if self.accept(Token::Float) {
            return Ok(Some(Validator::Float));
        }
        if self.accept(Token::ListOpen) {
            if self.depth >= MAX_NESTING {
                return Err(GrammarError::TooDeep { limit: MAX_NESTING });
            }
            self.depth += 1;
            let inner = self.parse_base_expr();
            self.depth -= 1;
            let inner = inner?;
            if !self.accept(Token::ListClose) {
                return Err(GrammarError::UnclosedList { found: self.peek() });
            }
            return Ok(Some(Validator::list(inner)));
        }
        Ok(None)
    }
}
