//! Config value type checking
//!
//! Validates configuration values against a small type-constraint language.
//! A constraint like `? [ int or str ]` reads "optional list of int or str";
//! it is compiled once into a [`Validator`] tree and then applied to
//! candidate values, which come back coerced or with a readable reason.
//!
//! ## Constraint language
//!
//! ```text
//! type_expr   := '?'? base_expr
//! base_expr   := simple_expr ( 'or' simple_expr )*
//! simple_expr := 'str' | 'int' | 'float' | '[' base_expr ']'
//! ```
//!
//! Keywords are case-insensitive. `{` and `}` are reserved tokens with no
//! production.
//!
//! ## Pipeline
//!
//! ```text
//! constraints.ini ──► ConstraintSource ──► tokenize ──► Parser ──► Validator ─┐
//!                                                                             ├─► Report
//! values.ini ───────► ValueSource ────────────────────────────────────────────┘
//! ```

pub mod check;
pub mod config;
pub mod error;
pub mod literal;
pub mod parser;
pub mod source;
pub mod token;
pub mod validator;

pub use check::{ConstraintSet, KeyReport, Outcome, Report};
pub use config::{ReportFormat, Settings};
pub use error::{
    ConstraintError, Error, GrammarError, LexicalError, LiteralError, Result, SourceError,
};
pub use parser::{parse_type, parse_type_with, ParseOptions, Parser};
pub use source::{ConstraintSource, ValueSource};
pub use token::{tokenize, Token};
pub use validator::{ElementFailure, ValidationFailure, Validator};
