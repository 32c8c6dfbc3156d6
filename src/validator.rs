//! Validator trees
//!
//! A parsed constraint expression is a tree of [`Validator`] nodes. Every node
//! validates a candidate [`Value`] and returns either the coerced value or a
//! [`ValidationFailure`]. Failures are data, never panics, so a caller can
//! check many keys and report them together.

use std::fmt;

use serde_json::{Number, Value};
use thiserror::Error;

use crate::error::LiteralError;
use crate::literal;

/// Executable form of a constraint expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Validator {
    Int,
    Float,
    Str,
    /// List whose elements match the inner validator; `None` accepts any element
    List(Option<Box<Validator>>),
    /// Left is tried first, right only if left fails
    Or(Box<Validator>, Box<Validator>),
    /// Absent values pass; anything else goes to the inner validator
    Optional(Box<Validator>),
}

/// Why a candidate was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("failed to validate int")]
    Int,

    #[error("failed to validate float")]
    Float,

    #[error("failed to validate str")]
    Str,

    #[error("this is not a list")]
    NotAList,

    #[error("cannot parse a list: {0}")]
    UnparsableList(LiteralError),

    #[error("{}", join_elements(.0))]
    Elements(Vec<ElementFailure>),

    #[error("{left} also {right}")]
    Both {
        left: Box<ValidationFailure>,
        right: Box<ValidationFailure>,
    },
}

/// A rejected list element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementFailure {
    pub index: usize,
    pub failure: ValidationFailure,
}

fn join_elements(elements: &[ElementFailure]) -> String {
    elements
        .iter()
        .map(|e| e.failure.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Validator {
    /// List of elements matching `inner`
    pub fn list(inner: Validator) -> Self {
        Validator::List(Some(Box::new(inner)))
    }

    /// List of unconstrained elements
    pub fn any_list() -> Self {
        Validator::List(None)
    }

    pub fn or(left: Validator, right: Validator) -> Self {
        Validator::Or(Box::new(left), Box::new(right))
    }

    pub fn optional(inner: Validator) -> Self {
        Validator::Optional(Box::new(inner))
    }

    /// Validate `candidate`, returning the coerced value on success.
    ///
    /// An optional validator returns `Value::Null` for an absent candidate.
    pub fn validate(&self, candidate: &Value) -> Result<Value, ValidationFailure> {
        match self {
            Validator::Int => validate_int(candidate),
            Validator::Float => validate_float(candidate),
            Validator::Str => validate_str(candidate),
            Validator::List(inner) => validate_list(inner.as_deref(), candidate),
            Validator::Or(left, right) => {
                let left_failure = match left.validate(candidate) {
                    Ok(value) => return Ok(value),
                    Err(failure) => failure,
                };
                match right.validate(candidate) {
                    Ok(value) => Ok(value),
                    Err(right_failure) => Err(ValidationFailure::Both {
                        left: Box::new(left_failure),
                        right: Box::new(right_failure),
                    }),
                }
            }
            Validator::Optional(inner) => {
                if is_absent(candidate) {
                    Ok(Value::Null)
                } else {
                    inner.validate(candidate)
                }
            }
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Int => f.write_str("int"),
            Validator::Float => f.write_str("float"),
            Validator::Str => f.write_str("str"),
            Validator::List(Some(inner)) => write!(f, "[ {inner} ]"),
            Validator::List(None) => f.write_str("[ ]"),
            Validator::Or(left, right) => write!(f, "{left} or {right}"),
            Validator::Optional(inner) => write!(f, "? {inner}"),
        }
    }
}

/// Null, blank text and empty sequences count as "no value supplied".
pub fn is_absent(candidate: &Value) -> bool {
    match candidate {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

// -2^63 and 2^63; every float in between truncates to a representable i64
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Text is parsed as `i64`, so integers outside that range are rejected.
fn validate_int(candidate: &Value) -> Result<Value, ValidationFailure> {
    match candidate {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n.clone())),
        Value::Number(n) => n
            .as_f64()
            .filter(|f| f.is_finite())
            .map(f64::trunc)
            .filter(|f| (I64_LOWER..I64_UPPER).contains(f))
            .map(|f| Value::from(f as i64))
            .ok_or(ValidationFailure::Int),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| ValidationFailure::Int),
        _ => Err(ValidationFailure::Int),
    }
}

fn validate_float(candidate: &Value) -> Result<Value, ValidationFailure> {
    let parsed = match candidate {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or(ValidationFailure::Float)
}

fn validate_str(candidate: &Value) -> Result<Value, ValidationFailure> {
    match candidate {
        Value::Null => Err(ValidationFailure::Str),
        Value::String(s) => Ok(Value::String(s.clone())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        other => Ok(Value::String(literal::to_literal_text(other))),
    }
}

fn validate_list(inner: Option<&Validator>, candidate: &Value) -> Result<Value, ValidationFailure> {
    let parsed;
    let items = match candidate {
        Value::Array(items) => items,
        Value::String(text) => {
            parsed = literal::parse_sequence(text).map_err(ValidationFailure::UnparsableList)?;
            match &parsed {
                Value::Array(items) => items,
                _ => return Err(ValidationFailure::NotAList),
            }
        }
        _ => return Err(ValidationFailure::NotAList),
    };

    let Some(inner) = inner else {
        return Ok(Value::Array(items.clone()));
    };

    let mut coerced = Vec::with_capacity(items.len());
    let mut failures = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match inner.validate(item) {
            Ok(value) => coerced.push(value),
            Err(failure) => failures.push(ElementFailure { index, failure }),
        }
    }

    if failures.is_empty() {
        Ok(Value::Array(coerced))
    } else {
        Err(ValidationFailure::Elements(failures))
    }
}
